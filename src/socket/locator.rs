//! Container-runtime socket discovery
//!
//! Resolution order, first match wins:
//!
//! 1. `DOCKER_HOST` when it is a `unix://` address whose path exists
//! 2. The Windows named pipe, or the first platform candidate that is a socket
//! 3. A platform default, returned unconditionally
//!
//! The locator never fails. Whether a daemon is actually listening is left to
//! the client that connects to the returned address.
//!
//! # Example
//!
//! ```no_run
//! use preflight::socket::{HostEnv, SocketLocator};
//!
//! let located = SocketLocator::real().locate(&HostEnv::from_process());
//! println!("connecting to {}", located.path);
//! for diagnostic in &located.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! ```

use super::candidates::{self, WINDOWS_NAMED_PIPE};
use crate::fs::{FileSystem, RealFileSystem};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const UNIX_SCHEME: &str = "unix://";

/// Host operating system family, as far as socket conventions go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and every other Unix-like system
    Linux,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        Self::from_os_name(env::consts::OS)
    }

    /// Maps an OS identifier (`std::env::consts::OS` style) to a platform.
    /// Unknown identifiers are treated as Linux-like.
    pub fn from_os_name(os: &str) -> Self {
        match os.to_lowercase().as_str() {
            "windows" | "win32" => Platform::Windows,
            "macos" | "darwin" => Platform::MacOs,
            _ => Platform::Linux,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

/// Everything the locator reads from the host besides the file system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    /// Raw `DOCKER_HOST` value
    pub docker_host: Option<String>,
    pub platform: Platform,
    pub home_dir: Option<PathBuf>,
    pub uid: Option<u32>,
}

impl HostEnv {
    /// Snapshot of the current process environment. Read at call time.
    pub fn from_process() -> Self {
        Self {
            docker_host: env::var("DOCKER_HOST").ok(),
            platform: Platform::current(),
            home_dir: dirs::home_dir(),
            uid: current_uid(),
        }
    }

    /// Environment for `platform` with no override, home or uid
    pub fn bare(platform: Platform) -> Self {
        Self {
            docker_host: None,
            platform,
            home_dir: None,
            uid: None,
        }
    }
}

#[cfg(unix)]
fn current_uid() -> Option<u32> {
    // SAFETY: getuid has no preconditions and cannot fail.
    Some(unsafe { libc::getuid() })
}

#[cfg(not(unix))]
fn current_uid() -> Option<u32> {
    None
}

/// Where a located address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketSource {
    /// `DOCKER_HOST` pointed at an existing path
    Override,
    /// Fixed Windows named pipe
    NamedPipe,
    /// A platform candidate confirmed to be a socket
    Detected,
    /// Nothing confirmed; best guess
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warn,
}

/// One observation made while resolving the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagnosticLevel::Debug => "debug",
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Warn => "warn",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

/// Result of a lookup: the address plus the diagnostics gathered on the way
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Located {
    /// Socket path or named-pipe identifier, never empty
    pub path: String,
    pub source: SocketSource,
    pub diagnostics: Vec<Diagnostic>,
}

impl Located {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warn)
    }
}

/// Mirrors every diagnostic into `tracing` as it is recorded
#[derive(Default)]
struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    fn debug(&mut self, message: String) {
        debug!("{}", message);
        self.push(DiagnosticLevel::Debug, message);
    }

    fn info(&mut self, message: String) {
        info!("{}", message);
        self.push(DiagnosticLevel::Info, message);
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.push(DiagnosticLevel::Warn, message);
    }

    fn push(&mut self, level: DiagnosticLevel, message: String) {
        self.entries.push(Diagnostic { level, message });
    }
}

/// Socket locator over an injectable file system
pub struct SocketLocator<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl SocketLocator<RealFileSystem> {
    pub fn real() -> Self {
        Self::new(RealFileSystem::new())
    }
}

impl<F: FileSystem> SocketLocator<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Resolves the runtime socket for `env`. Never fails.
    pub fn locate(&self, env: &HostEnv) -> Located {
        let mut log = DiagnosticLog::default();

        if let Some(path) = self.check_override(env.docker_host.as_deref(), &mut log) {
            return finish(path, SocketSource::Override, log);
        }

        if env.platform == Platform::Windows {
            log.info("Windows detected, using named pipe".to_string());
            return finish(
                WINDOWS_NAMED_PIPE.to_string(),
                SocketSource::NamedPipe,
                log,
            );
        }

        let search_paths = candidates::candidates(env.platform, env.home_dir.as_deref(), env.uid);
        debug!(
            "Scanning {} socket candidates for {}",
            search_paths.len(),
            env.platform
        );

        for candidate in &search_paths {
            if self.is_socket(candidate, &mut log) {
                log.info(format!("Found socket at: {}", candidate.display()));
                return finish(
                    candidate.display().to_string(),
                    SocketSource::Detected,
                    log,
                );
            }
        }

        let fallback = candidates::fallback(env.platform, env.home_dir.as_deref());
        log.warn(format!(
            "No socket found in search paths, falling back to: {}",
            fallback
        ));
        log.warn(
            "If Docker is installed, ensure it is running or set the DOCKER_HOST environment variable"
                .to_string(),
        );
        finish(fallback, SocketSource::Fallback, log)
    }

    fn check_override(&self, docker_host: Option<&str>, log: &mut DiagnosticLog) -> Option<String> {
        let raw = docker_host.map(str::trim).filter(|v| !v.is_empty())?;

        let Some(path) = parse_unix_address(raw) else {
            log.debug(format!(
                "DOCKER_HOST is not a unix:// address, ignoring: {}",
                raw
            ));
            return None;
        };

        if self.fs.exists(Path::new(path)) {
            log.info(format!("Using socket from DOCKER_HOST: {}", path));
            Some(path.to_string())
        } else {
            log.warn(format!(
                "DOCKER_HOST specified but socket not found: {}",
                path
            ));
            None
        }
    }

    /// Exists and stats as a socket. Stat errors count as "not found" but are recorded.
    fn is_socket(&self, path: &Path, log: &mut DiagnosticLog) -> bool {
        if !self.fs.exists(path) {
            log.debug(format!("No socket at {}", path.display()));
            return false;
        }

        match self.fs.metadata(path) {
            Ok(meta) if meta.is_socket() => true,
            Ok(meta) => {
                log.debug(format!(
                    "{} exists but is not a socket ({:?})",
                    path.display(),
                    meta.file_type
                ));
                false
            }
            Err(e) => {
                log.warn(format!("Skipping {}: {:#}", path.display(), e));
                false
            }
        }
    }
}

fn finish(path: String, source: SocketSource, log: DiagnosticLog) -> Located {
    Located {
        path,
        source,
        diagnostics: log.entries,
    }
}

/// Extracts the filesystem path from a `unix://<path>` address
pub fn parse_unix_address(addr: &str) -> Option<&str> {
    addr.strip_prefix(UNIX_SCHEME).filter(|path| !path.is_empty())
}

/// Socket path for the current host, read from the real environment and file system
pub fn locate() -> String {
    SocketLocator::real().locate(&HostEnv::from_process()).path
}
