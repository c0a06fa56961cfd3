//! Platform-conventional container-runtime socket locations
//!
//! Lists are short and fixed; their order is the search priority.

use super::Platform;
use std::path::{Path, PathBuf};

/// Named pipe exposed by Docker Desktop / Docker Engine on Windows
pub const WINDOWS_NAMED_PIPE: &str = "//./pipe/docker_engine";

/// System-wide socket used by Docker Engine on Linux and by the macOS symlink
pub const SYSTEM_SOCKET: &str = "/var/run/docker.sock";

/// Docker Desktop's user-scoped socket, relative to the home directory
const DESKTOP_USER_SOCKET: &str = ".docker/run/docker.sock";

const COLIMA_SOCKET: &str = ".colima/default/docker.sock";
const RANCHER_DESKTOP_SOCKET: &str = ".rd/docker.sock";
const ORBSTACK_SOCKET: &str = ".orbstack/run/docker.sock";

/// Ordered candidate socket paths for a Unix-like platform.
///
/// Home-relative entries are skipped when no home directory is known, and the
/// per-UID runtime directory is skipped when the UID is unknown. Windows has no
/// filesystem candidates.
pub fn candidates(platform: Platform, home: Option<&Path>, uid: Option<u32>) -> Vec<PathBuf> {
    let in_home = |rel: &str| home.map(|h| h.join(rel));

    match platform {
        Platform::Windows => Vec::new(),
        Platform::MacOs => [
            in_home(DESKTOP_USER_SOCKET),
            Some(PathBuf::from(SYSTEM_SOCKET)),
            in_home(COLIMA_SOCKET),
            in_home(RANCHER_DESKTOP_SOCKET),
            in_home(ORBSTACK_SOCKET),
        ]
        .into_iter()
        .flatten()
        .collect(),
        Platform::Linux => [
            Some(PathBuf::from(SYSTEM_SOCKET)),
            in_home(DESKTOP_USER_SOCKET),
            uid.map(|uid| PathBuf::from(format!("/run/user/{}/docker.sock", uid))),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}

/// Best-guess address returned when nothing was confirmed
pub fn fallback(platform: Platform, home: Option<&Path>) -> String {
    match platform {
        Platform::Windows => WINDOWS_NAMED_PIPE.to_string(),
        Platform::MacOs => match home {
            Some(home) => home.join(DESKTOP_USER_SOCKET).display().to_string(),
            None => SYSTEM_SOCKET.to_string(),
        },
        Platform::Linux => SYSTEM_SOCKET.to_string(),
    }
}
