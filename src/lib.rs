//! preflight - external dependency resolution and health checks
//!
//! Two independent, stateless components that answer "is my infrastructure
//! reachable" before real work starts:
//!
//! - **Socket locator** ([`socket`]): resolves the container-runtime control
//!   socket from `DOCKER_HOST`, the platform's conventional install locations,
//!   or a fallback default. It never fails; liveness is left to the client
//!   that connects.
//! - **Provider prober** ([`probe`]): sends one minimal completion request to
//!   an LLM endpoint and folds every outcome (validation failure, unexpected
//!   payload, HTTP error, timeout, network error) into a [`ProbeResult`].
//!
//! # Example Usage
//!
//! ```no_run
//! use preflight::{locate, ProbeRequest, Prober};
//!
//! # async fn example() {
//! let socket = locate();
//! println!("Docker socket: {}", socket);
//!
//! let request = ProbeRequest::new("https://generativelanguage.googleapis.com")
//!     .with_api_key("AIza...")
//!     .with_provider_hint("gemini");
//! let result = Prober::new().probe(&request).await;
//! println!("{} - {}", result.status, result.message);
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod fs;
pub mod probe;
pub mod socket;
pub mod util;

pub use config::{ConfigError, PreflightConfig, ProviderEntry, ProvidersFile};
pub use probe::{probe, NamedProbe, ProbeError, ProbeReport, ProbeRequest, ProbeResult, Prober};
pub use socket::{locate, DockerOptions, HostEnv, Located, Platform, SocketLocator, SocketSource};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
