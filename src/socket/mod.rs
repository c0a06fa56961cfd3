//! Container-runtime control socket discovery

pub mod candidates;
pub mod connect;
pub mod locator;

pub use candidates::{SYSTEM_SOCKET, WINDOWS_NAMED_PIPE};
pub use connect::DockerOptions;
pub use locator::{
    locate, parse_unix_address, Diagnostic, DiagnosticLevel, HostEnv, Located, Platform,
    SocketLocator, SocketSource,
};
