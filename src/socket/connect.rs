//! Connection options for a container-runtime client
//!
//! Turns a located address into a `bollard` client. Only a ping is offered;
//! container lifecycle belongs to the caller.

use super::locator::{HostEnv, Located, SocketLocator};
use anyhow::{Context, Result};
use bollard::{Docker, API_DEFAULT_VERSION};
use serde::Serialize;
use tracing::{debug, warn};

/// Seconds bollard waits on the socket before giving up
const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerOptions {
    pub socket_path: String,
}

impl DockerOptions {
    /// Options for the socket found on the current host
    pub fn detect() -> Self {
        Self::from(&SocketLocator::real().locate(&HostEnv::from_process()))
    }

    /// Builds a client for the socket path. Connecting is lazy, so this only
    /// fails on malformed addresses.
    pub fn connect(&self) -> Result<Docker> {
        debug!("Creating Docker client for {}", self.socket_path);
        Docker::connect_with_socket(&self.socket_path, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)
            .with_context(|| format!("Failed to create Docker client for {}", self.socket_path))
    }

    /// Whether a daemon answers on the socket
    pub async fn ping(&self) -> Result<bool> {
        let docker = self.connect()?;
        match docker.ping().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!("Docker daemon at {} did not answer: {}", self.socket_path, e);
                Ok(false)
            }
        }
    }
}

impl From<&Located> for DockerOptions {
    fn from(located: &Located) -> Self {
        Self {
            socket_path: located.path.clone(),
        }
    }
}
