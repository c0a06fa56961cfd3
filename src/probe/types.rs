//! Probe inputs, outputs and the failure taxonomy that folds into them

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SUCCESS_MESSAGE: &str = "LLM API call succeeded.";

/// Connection parameters for one provider endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    pub base_url: String,
    /// May be empty
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    /// Free-form provider name used to pick the wire format, e.g. "gemini-pro"
    #[serde(default)]
    pub provider_hint: Option<String>,
}

impl ProbeRequest {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_provider_hint(mut self, hint: impl Into<String>) -> Self {
        self.provider_hint = Some(hint.into());
        self
    }

    /// Model name, treating an empty string as unset
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }

    pub fn api_key(&self) -> Option<&str> {
        Some(self.api_key.as_str()).filter(|k| !k.is_empty())
    }

    /// Base URL without trailing slashes, `None` when blank
    pub fn base_url(&self) -> Option<&str> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Verdict of a probe: `status` is true only for an accepted, well-formed reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: bool,
    pub message: String,
}

impl ProbeResult {
    pub fn ok() -> Self {
        Self {
            status: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

/// Why a probe failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    /// Local validation failure, no request was sent
    #[error("Base URL is required.")]
    MissingBaseUrl,

    /// Transport succeeded but the payload does not look like the provider's
    #[error("LLM API call succeeded, but {detail}.")]
    UnexpectedResponse { detail: String },

    /// Non-2xx status
    #[error("LLM API call failed, HTTP status: {status}, error: {body}")]
    Http { status: u16, body: String },

    #[error("LLM API call timed out after {seconds:.1} seconds")]
    Timeout { seconds: f64 },

    /// Any other transport failure
    #[error("Network or other error occurred during LLM API call: {message}")]
    Network { message: String },
}

impl ProbeError {
    /// Soft failures are well-formed HTTP exchanges with an unusable body
    pub fn is_soft(&self) -> bool {
        matches!(self, ProbeError::UnexpectedResponse { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProbeError::Http { .. } | ProbeError::Timeout { .. } | ProbeError::Network { .. }
        )
    }
}

impl From<ProbeError> for ProbeResult {
    fn from(err: ProbeError) -> Self {
        ProbeResult::failed(err.to_string())
    }
}

impl From<Result<(), ProbeError>> for ProbeResult {
    fn from(outcome: Result<(), ProbeError>) -> Self {
        match outcome {
            Ok(()) => ProbeResult::ok(),
            Err(err) => err.into(),
        }
    }
}
