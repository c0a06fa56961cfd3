//! Provider wire formats for the availability probe
//!
//! Each format knows how to shape the one synthetic request and how to tell a
//! well-formed reply from a merely successful HTTP exchange. Formats are looked
//! up by provider hint through [`WireFormats`], which falls back to the
//! OpenAI-compatible format when no registered key matches.

use super::types::{ProbeError, ProbeRequest};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Text sent as the single user turn
pub const PROBE_TEXT: &str = "hello";

/// Output token cap for the probe request
pub const PROBE_MAX_TOKENS: u32 = 5;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Fully shaped HTTP request, independent of any client library
#[derive(Debug, Clone, PartialEq)]
pub struct HttpProbe {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub bearer_token: Option<String>,
    pub body: Value,
}

/// Request shape and response validation for one provider family
pub trait WireFormat: Send + Sync {
    fn name(&self) -> &'static str;

    /// `base_url` is already trimmed of trailing slashes
    fn build_request(&self, base_url: &str, request: &ProbeRequest) -> HttpProbe;

    /// Checks a 2xx body
    fn validate_response(&self, body: &str) -> Result<(), ProbeError>;
}

impl fmt::Debug for dyn WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WireFormat({})", self.name())
    }
}

/// `POST {base}/chat/completions` with a bearer token
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAICompatible;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

impl WireFormat for OpenAICompatible {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn build_request(&self, base_url: &str, request: &ProbeRequest) -> HttpProbe {
        let body = ChatCompletionRequest {
            model: request.model(),
            messages: vec![ChatMessage {
                role: "user",
                content: PROBE_TEXT,
            }],
            max_tokens: PROBE_MAX_TOKENS,
        };

        HttpProbe {
            url: format!("{}/chat/completions", base_url),
            query: Vec::new(),
            bearer_token: request.api_key().map(str::to_string),
            body: serde_json::to_value(body).unwrap_or(Value::Null),
        }
    }

    fn validate_response(&self, body: &str) -> Result<(), ProbeError> {
        if has_entries(&parse_body(body)?, "choices") {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedResponse {
                detail: "response data is not as expected".to_string(),
            })
        }
    }
}

/// `POST {base}/v1beta/models/{model}:generateContent?key=...`
#[derive(Debug, Clone, Copy, Default)]
pub struct Gemini;

impl WireFormat for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn build_request(&self, base_url: &str, request: &ProbeRequest) -> HttpProbe {
        let model = request.model().unwrap_or(DEFAULT_GEMINI_MODEL);
        let body = json!({
            "contents": [{ "parts": [{ "text": PROBE_TEXT }] }],
            "generationConfig": { "maxOutputTokens": PROBE_MAX_TOKENS },
        });

        HttpProbe {
            url: format!("{}/v1beta/models/{}:generateContent", base_url, model),
            query: vec![("key", request.api_key.clone())],
            bearer_token: None,
            body,
        }
    }

    fn validate_response(&self, body: &str) -> Result<(), ProbeError> {
        if has_entries(&parse_body(body)?, "candidates") {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedResponse {
                detail: "Gemini response data is not as expected".to_string(),
            })
        }
    }
}

/// Only malformed JSON fails here; shape is checked by the caller
fn parse_body(body: &str) -> Result<Value, ProbeError> {
    serde_json::from_str(body).map_err(|e| ProbeError::UnexpectedResponse {
        detail: format!("response body is not valid JSON ({})", e),
    })
}

/// `key` holds a non-empty array. Any other shape counts as unexpected.
fn has_entries(value: &Value, key: &str) -> bool {
    value
        .get(key)
        .and_then(Value::as_array)
        .is_some_and(|entries| !entries.is_empty())
}

/// Provider-hint keyed lookup with an explicit default
#[derive(Clone)]
pub struct WireFormats {
    entries: Vec<(String, Arc<dyn WireFormat>)>,
    default: Arc<dyn WireFormat>,
}

impl WireFormats {
    /// Empty registry that always answers with `default`
    pub fn with_default(default: impl WireFormat + 'static) -> Self {
        Self {
            entries: Vec::new(),
            default: Arc::new(default),
        }
    }

    /// Hints containing `key` (case-insensitive) select `format`. Earlier
    /// registrations take precedence.
    pub fn register(mut self, key: &str, format: impl WireFormat + 'static) -> Self {
        self.entries.push((key.to_lowercase(), Arc::new(format)));
        self
    }

    pub fn select(&self, hint: Option<&str>) -> &dyn WireFormat {
        let hint = hint.map(str::to_lowercase).unwrap_or_default();
        self.entries
            .iter()
            .find(|(key, _)| hint.contains(key.as_str()))
            .map(|(_, format)| &**format)
            .unwrap_or(&*self.default)
    }
}

impl Default for WireFormats {
    fn default() -> Self {
        Self::with_default(OpenAICompatible).register("gemini", Gemini)
    }
}

impl fmt::Debug for WireFormats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireFormats")
            .field(
                "entries",
                &self
                    .entries
                    .iter()
                    .map(|(key, format)| (key.as_str(), format.name()))
                    .collect::<Vec<_>>(),
            )
            .field("default", &self.default.name())
            .finish()
    }
}
