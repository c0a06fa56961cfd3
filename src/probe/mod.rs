//! LLM provider availability probing

pub mod prober;
pub mod types;
pub mod wire;

pub use prober::{probe, NamedProbe, ProbeReport, Prober, DEFAULT_PROBE_TIMEOUT};
pub use types::{ProbeError, ProbeRequest, ProbeResult, SUCCESS_MESSAGE};
pub use wire::{Gemini, HttpProbe, OpenAICompatible, WireFormat, WireFormats};
