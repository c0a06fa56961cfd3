//! Shared helpers for integration tests

pub mod mock_provider;

pub use mock_provider::{CapturedRequest, MockProvider};

#[allow(dead_code)]
pub fn get_preflight_binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_preflight"))
}
