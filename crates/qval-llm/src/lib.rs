//! Completion client for the Q-Val valuation service.
//!
//! Translates validated `AssetParams` into one structured-completion call
//! against the Gemini `generateContent` endpoint and defensively parses the
//! response into a `ValuationResult`. Retry policy belongs to callers.

pub mod errors;
pub mod gemini;
pub mod parse;
pub mod prompt;
pub mod provider;

pub use errors::ClientError;
pub use gemini::{GeminiConfig, GeminiValuationClient};
pub use provider::ValuationClient;
