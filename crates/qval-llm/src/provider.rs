//! The seam between the state machine and a concrete completion backend.

use async_trait::async_trait;
use qval_types::{AssetParams, ValuationResult};

use crate::errors::ClientError;

/// One valuation per call, no internal retries. Implemented by the Gemini
/// adapter in production and by stubs in engine/host tests.
#[async_trait]
pub trait ValuationClient: Send + Sync {
    async fn generate(&self, params: &AssetParams) -> Result<ValuationResult, ClientError>;
}
