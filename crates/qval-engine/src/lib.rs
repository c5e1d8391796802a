//! Simulation state machine.
//!
//! One session sequences one valuation at a time through
//! IDLE -> THINKING -> GENERATING -> COMPLETE or ERROR. The THINKING pause is
//! an explicit, configurable staging step (zero skips it); the completion
//! call runs under a bounded timeout. `reset()` bumps the session epoch so a
//! resolution that arrives late is discarded instead of resurrecting a
//! finished state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use qval_llm::{ClientError, ValuationClient};
use qval_types::{AssetParams, ParamsError, SimulationState};
use thiserror::Error;
use tokio::task::JoinHandle;

/// Fixed message shown to the user on any failure; the cause goes to the log.
pub const DISPLAY_ERROR_MESSAGE: &str = "Simulation Failed";

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Artificial THINKING pause before the completion call is issued.
    pub staging_delay: Duration,
    /// Deadline for the completion call itself.
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staging_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Rejections from `Session::start`. State is unchanged in every case.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("a simulation is already running")]
    Busy,
    #[error(transparent)]
    InvalidParams(#[from] ParamsError),
}

struct Inner {
    state: SimulationState,
    /// Bumped by every start and reset; in-flight runs check it before
    /// applying their outcome.
    epoch: u64,
}

/// One user session's simulation lifecycle. Cheap to clone and share.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
    client: Arc<dyn ValuationClient>,
    config: EngineConfig,
}

impl Session {
    pub fn new(client: Arc<dyn ValuationClient>, config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: SimulationState::Idle,
                epoch: 0,
            })),
            client,
            config,
        }
    }

    /// Current state, cloned for the presentation layer.
    pub fn snapshot(&self) -> SimulationState {
        self.lock().state.clone()
    }

    /// Begins a run. Only valid from IDLE; a second call while a run is in
    /// flight is rejected without touching state, so no two requests can be
    /// outstanding for one session.
    pub fn start(&self, params: AssetParams) -> Result<JoinHandle<()>, EngineError> {
        params.validate()?;

        let run_epoch = {
            let mut inner = self.lock();
            if !inner.state.is_idle() {
                return Err(EngineError::Busy);
            }
            inner.epoch += 1;
            inner.state = SimulationState::Thinking {
                params: params.clone(),
            };
            inner.epoch
        };

        let session = self.clone();
        Ok(tokio::spawn(async move {
            session.drive(params, run_epoch).await;
        }))
    }

    /// Returns to IDLE from any state, discarding params and result. Any
    /// in-flight resolution becomes stale and will be dropped.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.state = SimulationState::Idle;
    }

    async fn drive(&self, params: AssetParams, run_epoch: u64) {
        if !self.config.staging_delay.is_zero() {
            tokio::time::sleep(self.config.staging_delay).await;
        }

        {
            let mut inner = self.lock();
            if inner.epoch != run_epoch {
                return;
            }
            inner.state = SimulationState::Generating {
                params: params.clone(),
            };
        }

        let outcome =
            match tokio::time::timeout(self.config.request_timeout, self.client.generate(&params))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(ClientError::Timeout),
            };

        let mut inner = self.lock();
        if inner.epoch != run_epoch {
            tracing::debug!("discarding stale valuation resolution after reset");
            return;
        }
        match outcome {
            Ok(result) => {
                tracing::info!(asset = %params.name, "valuation complete");
                inner.state = SimulationState::Complete { params, result };
            }
            Err(error) => {
                tracing::error!(asset = %params.name, %error, "valuation failed");
                inner.state = SimulationState::Error {
                    message: DISPLAY_ERROR_MESSAGE.to_string(),
                };
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock is never held across an await; poisoning would mean a panic
        // while holding it, which we treat as fatal.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
