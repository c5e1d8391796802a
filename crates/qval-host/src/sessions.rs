//! In-memory session registry.
//!
//! Each browser tab owns one `Session`; nothing is persisted and nothing is
//! shared between sessions beyond the completion client itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use qval_engine::{EngineConfig, Session};
use qval_llm::ValuationClient;
use uuid::Uuid;

pub struct SessionRegistry {
    client: Arc<dyn ValuationClient>,
    engine_config: EngineConfig,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
    pub fn new(client: Arc<dyn ValuationClient>, engine_config: EngineConfig) -> Self {
        Self {
            client,
            engine_config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session::new(self.client.clone(), self.engine_config.clone());
        self.lock().insert(id, session);
        tracing::debug!(%id, "session created");
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Session> {
        self.lock().get(id).cloned()
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.lock().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Session>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
