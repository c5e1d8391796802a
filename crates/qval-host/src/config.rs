use std::net::SocketAddr;

use qval_engine::EngineConfig;

/// Runtime configuration for the host binary.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            engine: EngineConfig::default(),
        }
    }
}
