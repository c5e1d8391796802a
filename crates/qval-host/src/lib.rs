//! HTTP surface for the Q-Val valuation service.
//!
//! Serves the single-page form/report shell plus a small JSON API that
//! drives one simulation session per browser tab.

pub mod config;
pub mod http;
pub mod sessions;

pub use config::ServerConfig;
pub use sessions::SessionRegistry;
