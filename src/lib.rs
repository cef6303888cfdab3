//! Liber Library Lending Server
//!
//! A small library lending system: a catalog of items, a roster of patrons
//! and an invariant-preserving borrow/return protocol, persisted to plain
//! text record files and exposed over a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use store::LibraryStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<LibraryStore>,
}
