//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared,
//! clonable resources handed to every handler.

use crate::config::Config;
use biolearn_core::content::ContentService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub content_service: Arc<dyn ContentService>,
    pub config: Arc<Config>,
}
