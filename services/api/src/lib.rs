//! Biology Learning API Library Crate
//!
//! This library contains the web service around `biolearn-core`: configuration,
//! the shared application state, request/response models, handlers, and
//! routing. The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
