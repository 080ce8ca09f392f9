//! HTTP front of the n-gram suggestion model.

/// Endpoints and the shared application state.
pub mod api;

/// Command-line configuration.
pub mod config;
