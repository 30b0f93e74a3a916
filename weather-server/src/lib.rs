//! HTTP surface for the weather aggregation backend.
//!
//! Thin layer over `weather-core`: routing, bearer-token auth, and the
//! mapping from the core failure taxonomy to HTTP statuses and bodies.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use state::AppState;
