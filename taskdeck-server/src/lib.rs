//! Taskdeck server library.
//!
//! Exposes the configuration layer, the JSON-file storage medium, the
//! ordered task store, and the axum HTTP surface for use in tests and
//! embedding.

pub mod config;
pub mod http;
pub mod storage;
pub mod store;
