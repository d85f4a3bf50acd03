//! # Quill API Server
//!
//! HTTP surface of the blog backend: configuration, shared state, the
//! request pipeline (auth gate, validation, error mapping) and handlers.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
