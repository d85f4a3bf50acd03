//! Request interceptors and error mapping.

pub mod auth;
pub mod error;
pub mod validation;
