//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! Entities, the ports infrastructure has to implement, and the user/post
//! services built on top of them. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
