//! Upload storage implementations.

mod local;

pub use local::LocalUploadStorage;
