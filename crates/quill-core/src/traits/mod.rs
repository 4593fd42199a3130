//! Core traits for quill providers.

mod summary_service;

pub use summary_service::*;
