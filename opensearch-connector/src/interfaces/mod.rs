//! Interface definitions for the connector backend.
//!
//! This module defines the abstract `SearchBackend` trait that allows
//! for dependency injection and swappable transport implementations.

mod search_backend;

pub use search_backend::SearchBackend;
