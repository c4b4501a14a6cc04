#![deny(missing_docs)]

//! Core library for the student records service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text generation client abstraction and the Ollama adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Operation counters.
pub mod metrics;
/// Student records, storage, and operations.
pub mod students;
