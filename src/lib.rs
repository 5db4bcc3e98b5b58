#![deny(missing_docs)]

//! Core library for the AI Study Helper: turns text, transcripts, and articles into study notes.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// YouTube transcript and web article text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Cleaning, chunking, and study-note pipeline.
pub mod processing;
/// Remote and local summarization backends.
pub mod summarization;
