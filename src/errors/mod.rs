//! Error types and error handling for the front-end.
//!
//! This module defines the error types reported by the scanner and the
//! syntax builder. It includes:
//!
//! - Error records with source span information
//! - Specific error variants for the scan and syntax phases
//! - Machine-readable categories and human-facing suggestions
//!
//! Errors are always returned as data; a single document can report many.

pub mod errors;
