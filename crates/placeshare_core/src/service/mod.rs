//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod place_service;
