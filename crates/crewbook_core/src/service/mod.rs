//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into worker use-cases.
//! - Keep the CLI decoupled from storage details.

pub mod worker_service;
