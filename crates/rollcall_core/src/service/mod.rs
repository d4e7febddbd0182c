//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate counter and student repositories into the registration
//!   use-case.
//! - Keep callers decoupled from storage details.

pub mod registrar;
