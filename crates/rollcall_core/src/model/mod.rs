//! Domain model for student records and roll-number rendering.
//!
//! # Responsibility
//! - Define the canonical student record and its draft input shape.
//! - Own roll-number formatting and draft validation rules.
//!
//! # Invariants
//! - Every persisted student is identified by a generated `roll_no`.
//! - `roll_no` is assigned exactly once and never rewritten.

pub mod student;
