//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record persisted under a roll number.
//! - Provide the draft shape callers submit before a roll number exists.
//! - Render counter values as zero-padded roll numbers.
//!
//! # Invariants
//! - `roll_no` is unique across all students and immutable once assigned.
//! - The registrar is the sole writer of `roll_no`; callers only pass it
//!   back as a lookup key.
//! - `face_encoding` has exactly [`FACE_ENCODING_LEN`] components.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declared length of the opaque biometric template, in `f32` components.
///
/// The contents are never interpreted by core; only the length is enforced.
pub const FACE_ENCODING_LEN: usize = 128;

/// Minimum rendered width of a roll number, in decimal digits.
pub const ROLL_NO_MIN_WIDTH: usize = 2;

/// Canonical student record as persisted by the registrar.
///
/// The serde names match the external record shape consumed by enrollment
/// and attendance tooling, which predates this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Generated, zero-padded sequential identifier.
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    /// Display name. Required.
    pub name: String,
    /// Contact address. Optional.
    pub email: Option<String>,
    /// Opaque biometric template of fixed length.
    #[serde(rename = "faceEncoding")]
    pub face_encoding: Vec<f32>,
    /// Creation time in epoch milliseconds, filled by the store.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    /// Last update time in epoch milliseconds, bumped by the store.
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// Caller-supplied student fields, before any roll number exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDraft {
    /// Display name. Required.
    pub name: String,
    /// Contact address. Optional.
    pub email: Option<String>,
    /// Opaque biometric template of fixed length.
    #[serde(rename = "faceEncoding")]
    pub face_encoding: Vec<f32>,
}

impl StudentDraft {
    /// Creates a draft with the given name and encoding, no email.
    pub fn new(name: impl Into<String>, face_encoding: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            email: None,
            face_encoding,
        }
    }

    /// Checks draft fields before any allocation or persistence happens.
    ///
    /// # Errors
    /// - [`StudentValidationError::MissingName`] when `name` is empty or
    ///   whitespace-only.
    /// - [`StudentValidationError::BadEncodingLength`] when the encoding does
    ///   not have exactly [`FACE_ENCODING_LEN`] components.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::MissingName);
        }
        if self.face_encoding.len() != FACE_ENCODING_LEN {
            return Err(StudentValidationError::BadEncodingLength {
                actual: self.face_encoding.len(),
            });
        }
        Ok(())
    }
}

/// Draft field violations surfaced before any counter mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentValidationError {
    /// `name` is required and must contain at least one non-space character.
    MissingName,
    /// `face_encoding` must contain exactly [`FACE_ENCODING_LEN`] values.
    BadEncodingLength { actual: usize },
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "student name is required"),
            Self::BadEncodingLength { actual } => write!(
                f,
                "face encoding must have {FACE_ENCODING_LEN} components, got {actual}"
            ),
        }
    }
}

impl Error for StudentValidationError {}

/// Renders a counter value as a roll number.
///
/// Pads to a minimum of [`ROLL_NO_MIN_WIDTH`] digits; values that need more
/// digits are rendered at their natural width (`103 -> "103"`).
pub fn format_roll_no(sequence: i64) -> String {
    format!("{sequence:0width$}", width = ROLL_NO_MIN_WIDTH)
}
