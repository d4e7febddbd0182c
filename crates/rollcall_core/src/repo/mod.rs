//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define storage access contracts for counters and student records.
//! - Isolate SQL details from registrar orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`DuplicateRollNo`, `NotFound`)
//!   in addition to storage transport errors.
//! - Student write paths never invent or rewrite roll numbers.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod counter_store;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage and persistence errors for counter and student operations.
#[derive(Debug)]
pub enum RepoError {
    /// Transport-level failure; the store is unavailable or rejected the call.
    Db(DbError),
    /// A student row with this roll number already exists.
    DuplicateRollNo(String),
    /// No student row exists for this roll number.
    NotFound(String),
    /// Persisted state violates the record shape this binary expects.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateRollNo(roll_no) => {
                write!(f, "roll number already taken: {roll_no}")
            }
            Self::NotFound(roll_no) => write!(f, "student not found: {roll_no}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted student data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateRollNo(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
