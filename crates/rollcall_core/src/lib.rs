//! Core domain logic for rollcall: sequential roll-number allocation and
//! student registration over a shared datastore.
//! This crate is the single source of truth for allocation invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{
    format_roll_no, Student, StudentDraft, StudentValidationError, FACE_ENCODING_LEN,
};
pub use repo::counter_store::{CounterStore, SqliteCounterStore, ROLL_NO_COUNTER};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::registrar::{Registrar, RegistrarError, RegistrarResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
