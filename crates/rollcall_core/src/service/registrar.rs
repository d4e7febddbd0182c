//! Student registrar: roll-number allocation policy and create-or-update
//! orchestration.
//!
//! # Responsibility
//! - Decide between the update branch (natural key found) and the
//!   allocate-then-insert branch.
//! - Own the bootstrap reset rule and the bounded conflict retry loop.
//!
//! # Invariants
//! - Draft validation happens before any counter mutation.
//! - The counter is mutated only on the allocate branch; updates never touch
//!   it.
//! - A roll number returned to the caller is persisted exactly once; a raced
//!   duplicate is retried with a fresh counter value, never overwritten.
//!
//! # Concurrency
//! The empty-collection check and the counter reset are two separate store
//! calls, so two callers bootstrapping an empty collection can interleave and
//! derive the same roll number. The `roll_no` primary key rejects the loser,
//! and the retry loop re-increments onto a fresh value, so persisted roll
//! numbers stay unique. Counter values skipped by abandoned or raced
//! allocations are left as gaps.

use crate::model::student::{format_roll_no, Student, StudentDraft, StudentValidationError};
use crate::repo::counter_store::{CounterStore, ROLL_NO_COUNTER};
use crate::repo::student_repo::StudentRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound on insert attempts per registration before giving up.
const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

pub type RegistrarResult<T> = Result<T, RegistrarError>;

/// Registration failures, distinguished so callers can tell input problems
/// and allocation races apart from plain storage outages.
#[derive(Debug)]
pub enum RegistrarError {
    /// Draft rejected before any allocation was attempted.
    ValidationFailed(StudentValidationError),
    /// The datastore failed; propagated unmodified, no local recovery.
    StorageUnavailable(RepoError),
    /// Every allocation attempt collided with an existing roll number.
    AllocationConflict { attempts: u32 },
}

impl Display for RegistrarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed(err) => write!(f, "{err}"),
            Self::StorageUnavailable(err) => write!(f, "{err}"),
            Self::AllocationConflict { attempts } => write!(
                f,
                "could not allocate a unique roll number after {attempts} attempts"
            ),
        }
    }
}

impl Error for RegistrarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValidationFailed(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::AllocationConflict { .. } => None,
        }
    }
}

impl From<StudentValidationError> for RegistrarError {
    fn from(value: StudentValidationError) -> Self {
        Self::ValidationFailed(value)
    }
}

impl From<RepoError> for RegistrarError {
    fn from(value: RepoError) -> Self {
        Self::StorageUnavailable(value)
    }
}

/// Registration use-case service over counter and student stores.
pub struct Registrar<C: CounterStore, S: StudentRepository> {
    counters: C,
    students: S,
}

impl<C: CounterStore, S: StudentRepository> Registrar<C, S> {
    /// Creates a registrar over the provided store implementations.
    pub fn new(counters: C, students: S) -> Self {
        Self { counters, students }
    }

    /// Registers a new student or updates an existing one.
    ///
    /// `natural_key` is only a lookup key: when it matches an existing
    /// record, that record's fields are replaced in place and its roll number
    /// is untouched. When it matches nothing (or is `None`), a fresh roll
    /// number is allocated and a new record inserted.
    ///
    /// # Errors
    /// - [`RegistrarError::ValidationFailed`] before any counter mutation.
    /// - [`RegistrarError::StorageUnavailable`] on datastore failure.
    /// - [`RegistrarError::AllocationConflict`] when every bounded attempt
    ///   collided with an existing roll number.
    pub fn register_or_update(
        &self,
        natural_key: Option<&str>,
        draft: &StudentDraft,
    ) -> RegistrarResult<Student> {
        draft.validate()?;

        if let Some(key) = natural_key {
            if self.students.find_by_roll_no(key)?.is_some() {
                let student = self.students.update_fields(key, draft)?;
                info!(
                    "event=student_updated module=registrar status=ok roll_no={}",
                    student.roll_no
                );
                return Ok(student);
            }
            // Unknown key: treated as a fresh insert, the key is discarded.
        }

        self.allocate_and_insert(draft)
    }

    /// Looks up one student by roll number.
    pub fn find_student(&self, roll_no: &str) -> RegistrarResult<Option<Student>> {
        Ok(self.students.find_by_roll_no(roll_no)?)
    }

    /// Lists all students ordered by roll number.
    pub fn list_students(&self) -> RegistrarResult<Vec<Student>> {
        Ok(self.students.list()?)
    }

    fn allocate_and_insert(&self, draft: &StudentDraft) -> RegistrarResult<Student> {
        // Bootstrap rule: numbering restarts at 1 for the first record of an
        // empty collection. Check and reset are separate store calls; see the
        // module docs for why a raced duplicate here is still safe.
        if self.students.count()? == 0 {
            self.counters.reset(ROLL_NO_COUNTER, 0)?;
            info!("event=counter_bootstrap_reset module=registrar status=ok");
        }

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let sequence = self.counters.increment_and_fetch(ROLL_NO_COUNTER)?;
            let roll_no = format_roll_no(sequence);

            match self.students.insert(&roll_no, draft) {
                Ok(student) => {
                    info!(
                        "event=roll_allocated module=registrar status=ok roll_no={} attempt={attempt}",
                        student.roll_no
                    );
                    return Ok(student);
                }
                Err(RepoError::DuplicateRollNo(taken)) => {
                    warn!(
                        "event=roll_conflict module=registrar status=retry roll_no={taken} attempt={attempt}"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(RegistrarError::AllocationConflict {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }
}
