//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed persistence over the `students` table.
//! - Map the `roll_no` uniqueness constraint to a semantic error the
//!   registrar can retry on.
//! - Keep timestamp maintenance inside the store.
//!
//! # Invariants
//! - `insert` never overwrites an existing row; a key collision surfaces as
//!   `RepoError::DuplicateRollNo`.
//! - `update_fields` touches every caller-owned field and bumps
//!   `updated_at`, but never `roll_no` or `created_at`.

use crate::model::student::{Student, StudentDraft};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, Row};

const STUDENT_SELECT_SQL: &str = "SELECT
    roll_no,
    name,
    email,
    face_encoding,
    created_at,
    updated_at
FROM students";

/// Repository interface for student records keyed by roll number.
pub trait StudentRepository {
    /// Inserts a new record under `roll_no` and returns the persisted row.
    fn insert(&self, roll_no: &str, draft: &StudentDraft) -> RepoResult<Student>;
    /// Replaces the caller-owned fields of an existing record.
    fn update_fields(&self, roll_no: &str, draft: &StudentDraft) -> RepoResult<Student>;
    /// Looks up one record by roll number.
    fn find_by_roll_no(&self, roll_no: &str) -> RepoResult<Option<Student>>;
    /// Counts all student records.
    fn count(&self) -> RepoResult<u64>;
    /// Lists all student records ordered by roll number.
    fn list(&self) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch_persisted(&self, roll_no: &str) -> RepoResult<Student> {
        self.find_by_roll_no(roll_no)?
            .ok_or_else(|| RepoError::NotFound(roll_no.to_string()))
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert(&self, roll_no: &str, draft: &StudentDraft) -> RepoResult<Student> {
        let inserted = self.conn.execute(
            "INSERT INTO students (roll_no, name, email, face_encoding)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                roll_no,
                draft.name.as_str(),
                draft.email.as_deref(),
                encoding_to_blob(&draft.face_encoding),
            ],
        );

        match inserted {
            Ok(_) => self.fetch_persisted(roll_no),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateRollNo(roll_no.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_fields(&self, roll_no: &str, draft: &StudentDraft) -> RepoResult<Student> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                name = ?1,
                email = ?2,
                face_encoding = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE roll_no = ?4;",
            params![
                draft.name.as_str(),
                draft.email.as_deref(),
                encoding_to_blob(&draft.face_encoding),
                roll_no,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(roll_no.to_string()));
        }

        self.fetch_persisted(roll_no)
    }

    fn find_by_roll_no(&self, roll_no: &str) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE roll_no = ?1;"))?;

        let mut rows = stmt.query(params![roll_no])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| {
                row.get::<_, u64>(0)
            })?;
        Ok(count)
    }

    fn list(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY roll_no ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let roll_no: String = row.get("roll_no")?;
    let blob: Vec<u8> = row.get("face_encoding")?;
    let face_encoding = blob_to_encoding(&blob).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "face_encoding blob for `{roll_no}` has {} bytes, not a multiple of 4",
            blob.len()
        ))
    })?;

    Ok(Student {
        roll_no,
        name: row.get("name")?,
        email: row.get("email")?,
        face_encoding,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Packs the encoding as little-endian `f32` bytes for BLOB storage.
fn encoding_to_blob(encoding: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(encoding.len() * 4);
    for component in encoding {
        blob.extend_from_slice(&component.to_le_bytes());
    }
    blob
}

fn blob_to_encoding(blob: &[u8]) -> Option<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return None;
    }
    Some(
        blob.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
}
