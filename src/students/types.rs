//! Core record types and the error taxonomy for student operations.

use crate::generation::GenerationClientError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned by the store; never reused.
pub type StudentId = u64;

/// A stored learner record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier.
    pub id: StudentId,
    /// Non-empty display name.
    pub name: String,
    /// Non-empty contact email.
    pub email: String,
    /// Age in years, always at least one.
    pub age: u32,
}

/// Validated field values for a create or update, not yet bound to an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    /// Non-empty name, as sent.
    pub name: String,
    /// Non-empty email, as sent.
    pub email: String,
    /// Strictly positive age.
    pub age: u32,
}

impl StudentDraft {
    pub(crate) fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}

/// Errors reported by student operations.
#[derive(Debug, Error)]
pub enum StudentError {
    /// Malformed or missing required field.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No record carries the requested id.
    #[error("Student not found: {0}")]
    NotFound(StudentId),
    /// The generation step produced no result.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(#[from] GenerationClientError),
}

impl StudentError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
