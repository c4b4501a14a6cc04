//! Inbound create/update payloads and their normalization.
//!
//! Clients send `age` either as a JSON number or as text. The payload keeps that loose shape
//! until [`StudentInput::normalize`] turns it into a [`StudentDraft`] or rejects it.

use super::types::{StudentDraft, StudentError};
use serde::Deserialize;

/// Age as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AgeField {
    /// JSON integer.
    Integer(i64),
    /// JSON number with a fractional part or exponent.
    Float(f64),
    /// Text expected to hold an integer.
    Text(String),
}

impl AgeField {
    fn to_age(&self) -> Result<u32, StudentError> {
        let value = match self {
            Self::Integer(value) => *value,
            Self::Float(value) => {
                return Err(StudentError::invalid(format!(
                    "age must be a whole number, got {value}"
                )));
            }
            Self::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                StudentError::invalid(format!("age must be an integer, got {text:?}"))
            })?,
        };
        if value <= 0 {
            return Err(StudentError::invalid("age must be greater than zero"));
        }
        u32::try_from(value).map_err(|_| StudentError::invalid("age is out of range"))
    }
}

impl From<i64> for AgeField {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for AgeField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Candidate fields for a create or update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentInput {
    /// Display name; required and non-empty.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact email; required and non-empty.
    #[serde(default)]
    pub email: Option<String>,
    /// Age as number or text; required and strictly positive.
    #[serde(default)]
    pub age: Option<AgeField>,
}

impl StudentInput {
    /// Convenience constructor for callers that already hold the three fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        age: impl Into<AgeField>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            age: Some(age.into()),
        }
    }

    /// Validate and normalize into a [`StudentDraft`].
    pub fn normalize(self) -> Result<StudentDraft, StudentError> {
        let name = required_text(self.name, "name")?;
        let email = required_text(self.email, "email")?;
        let age = self
            .age
            .ok_or_else(|| StudentError::invalid("age is required"))?
            .to_age()?;
        Ok(StudentDraft { name, email, age })
    }
}

/// Name and email are stored exactly as sent; only the empty string is rejected.
fn required_text(value: Option<String>, field: &str) -> Result<String, StudentError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(StudentError::invalid(format!("{field} must not be empty"))),
    }
}
