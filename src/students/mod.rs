//! Student records: payload normalization, in-memory storage, and the operations over them.

pub mod input;
mod service;
mod store;
pub mod types;

pub use input::{AgeField, StudentInput};
pub use service::{StudentApi, StudentService, summary_prompt};
pub use store::StudentStore;
pub use types::{Student, StudentDraft, StudentError, StudentId};
