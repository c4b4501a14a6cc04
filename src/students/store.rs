//! In-memory record store.

use super::types::{Student, StudentDraft, StudentError, StudentId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Owner of every student record and of the id counter.
///
/// A single lock guards both the map and the counter, so each write observes and leaves them
/// consistent. Readers share the lock and always see fully applied writes. Callers get clones.
#[derive(Default)]
pub struct StudentStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    students: HashMap<StudentId, Student>,
    last_id: StudentId,
}

impl StudentStore {
    /// Create an empty store with the counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id and insert the record.
    pub async fn create(&self, draft: StudentDraft) -> Student {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let student = draft.into_student(inner.last_id);
        inner.students.insert(student.id, student.clone());
        student
    }

    /// All records, in no particular order.
    pub async fn list(&self) -> Vec<Student> {
        self.inner.read().await.students.values().cloned().collect()
    }

    /// Copy of the record stored under `id`.
    pub async fn get(&self, id: StudentId) -> Result<Student, StudentError> {
        self.inner
            .read()
            .await
            .students
            .get(&id)
            .cloned()
            .ok_or(StudentError::NotFound(id))
    }

    /// Replace name, email and age of an existing record; the id is kept.
    pub async fn update(
        &self,
        id: StudentId,
        draft: StudentDraft,
    ) -> Result<Student, StudentError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .students
            .get_mut(&id)
            .ok_or(StudentError::NotFound(id))?;
        *slot = draft.into_student(id);
        Ok(slot.clone())
    }

    /// Remove a record and hand it back. The id is not recycled.
    pub async fn delete(&self, id: StudentId) -> Result<Student, StudentError> {
        self.inner
            .write()
            .await
            .students
            .remove(&id)
            .ok_or(StudentError::NotFound(id))
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.students.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
