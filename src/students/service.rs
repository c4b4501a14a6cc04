//! Student operations coordinating validation, the record store, and text generation.

use crate::{
    generation::GenerationClient,
    metrics::{MetricsSnapshot, StudentMetrics},
    students::{
        input::StudentInput,
        store::StudentStore,
        types::{Student, StudentError, StudentId},
    },
};
use async_trait::async_trait;

/// Owns the record store and the generation client shared by every request.
///
/// Construct once near process start and share it through an `Arc`.
pub struct StudentService {
    store: StudentStore,
    generator: Box<dyn GenerationClient>,
    metrics: StudentMetrics,
}

/// Abstraction over student operations used by the HTTP surface.
#[async_trait]
pub trait StudentApi: Send + Sync {
    /// Validate the input and store a new record under the next id.
    async fn create(&self, input: StudentInput) -> Result<Student, StudentError>;

    /// Every stored record, unordered.
    async fn list(&self) -> Vec<Student>;

    /// A single record by id.
    async fn get(&self, id: StudentId) -> Result<Student, StudentError>;

    /// Validate the input, then replace the fields of an existing record.
    async fn update(&self, id: StudentId, input: StudentInput) -> Result<Student, StudentError>;

    /// Remove a record, returning what was removed.
    async fn delete(&self, id: StudentId) -> Result<Student, StudentError>;

    /// Generated prose describing a record.
    async fn summarize(&self, id: StudentId) -> Result<String, StudentError>;

    /// Current operation counters.
    fn metrics_snapshot(&self) -> MetricsSnapshot;

    /// Number of records held right now.
    async fn count(&self) -> usize;
}

impl StudentService {
    /// Build a service with an empty store.
    pub fn new(generator: Box<dyn GenerationClient>) -> Self {
        Self {
            store: StudentStore::new(),
            generator,
            metrics: StudentMetrics::new(),
        }
    }
}

/// Prompt sent to the generation client for a record.
pub fn summary_prompt(student: &Student) -> String {
    format!(
        "Write a short, friendly summary of the following student profile. \
         Name: {}. Age: {}. Email: {}.",
        student.name, student.age, student.email
    )
}

#[async_trait]
impl StudentApi for StudentService {
    async fn create(&self, input: StudentInput) -> Result<Student, StudentError> {
        let draft = input.normalize().inspect_err(|error| {
            tracing::warn!(%error, "Rejected create request");
        })?;
        let student = self.store.create(draft).await;
        self.metrics.record_created();
        tracing::info!(id = student.id, name = %student.name, "Created student");
        Ok(student)
    }

    async fn list(&self) -> Vec<Student> {
        let students = self.store.list().await;
        tracing::debug!(count = students.len(), "Listed students");
        students
    }

    async fn get(&self, id: StudentId) -> Result<Student, StudentError> {
        self.store.get(id).await
    }

    async fn update(&self, id: StudentId, input: StudentInput) -> Result<Student, StudentError> {
        // Malformed input wins over a missing id.
        let draft = input.normalize().inspect_err(|error| {
            tracing::warn!(id, %error, "Rejected update request");
        })?;
        let student = self.store.update(id, draft).await?;
        self.metrics.record_updated();
        tracing::info!(id, name = %student.name, "Updated student");
        Ok(student)
    }

    async fn delete(&self, id: StudentId) -> Result<Student, StudentError> {
        let student = self.store.delete(id).await?;
        self.metrics.record_deleted();
        tracing::info!(id, name = %student.name, "Deleted student");
        Ok(student)
    }

    async fn summarize(&self, id: StudentId) -> Result<String, StudentError> {
        // The store lock is released once `get` returns; generation runs unlocked.
        let student = self.store.get(id).await?;
        let prompt = summary_prompt(&student);
        match self.generator.generate(&prompt).await {
            Ok(summary) => {
                self.metrics.record_summary(true);
                tracing::info!(id, chars = summary.len(), "Generated summary");
                Ok(summary)
            }
            Err(error) => {
                self.metrics.record_summary(false);
                tracing::error!(id, %error, "Summary generation failed");
                Err(StudentError::GenerationFailed(error))
            }
        }
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn count(&self) -> usize {
        self.store.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationClientError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Clone, Default)]
    struct FakeGenerator {
        prompts: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl FakeGenerator {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().expect("prompts lock").clone()
        }
    }

    #[async_trait]
    impl GenerationClient for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationClientError> {
            self.prompts
                .lock()
                .expect("prompts lock")
                .push(prompt.to_string());
            if self.fail {
                return Err(GenerationClientError::Transport("connection refused".into()));
            }
            Ok(format!("summary of: {prompt}"))
        }
    }

    /// Generator that signals `entered`, then waits for `release` before answering.
    struct ParkedGenerator {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl GenerationClient for ParkedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationClientError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok("released".into())
        }
    }

    fn service_with(generator: FakeGenerator) -> StudentService {
        StudentService::new(Box::new(generator))
    }

    #[tokio::test]
    async fn scenario_from_create_to_reuse_free_ids() {
        let service = service_with(FakeGenerator::default());

        let ava = service
            .create(StudentInput::new("Ava", "a@x.com", 20_i64))
            .await
            .expect("create ava");
        let bo = service
            .create(StudentInput::new("Bo", "b@x.com", 22_i64))
            .await
            .expect("create bo");
        assert_eq!((ava.id, bo.id), (1, 2));

        let deleted = service.delete(1).await.expect("delete ava");
        assert_eq!(deleted, ava);
        assert!(matches!(service.get(1).await, Err(StudentError::NotFound(1))));
        assert_eq!(service.list().await, vec![bo]);

        let cy = service
            .create(StudentInput::new("Cy", "c@x.com", 19_i64))
            .await
            .expect("create cy");
        assert_eq!(cy.id, 3);

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.created, 3);
        assert_eq!(snapshot.deleted, 1);
        assert_eq!(service.count().await, 2);
    }

    #[tokio::test]
    async fn created_record_is_retrievable_unchanged() {
        let service = service_with(FakeGenerator::default());
        let created = service
            .create(StudentInput::new("Ava", "a@x.com", "20"))
            .await
            .expect("create");

        assert_eq!(created.age, 20);
        assert_eq!(service.get(created.id).await.expect("get"), created);
    }

    #[tokio::test]
    async fn invalid_create_leaves_store_untouched() {
        let service = service_with(FakeGenerator::default());
        let invalid = [
            StudentInput::new("", "a@x.com", 20_i64),
            StudentInput::new("Ava", "", 20_i64),
            StudentInput::new("Ava", "a@x.com", 0_i64),
            StudentInput::new("Ava", "a@x.com", "abc"),
            StudentInput::default(),
        ];
        for input in invalid {
            assert!(matches!(
                service.create(input).await,
                Err(StudentError::InvalidInput(_))
            ));
        }

        assert!(service.list().await.is_empty());
        let next = service
            .create(StudentInput::new("Ava", "a@x.com", 20_i64))
            .await
            .expect("create");
        assert_eq!(next.id, 1);
    }

    #[tokio::test]
    async fn update_validates_before_checking_existence() {
        let service = service_with(FakeGenerator::default());

        let invalid = service
            .update(42, StudentInput::new("Ava", "a@x.com", -1_i64))
            .await;
        assert!(matches!(invalid, Err(StudentError::InvalidInput(_))));

        let missing = service
            .update(42, StudentInput::new("Ava", "a@x.com", 20_i64))
            .await;
        assert!(matches!(missing, Err(StudentError::NotFound(42))));
    }

    #[tokio::test]
    async fn invalid_update_keeps_existing_record() {
        let service = service_with(FakeGenerator::default());
        let created = service
            .create(StudentInput::new("Ava", "a@x.com", 20_i64))
            .await
            .expect("create");

        let result = service
            .update(created.id, StudentInput::new("Ava", "a@x.com", "old"))
            .await;

        assert!(matches!(result, Err(StudentError::InvalidInput(_))));
        assert_eq!(service.get(created.id).await.expect("get"), created);
        assert_eq!(service.metrics_snapshot().updated, 0);
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let service = service_with(FakeGenerator::default());
        let created = service
            .create(StudentInput::new("Ava", "a@x.com", 20_i64))
            .await
            .expect("create");

        let updated = service
            .update(created.id, StudentInput::new("Ava Lee", "ava@x.com", "21"))
            .await
            .expect("update");

        assert_eq!(
            updated,
            Student {
                id: created.id,
                name: "Ava Lee".into(),
                email: "ava@x.com".into(),
                age: 21,
            }
        );
        assert_eq!(service.get(created.id).await.expect("get"), updated);
    }

    #[tokio::test]
    async fn summarize_passes_profile_prompt_to_generator() {
        let generator = FakeGenerator::default();
        let service = service_with(generator.clone());
        let ava = service
            .create(StudentInput::new("Ava", "a@x.com", 20_i64))
            .await
            .expect("create");

        let summary = service.summarize(ava.id).await.expect("summary");

        let prompts = generator.prompts();
        assert_eq!(prompts, vec![summary_prompt(&ava)]);
        assert_eq!(summary, format!("summary of: {}", prompts[0]));
        for field in ["Ava", "20", "a@x.com"] {
            assert!(prompts[0].contains(field), "prompt lacks {field}");
        }
        assert_eq!(service.metrics_snapshot().summaries_generated, 1);
    }

    #[tokio::test]
    async fn summarize_missing_id_skips_generator() {
        let generator = FakeGenerator::default();
        let service = service_with(generator.clone());

        let result = service.summarize(9).await;

        assert!(matches!(result, Err(StudentError::NotFound(9))));
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn generator_failure_surfaces_and_keeps_record() {
        let service = service_with(FakeGenerator::failing());
        let ava = service
            .create(StudentInput::new("Ava", "a@x.com", 20_i64))
            .await
            .expect("create");

        let result = service.summarize(ava.id).await;

        assert!(matches!(
            result,
            Err(StudentError::GenerationFailed(GenerationClientError::Transport(_)))
        ));
        assert_eq!(service.get(ava.id).await.expect("get"), ava);
        assert_eq!(service.metrics_snapshot().summaries_failed, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn writes_complete_while_summary_is_generating() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let service = Arc::new(StudentService::new(Box::new(ParkedGenerator {
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        })));
        let ava = service
            .create(StudentInput::new("Ava", "a@x.com", 20_i64))
            .await
            .expect("create ava");
        let ava_id = ava.id;

        let summarizing = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.summarize(ava_id).await }
        });
        entered.notified().await;

        let writes = async {
            let bo = service
                .create(StudentInput::new("Bo", "b@x.com", 22_i64))
                .await
                .expect("create while generating");
            service
                .update(ava_id, StudentInput::new("Ava Lee", "ava@x.com", 21_i64))
                .await
                .expect("update while generating");
            service.delete(bo.id).await.expect("delete while generating");
            service.list().await
        };
        let listed = tokio::time::timeout(Duration::from_secs(2), writes)
            .await
            .expect("store writes blocked behind generation");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Ava Lee");

        release.notify_one();
        let summary = summarizing
            .await
            .expect("summarize task")
            .expect("summary");
        assert_eq!(summary, "released");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_update_and_delete_leave_consistent_state() {
        for _ in 0..50 {
            let service = Arc::new(service_with(FakeGenerator::default()));
            let original = service
                .create(StudentInput::new("Ava", "a@x.com", 20_i64))
                .await
                .expect("create");
            let id = original.id;

            let updater = tokio::spawn({
                let service = Arc::clone(&service);
                async move {
                    service
                        .update(id, StudentInput::new("Ava Lee", "ava@x.com", 21_i64))
                        .await
                }
            });
            let deleter = tokio::spawn({
                let service = Arc::clone(&service);
                async move { service.delete(id).await }
            });

            let updated = updater.await.expect("update task");
            let deleted = deleter
                .await
                .expect("delete task")
                .expect("delete always finds the record");

            match updated {
                Ok(record) => {
                    assert_eq!(record.id, id);
                    assert_eq!(deleted, record);
                }
                Err(StudentError::NotFound(missing)) => {
                    assert_eq!(missing, id);
                    assert_eq!(deleted, original);
                }
                Err(other) => panic!("unexpected update error: {other}"),
            }
            assert!(matches!(service.get(id).await, Err(StudentError::NotFound(_))));
            assert_eq!(service.count().await, 0);
            assert!(service.list().await.is_empty());
        }
    }
}
