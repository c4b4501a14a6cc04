//! HTTP surface for the student records service.
//!
//! Routes:
//!
//! - `POST /students` – Create a record from `name`, `email`, `age` (number or text).
//! - `GET /students` – List every record (unordered).
//! - `GET /students/:id` – Fetch one record.
//! - `PUT /students/:id` – Replace `name`, `email`, `age` of a record.
//! - `DELETE /students/:id` – Remove a record and return it.
//! - `GET /students/:id/summary` – Generated summary of a record.
//! - `GET /metrics` – Operation counters and the current record count.
//! - `GET /commands` – Machine-readable command catalog.
//!
//! Errors map to `400` (invalid input), `404` (unknown id) and `502` (generation failed) with a
//! plain-text body.

use crate::metrics::MetricsSnapshot;
use crate::students::{Student, StudentApi, StudentError, StudentId, StudentInput};
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the HTTP router exposing student operations.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: StudentApi + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/students",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            "/students/:id",
            get(get_student::<S>)
                .put(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .route("/students/:id/summary", get(summarize_student::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

async fn create_student<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<Json<Student>, AppError>
where
    S: StudentApi,
{
    let Json(input) = payload?;
    Ok(Json(service.create(input).await?))
}

async fn list_students<S>(State(service): State<Arc<S>>) -> Json<Vec<Student>>
where
    S: StudentApi,
{
    Json(service.list().await)
}

async fn get_student<S>(
    State(service): State<Arc<S>>,
    id: Result<Path<StudentId>, PathRejection>,
) -> Result<Json<Student>, AppError>
where
    S: StudentApi,
{
    let Path(id) = id?;
    Ok(Json(service.get(id).await?))
}

/// Replace a record. Body validation runs before the id is looked up.
async fn update_student<S>(
    State(service): State<Arc<S>>,
    id: Result<Path<StudentId>, PathRejection>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<Json<Student>, AppError>
where
    S: StudentApi,
{
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(service.update(id, input).await?))
}

async fn delete_student<S>(
    State(service): State<Arc<S>>,
    id: Result<Path<StudentId>, PathRejection>,
) -> Result<Json<Student>, AppError>
where
    S: StudentApi,
{
    let Path(id) = id?;
    Ok(Json(service.delete(id).await?))
}

/// Response body for `GET /students/:id/summary`.
#[derive(Serialize)]
struct SummaryResponse {
    id: StudentId,
    summary: String,
}

async fn summarize_student<S>(
    State(service): State<Arc<S>>,
    id: Result<Path<StudentId>, PathRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: StudentApi,
{
    let Path(id) = id?;
    let summary = service.summarize(id).await?;
    Ok(Json(SummaryResponse { id, summary }))
}

/// Response body for `GET /metrics`.
#[derive(Serialize)]
struct MetricsResponse {
    students: usize,
    #[serde(flatten)]
    counters: MetricsSnapshot,
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsResponse>
where
    S: StudentApi,
{
    Json(MetricsResponse {
        students: service.count().await,
        counters: service.metrics_snapshot(),
    })
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

async fn get_commands() -> Json<CommandsResponse> {
    let student_example = json!({ "name": "Ava", "email": "a@x.com", "age": 20 });
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "create_student",
                method: "POST",
                path: "/students",
                description: "Create a student record. `age` may be a number or numeric text.",
                request_example: Some(student_example.clone()),
            },
            CommandDescriptor {
                name: "list_students",
                method: "GET",
                path: "/students",
                description: "Return every stored student record.",
                request_example: None,
            },
            CommandDescriptor {
                name: "get_student",
                method: "GET",
                path: "/students/{id}",
                description: "Return one student record by id.",
                request_example: None,
            },
            CommandDescriptor {
                name: "update_student",
                method: "PUT",
                path: "/students/{id}",
                description: "Replace name, email and age of an existing student.",
                request_example: Some(student_example),
            },
            CommandDescriptor {
                name: "delete_student",
                method: "DELETE",
                path: "/students/{id}",
                description: "Remove a student and return the removed record.",
                request_example: None,
            },
            CommandDescriptor {
                name: "summarize_student",
                method: "GET",
                path: "/students/{id}/summary",
                description: "Generate a short prose summary of a student via the configured \
                              model.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return operation counters and the current record count.",
                request_example: None,
            },
        ],
    })
}

/// Body returned for generation failures; provider details stay in the logs.
const GENERATION_FAILED_MESSAGE: &str = "Failed to generate summary";

struct AppError(StudentError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self.0 {
            StudentError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            StudentError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            StudentError::GenerationFailed(_) => (
                StatusCode::BAD_GATEWAY,
                GENERATION_FAILED_MESSAGE.to_string(),
            ),
        }
        .into_response()
    }
}

impl From<StudentError> for AppError {
    fn from(inner: StudentError) -> Self {
        Self(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(StudentError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self(StudentError::InvalidInput(format!(
            "invalid student id: {}",
            rejection.body_text()
        )))
    }
}
