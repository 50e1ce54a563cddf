/// Task endpoints
///
/// All routes here sit behind the bearer-token middleware and read the
/// authenticated caller from request extensions. Every database access
/// binds the caller's organization id, so tasks in other organizations
/// are indistinguishable from tasks that do not exist.
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task
/// - `GET /tasks` - List the caller's tasks with filters and pagination
/// - `GET /tasks/stats` - Aggregate counts for the caller's organization
/// - `GET /tasks/{id}` - Fetch one task
/// - `PATCH /tasks/{id}` - Partially update a task
/// - `DELETE /tasks/{id}` - Delete a task
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskhive_shared::{
    audit,
    auth::{middleware::CurrentUser, policy::Action},
    models::task::{
        CreateTask, Task, TaskFilter, TaskPriority, TaskStats, TaskStatus, UpdateTask,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{messages, ApiError},
    response::{Created, Success},
};

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    pub status: Option<TaskStatus>,

    /// Initial priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Labels
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial task update request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// Replacement tag list
    pub tags: Option<Vec<String>>,

    /// New assignee
    pub assigned_to: Option<Uuid>,
}

/// List query parameters
#[derive(Debug, Deserialize, Validate)]
pub struct TasksQuery {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: i64,

    /// Page size
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: i64,

    /// Restrict to one status
    pub status: Option<TaskStatus>,

    /// Restrict to one priority
    pub priority: Option<TaskPriority>,

    /// Case-insensitive substring over title and description
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Paginated task list payload
#[derive(Debug, Serialize)]
pub struct TaskPage {
    /// Tasks on this page, newest first
    pub tasks: Vec<Task>,

    /// Total tasks matching the filters
    pub total: i64,

    /// Requested page number
    pub page: i64,

    /// Total number of pages
    pub pages: i64,
}

/// Computes the OFFSET for a page, saturating so an absurd page number
/// cannot overflow into a negative offset
fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

/// Resolves the caller's organization or rejects the request
fn require_organization(user: &CurrentUser) -> Result<Uuid, ApiError> {
    user.organization_id
        .ok_or_else(|| ApiError::Forbidden(messages::NO_ORGANIZATION.to_string()))
}

/// Parses a task id path segment
fn parse_task_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(messages::INVALID_TASK_ID.to_string()))
}

/// Loads a task in the caller's organization and checks access
///
/// Cross-organization ids fall out of the scoped query as NotFound;
/// within the organization an insufficient role yields Forbidden.
async fn load_task(state: &AppState, user: &CurrentUser, id: &str) -> Result<Task, ApiError> {
    let task_id = parse_task_id(id)?;
    let organization_id = require_organization(user)?;

    let task = Task::find_scoped(&state.db, task_id, organization_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(messages::TASK_NOT_FOUND.to_string()))?;

    if !user.can_access(task.user_id, task.organization_id) {
        return Err(ApiError::Forbidden(messages::FORBIDDEN.to_string()));
    }

    Ok(task)
}

/// Create a task
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `403 Forbidden`: caller cannot create tasks, or has no organization
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Created<Task>, ApiError> {
    req.validate()?;

    if !user.can_perform(Action::Create) {
        return Err(ApiError::Forbidden(messages::FORBIDDEN.to_string()));
    }
    let organization_id = require_organization(&user)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
            tags: req.tags,
            user_id: user.id,
            organization_id,
        },
    )
    .await?;

    audit::log_task_created(user.id, task.id, organization_id);

    Ok(Created(task))
}

/// List the caller's tasks
///
/// Returns the caller's own tasks within their organization, newest
/// first. Callers without an organization get an empty page.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<TasksQuery>,
) -> Result<Success<TaskPage>, ApiError> {
    query.validate()?;

    let Some(organization_id) = user.organization_id else {
        return Ok(Success(TaskPage {
            tasks: vec![],
            total: 0,
            page: query.page,
            pages: 0,
        }));
    };

    let filter = TaskFilter {
        user_id: Some(user.id),
        status: query.status,
        priority: query.priority,
        search: query.search.clone(),
    };

    let offset = page_offset(query.page, query.limit);
    let (tasks, total) = Task::list(&state.db, organization_id, &filter, query.limit, offset).await?;

    let pages = if total == 0 {
        0
    } else {
        (total + query.limit - 1) / query.limit
    };

    Ok(Success(TaskPage {
        tasks,
        total,
        page: query.page,
        pages,
    }))
}

/// Aggregate task counts
///
/// Counts span the caller's organization, except that callers whose
/// only role is VIEWER see counts over their own tasks alone. Callers
/// without an organization get zeros.
pub async fn task_stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Success<TaskStats>, ApiError> {
    let Some(organization_id) = user.organization_id else {
        return Ok(Success(TaskStats {
            pending: 0,
            in_progress: 0,
            completed: 0,
            total: 0,
        }));
    };

    let user_filter = user.is_viewer_only().then_some(user.id);
    let stats = Task::stats(&state.db, organization_id, user_filter).await?;

    Ok(Success(stats))
}

/// Fetch one task
///
/// # Errors
///
/// - `400 Bad Request`: id is not a UUID
/// - `403 Forbidden`: task is in the caller's organization but their
///   role does not allow access
/// - `404 Not Found`: absent, or outside the caller's organization
pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Success<Task>, ApiError> {
    let task = load_task(&state, &user, &id).await?;
    Ok(Success(task))
}

/// Partially update a task
///
/// # Errors
///
/// - `400 Bad Request`: id is not a UUID, or validation failed
/// - `403 Forbidden`: access or Update permission denied
/// - `404 Not Found`: absent, or outside the caller's organization
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Success<Task>, ApiError> {
    req.validate()?;

    let task = load_task(&state, &user, &id).await?;

    if !user.can_perform(Action::Update) {
        return Err(ApiError::Forbidden(messages::FORBIDDEN.to_string()));
    }

    let updated = Task::update_scoped(
        &state.db,
        task.id,
        task.organization_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
            tags: req.tags,
            assigned_to: req.assigned_to,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(messages::TASK_NOT_FOUND.to_string()))?;

    audit::log_task_updated(user.id, updated.id, updated.organization_id);

    Ok(Success(updated))
}

/// Delete a task
///
/// Returns 204 with no body on success.
///
/// # Errors
///
/// - `400 Bad Request`: id is not a UUID
/// - `403 Forbidden`: access or Delete permission denied
/// - `404 Not Found`: absent, or outside the caller's organization
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let task = load_task(&state, &user, &id).await?;

    if !user.can_perform(Action::Delete) {
        return Err(ApiError::Forbidden(messages::FORBIDDEN.to_string()));
    }

    let deleted = Task::delete_scoped(&state.db, task.id, task.organization_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(messages::TASK_NOT_FOUND.to_string()));
    }

    audit::log_task_deleted(user.id, task.id, task.organization_id);

    Ok(StatusCode::NO_CONTENT)
}
