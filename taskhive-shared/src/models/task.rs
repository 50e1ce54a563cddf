/// Task model and database operations
///
/// Tasks belong to exactly one user and one organization. Every query
/// below that reads or mutates an existing task binds both the task id
/// and an organization id, so rows outside the caller's organization
/// are structurally invisible rather than filtered after the fact.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed', 'cancelled');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'urgent');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     user_id UUID NOT NULL REFERENCES users(id),
///     organization_id UUID NOT NULL REFERENCES organizations(id),
///     assigned_to UUID REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Finished
    Completed,

    /// Abandoned
    Cancelled,
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Default priority
    Medium,

    /// High priority
    High,

    /// Urgent, needs attention now
    Urgent,
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task id
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Lifecycle state
    pub status: TaskStatus,

    /// Priority level
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Free-form labels
    pub tags: Vec<String>,

    /// User who created the task
    pub user_id: Uuid,

    /// Organization the task belongs to
    pub organization_id: Uuid,

    /// Optional assignee
    pub assigned_to: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    pub status: Option<TaskStatus>,

    /// Initial priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Labels
    pub tags: Vec<String>,

    /// Creating user
    pub user_id: Uuid,

    /// Organization the task is scoped to
    pub organization_id: Uuid,
}

/// Input for updating a task; None fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
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

impl UpdateTask {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
            && self.assigned_to.is_none()
    }
}

/// Filters for listing tasks within an organization
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Restrict to a single creator
    pub user_id: Option<Uuid>,

    /// Restrict to one status
    pub status: Option<TaskStatus>,

    /// Restrict to one priority
    pub priority: Option<TaskPriority>,

    /// Case-insensitive substring over title and description
    pub search: Option<String>,
}

/// Aggregate task counts for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Tasks in the pending state
    pub pending: i64,

    /// Tasks in progress
    pub in_progress: i64,

    /// Completed tasks
    pub completed: i64,

    /// All tasks regardless of state
    pub total: i64,
}

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, tags, \
                            user_id, organization_id, assigned_to, created_at, updated_at";

/// Builds an ILIKE pattern matching `term` as a literal substring
///
/// Backslash is escaped first so user-supplied escapes cannot leak into
/// the pattern.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl Task {
    /// Creates a task scoped to the caller's organization
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, due_date, tags, user_id, organization_id)
            VALUES ($1, $2, COALESCE($3, 'pending'), COALESCE($4, 'medium'), $5, $6, $7, $8)
            RETURNING id, title, description, status, priority, due_date, tags,
                      user_id, organization_id, assigned_to, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.tags)
        .bind(data.user_id)
        .bind(data.organization_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id within an organization
    ///
    /// A task outside `organization_id` comes back as None, identical to
    /// a task that does not exist.
    pub async fn find_scoped(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, due_date, tags,
                   user_id, organization_id, assigned_to, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks in an organization with filters and pagination
    ///
    /// # Returns
    ///
    /// The page of tasks (newest first) and the total count matching the
    /// filters, for computing page totals.
    pub async fn list(
        pool: &PgPool,
        organization_id: Uuid,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = vec!["organization_id = $1".to_string()];
        let mut bind_count = 1;

        if filter.user_id.is_some() {
            bind_count += 1;
            conditions.push(format!("user_id = ${bind_count}"));
        }
        if filter.status.is_some() {
            bind_count += 1;
            conditions.push(format!("status = ${bind_count}"));
        }
        if filter.priority.is_some() {
            bind_count += 1;
            conditions.push(format!("priority = ${bind_count}"));
        }
        if filter.search.is_some() {
            bind_count += 1;
            conditions.push(format!(
                "(title ILIKE ${bind_count} OR description ILIKE ${bind_count})"
            ));
        }

        let where_clause = conditions.join(" AND ");

        let count_sql = format!("SELECT COUNT(*) FROM tasks WHERE {where_clause}");
        let list_sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            bind_count + 1,
            bind_count + 2
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(organization_id);
        let mut list_query = sqlx::query_as::<_, Task>(&list_sql).bind(organization_id);

        if let Some(user_id) = filter.user_id {
            count_query = count_query.bind(user_id);
            list_query = list_query.bind(user_id);
        }
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
            list_query = list_query.bind(status);
        }
        if let Some(priority) = filter.priority {
            count_query = count_query.bind(priority);
            list_query = list_query.bind(priority);
        }
        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            count_query = count_query.bind(pattern.clone());
            list_query = list_query.bind(pattern);
        }

        let total = count_query.fetch_one(pool).await?;
        let tasks = list_query.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((tasks, total))
    }

    /// Applies a partial update to a task within an organization
    ///
    /// # Returns
    ///
    /// The updated task, or None when the id does not exist inside
    /// `organization_id`. An empty update returns the row unchanged.
    pub async fn update_scoped(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_scoped(pool, id, organization_id).await;
        }

        let mut sets = Vec::new();
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            sets.push(format!("title = ${bind_count}"));
        }
        if data.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${bind_count}"));
        }
        if data.status.is_some() {
            bind_count += 1;
            sets.push(format!("status = ${bind_count}"));
        }
        if data.priority.is_some() {
            bind_count += 1;
            sets.push(format!("priority = ${bind_count}"));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            sets.push(format!("due_date = ${bind_count}"));
        }
        if data.tags.is_some() {
            bind_count += 1;
            sets.push(format!("tags = ${bind_count}"));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            sets.push(format!("assigned_to = ${bind_count}"));
        }
        sets.push("updated_at = NOW()".to_string());

        let sql = format!(
            "UPDATE tasks SET {} WHERE id = $1 AND organization_id = $2 RETURNING {TASK_COLUMNS}",
            sets.join(", ")
        );

        let mut query = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(organization_id);

        if let Some(title) = data.title {
            query = query.bind(title);
        }
        if let Some(description) = data.description {
            query = query.bind(description);
        }
        if let Some(status) = data.status {
            query = query.bind(status);
        }
        if let Some(priority) = data.priority {
            query = query.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            query = query.bind(due_date);
        }
        if let Some(tags) = data.tags {
            query = query.bind(tags);
        }
        if let Some(assigned_to) = data.assigned_to {
            query = query.bind(assigned_to);
        }

        let task = query.fetch_optional(pool).await?;
        Ok(task)
    }

    /// Deletes a task within an organization
    ///
    /// # Returns
    ///
    /// True when a row was deleted, false when the id does not exist
    /// inside `organization_id`
    pub async fn delete_scoped(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Computes task counts for an organization
    ///
    /// When `user_id` is given the counts narrow to that user's own
    /// tasks; otherwise they span the whole organization.
    pub async fn stats(
        pool: &PgPool,
        organization_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<TaskStats, sqlx::Error> {
        let sql = if user_id.is_some() {
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                   COUNT(*) AS total
            FROM tasks
            WHERE organization_id = $1 AND user_id = $2
            "#
        } else {
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                   COUNT(*) AS total
            FROM tasks
            WHERE organization_id = $1
            "#
        };

        let mut query = sqlx::query_as::<_, TaskStats>(sql).bind(organization_id);
        if let Some(user_id) = user_id {
            query = query.bind(user_id);
        }

        let stats = query.fetch_one(pool).await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form_is_snake_case() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "in_progress"
        );
        assert_eq!(serde_json::to_value(TaskStatus::Pending).unwrap(), "pending");
    }

    #[test]
    fn test_priority_wire_form_is_lowercase() {
        assert_eq!(serde_json::to_value(TaskPriority::Urgent).unwrap(), "urgent");
        assert_eq!(serde_json::to_value(TaskPriority::Medium).unwrap(), "medium");
    }

    #[test]
    fn test_status_deserializes_from_wire_form() {
        let status: TaskStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);

        assert!(serde_json::from_str::<TaskStatus>("\"IN_PROGRESS\"").is_err());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards_and_backslash() {
        assert_eq!(like_pattern("report"), "%report%");
        assert_eq!(like_pattern("50%_done"), "%50\\%\\_done%");
        // A literal backslash must not turn the following character
        // into an escape sequence
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(like_pattern("\\%"), "%\\\\\\%%");
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let update = UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            due_date: None,
            tags: vec!["q3".to_string()],
            user_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).expect("should serialize");
        assert!(json.get("userId").is_some());
        assert!(json.get("organizationId").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_stats_serializes_camel_case() {
        let stats = TaskStats {
            pending: 3,
            in_progress: 2,
            completed: 5,
            total: 10,
        };

        let json = serde_json::to_value(&stats).expect("should serialize");
        assert_eq!(json["inProgress"], 2);
        assert_eq!(json["total"], 10);
    }
}
