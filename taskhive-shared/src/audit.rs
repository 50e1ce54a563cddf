/// Security-relevant audit events
///
/// Audit events are structured tracing events under the `audit` target,
/// so operators can route them to a separate sink with an `EnvFilter`
/// directive such as `audit=info`.
use uuid::Uuid;

/// Records a successful login
pub fn log_login(user_id: Uuid, email: &str) {
    tracing::info!(
        target: "audit",
        event = "login",
        user_id = %user_id,
        email = %email,
    );
}

/// Records account creation
pub fn log_account_created(user_id: Uuid, email: &str) {
    tracing::info!(
        target: "audit",
        event = "account_created",
        user_id = %user_id,
        email = %email,
    );
}

/// Records a token refresh
pub fn log_token_refresh(user_id: Uuid) {
    tracing::info!(
        target: "audit",
        event = "token_refresh",
        user_id = %user_id,
    );
}

/// Records task creation
pub fn log_task_created(user_id: Uuid, task_id: Uuid, organization_id: Uuid) {
    tracing::info!(
        target: "audit",
        event = "task_created",
        user_id = %user_id,
        task_id = %task_id,
        organization_id = %organization_id,
    );
}

/// Records a task update
pub fn log_task_updated(user_id: Uuid, task_id: Uuid, organization_id: Uuid) {
    tracing::info!(
        target: "audit",
        event = "task_updated",
        user_id = %user_id,
        task_id = %task_id,
        organization_id = %organization_id,
    );
}

/// Records a task deletion
pub fn log_task_deleted(user_id: Uuid, task_id: Uuid, organization_id: Uuid) {
    tracing::info!(
        target: "audit",
        event = "task_deleted",
        user_id = %user_id,
        task_id = %task_id,
        organization_id = %organization_id,
    );
}
