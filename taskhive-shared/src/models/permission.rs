/// Permission grant model
///
/// Stores explicit (user, organization, resource, actions) grants.
/// Request authorization today is decided purely from the role set in
/// [`crate::auth::policy`]; these rows record grants for audit and for
/// future fine-grained checks, and are not consulted on the hot path.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE resource AS ENUM ('TASK', 'USER', 'ORGANIZATION');
///
/// CREATE TABLE permissions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id),
///     organization_id UUID NOT NULL REFERENCES organizations(id),
///     role role NOT NULL,
///     resource resource NOT NULL,
///     actions action[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::policy::{Action, Role};

/// Resource class a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Resource {
    /// Task records
    Task,

    /// User accounts
    User,

    /// Organizations
    Organization,
}

/// Permission grant record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Unique grant id
    pub id: Uuid,

    /// Granted user
    pub user_id: Uuid,

    /// Organization the grant is scoped to
    pub organization_id: Uuid,

    /// Role under which the grant was issued
    pub role: Role,

    /// Resource class the actions apply to
    pub resource: Resource,

    /// Granted actions
    pub actions: Vec<Action>,

    /// When the grant was created
    pub created_at: DateTime<Utc>,

    /// When the grant was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a permission grant
#[derive(Debug, Clone)]
pub struct CreatePermission {
    /// Granted user
    pub user_id: Uuid,

    /// Organization scope
    pub organization_id: Uuid,

    /// Issuing role
    pub role: Role,

    /// Resource class
    pub resource: Resource,

    /// Granted actions
    pub actions: Vec<Action>,
}

impl Permission {
    /// Records a permission grant
    pub async fn create(pool: &PgPool, data: CreatePermission) -> Result<Self, sqlx::Error> {
        let permission = sqlx::query_as::<_, Permission>(
            r#"
            INSERT INTO permissions (user_id, organization_id, role, resource, actions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, organization_id, role, resource, actions, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.organization_id)
        .bind(data.role)
        .bind(data.resource)
        .bind(data.actions)
        .fetch_one(pool)
        .await?;

        Ok(permission)
    }

    /// Lists all grants held by a user within an organization
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT id, user_id, organization_id, role, resource, actions, created_at, updated_at
            FROM permissions
            WHERE user_id = $1 AND organization_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(permissions)
    }
}
