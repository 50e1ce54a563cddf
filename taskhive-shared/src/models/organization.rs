/// Organization model and database operations
///
/// Organizations are the tenancy boundary: every task is scoped to
/// exactly one organization, and users carry at most one organization
/// reference. The hierarchy is one level deep: a SUB organization
/// points at a ROOT parent.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE organization_type AS ENUM ('ROOT', 'SUB');
///
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     org_type organization_type NOT NULL DEFAULT 'ROOT',
///     parent_id UUID REFERENCES organizations(id),
///     owner_id UUID NOT NULL REFERENCES users(id),
///     member_ids UUID[] NOT NULL DEFAULT '{}',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Position of an organization in the (two-level) hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "organization_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrganizationType {
    /// Top-level organization
    Root,

    /// Sub-organization with a ROOT parent
    Sub,
}

/// Organization record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Unique organization id
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// ROOT or SUB
    pub org_type: OrganizationType,

    /// Parent organization (SUB only, one level)
    pub parent_id: Option<Uuid>,

    /// User owning the organization
    pub owner_id: Uuid,

    /// Member user ids
    pub member_ids: Vec<Uuid>,

    /// Inactive organizations reject no requests yet; the flag exists
    /// for administrative soft-disable
    pub is_active: bool,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an organization
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// ROOT or SUB
    pub org_type: OrganizationType,

    /// Parent organization id (SUB only)
    pub parent_id: Option<Uuid>,

    /// Owning user
    pub owner_id: Uuid,
}

impl Organization {
    /// Creates an organization with the owner as its first member
    pub async fn create(pool: &PgPool, data: CreateOrganization) -> Result<Self, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, description, org_type, parent_id, owner_id, member_ids)
            VALUES ($1, $2, $3, $4, $5, ARRAY[$5])
            RETURNING id, name, description, org_type, parent_id, owner_id, member_ids,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.org_type)
        .bind(data.parent_id)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(org)
    }

    /// Finds an organization by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, description, org_type, parent_id, owner_id, member_ids,
                   is_active, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }

    /// Adds a user to the member list (idempotent)
    ///
    /// Does not touch the user's own `organization_id`; callers pair
    /// this with [`crate::models::user::User::assign_organization`].
    pub async fn add_member(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET member_ids = ARRAY(SELECT DISTINCT unnest(member_ids || $2)),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, org_type, parent_id, owner_id, member_ids,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }
}
