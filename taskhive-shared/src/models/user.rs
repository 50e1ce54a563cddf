/// User model and database operations
///
/// Users authenticate with email/password and carry a role set plus an
/// optional organization reference. Accounts are created at registration
/// and never deleted in-repo.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     roles role[] NOT NULL DEFAULT '{VIEWER}',
///     organization_id UUID REFERENCES organizations(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::auth::policy::Role;
/// use taskhive_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     roles: vec![Role::Viewer],
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::policy::Role;

/// User account
///
/// The password hash never leaves the server: it is skipped during
/// serialization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user id
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role set; new accounts start as `{VIEWER}`
    pub roles: Vec<Role>,

    /// Organization the user belongs to, if any
    pub organization_id: Option<Uuid>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (never the plaintext password)
    pub password_hash: String,

    /// Initial role set
    pub roles: Vec<Role>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database is unreachable
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, roles)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, roles, organization_id, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.roles)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, roles, organization_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Lookup is case-insensitive; emails are normalized to lowercase at
    /// registration.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, roles, organization_id, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Places a user into an organization
    ///
    /// # Returns
    ///
    /// The updated user if found, None if the user doesn't exist
    pub async fn assign_organization(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET organization_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, roles, organization_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replaces a user's role set
    ///
    /// Existing tokens keep their old role claims until refresh; the
    /// authoritative role set is re-read from this row on every request.
    pub async fn update_roles(
        pool: &PgPool,
        id: Uuid,
        roles: Vec<Role>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET roles = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, roles, organization_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(roles)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let data = CreateUser {
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            roles: vec![Role::Viewer],
        };

        assert_eq!(data.email, "test@example.com");
        assert_eq!(data.roles, vec![Role::Viewer]);
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            roles: vec![Role::Owner],
            organization_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).expect("should serialize");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["roles"][0], "OWNER");
    }
}
