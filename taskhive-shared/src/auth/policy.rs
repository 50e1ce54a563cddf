/// Role-based authorization policy
///
/// This module is the heart of TaskHive's access control: a small set of
/// pure functions that decide what a set of roles may do, and whether a
/// user may touch a specific resource. No I/O happens here; callers fetch
/// the resource first (always scoped by organization) and then consult
/// the policy.
///
/// # Permission Model
///
/// 1. **Role check**: `can_perform` maps a role set to allowed actions
/// 2. **Resource check**: `can_access_resource` combines ownership with
///    organization-scoped role escalation
///
/// Roles are not hierarchical records in the database; a user carries a
/// set of roles and the strongest one wins.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::policy::{can_perform, Action, Role};
///
/// let roles = vec![Role::Admin];
/// assert!(can_perform(&roles, Action::Update));
/// assert!(!can_perform(&roles, Action::Delete));
/// ```
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgHasArrayType, PgTypeInfo};
use uuid::Uuid;

/// Organization role held by a user
///
/// Stored as a PostgreSQL enum array on the `users` table (a user can
/// hold several roles, e.g. `{OWNER, ADMIN}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full control over the organization and its resources
    Owner,

    /// Can manage organization resources, but not delete them
    Admin,

    /// Read-only access to organization resources
    Viewer,
}

impl Role {
    /// Converts role to its wire/database form
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
            Role::Viewer => "VIEWER",
        }
    }
}

// sqlx's Type derive does not emit array support for enums; Postgres
// names the array type with a leading underscore
impl PgHasArrayType for Role {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_role")
    }
}

/// CRUD action a caller wants to perform on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "action", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl PgHasArrayType for Action {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_action")
    }
}

/// Decides whether a role set allows an action
///
/// - OWNER may perform every action
/// - ADMIN may perform everything except `Delete`
/// - VIEWER may only `Read`
/// - An empty role set allows nothing
///
/// Deterministic and free of I/O; the strongest role in the set decides.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::policy::{can_perform, Action, Role};
///
/// assert!(can_perform(&[Role::Owner], Action::Delete));
/// assert!(!can_perform(&[Role::Viewer], Action::Create));
/// ```
pub fn can_perform(roles: &[Role], action: Action) -> bool {
    if roles.contains(&Role::Owner) {
        return true;
    }

    if roles.contains(&Role::Admin) {
        return action != Action::Delete;
    }

    if roles.contains(&Role::Viewer) {
        return action == Action::Read;
    }

    false
}

/// Decides whether a user may access a specific resource
///
/// Access is granted when:
/// - the user owns the resource, regardless of roles, OR
/// - the resource belongs to the user's organization AND the user holds
///   OWNER or ADMIN there
///
/// Everything else is denied, including OWNERs of *other* organizations.
///
/// # Arguments
///
/// * `user_id` - The authenticated user's id
/// * `user_org_id` - The organization the user belongs to (if any)
/// * `roles` - The user's role set
/// * `resource_owner_id` - The id of the user owning the resource
/// * `resource_org_id` - The organization the resource is scoped to
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::policy::{can_access_resource, Role};
/// use uuid::Uuid;
///
/// let me = Uuid::new_v4();
/// let org = Uuid::new_v4();
///
/// // Owning the resource is always enough
/// assert!(can_access_resource(me, None, &[Role::Viewer], me, org));
/// ```
pub fn can_access_resource(
    user_id: Uuid,
    user_org_id: Option<Uuid>,
    roles: &[Role],
    resource_owner_id: Uuid,
    resource_org_id: Uuid,
) -> bool {
    // A user can always access their own resources
    if resource_owner_id == user_id {
        return true;
    }

    // Cross-user access requires OWNER or ADMIN in the same organization
    if user_org_id == Some(resource_org_id) {
        return roles.contains(&Role::Owner) || roles.contains(&Role::Admin);
    }

    false
}

/// Checks whether a role set is read-only
///
/// True when the user holds VIEWER and nothing stronger. Used by the task
/// statistics endpoint to narrow aggregates to the caller's own tasks.
pub fn is_viewer_only(roles: &[Role]) -> bool {
    roles.contains(&Role::Viewer)
        && !roles.contains(&Role::Admin)
        && !roles.contains(&Role::Owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 4] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
    ];

    #[test]
    fn test_owner_can_do_everything() {
        for action in ALL_ACTIONS {
            assert!(can_perform(&[Role::Owner], action), "{:?}", action);
        }
    }

    #[test]
    fn test_admin_cannot_delete() {
        assert!(can_perform(&[Role::Admin], Action::Create));
        assert!(can_perform(&[Role::Admin], Action::Read));
        assert!(can_perform(&[Role::Admin], Action::Update));
        assert!(!can_perform(&[Role::Admin], Action::Delete));
    }

    #[test]
    fn test_viewer_is_read_only() {
        assert!(can_perform(&[Role::Viewer], Action::Read));
        assert!(!can_perform(&[Role::Viewer], Action::Create));
        assert!(!can_perform(&[Role::Viewer], Action::Update));
        assert!(!can_perform(&[Role::Viewer], Action::Delete));
    }

    #[test]
    fn test_empty_role_set_allows_nothing() {
        for action in ALL_ACTIONS {
            assert!(!can_perform(&[], action), "{:?}", action);
        }
    }

    #[test]
    fn test_strongest_role_wins() {
        // Holding VIEWER alongside OWNER must not weaken the user
        let roles = [Role::Viewer, Role::Owner];
        for action in ALL_ACTIONS {
            assert!(can_perform(&roles, action), "{:?}", action);
        }

        // ADMIN + VIEWER still cannot delete
        assert!(!can_perform(&[Role::Viewer, Role::Admin], Action::Delete));
    }

    #[test]
    fn test_owner_of_resource_always_has_access() {
        let user = Uuid::new_v4();
        let org = Uuid::new_v4();

        // Even a viewer with no organization can reach their own resource
        assert!(can_access_resource(user, None, &[Role::Viewer], user, org));
        assert!(can_access_resource(user, Some(org), &[], user, org));
    }

    #[test]
    fn test_same_org_requires_owner_or_admin() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let org = Uuid::new_v4();

        assert!(can_access_resource(user, Some(org), &[Role::Owner], other, org));
        assert!(can_access_resource(user, Some(org), &[Role::Admin], other, org));
        assert!(!can_access_resource(user, Some(org), &[Role::Viewer], other, org));
    }

    #[test]
    fn test_cross_org_access_is_denied() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();

        // OWNER of organization A gets nothing in organization B
        assert!(!can_access_resource(user, Some(org_a), &[Role::Owner], other, org_b));
        assert!(!can_access_resource(user, None, &[Role::Owner], other, org_b));
    }

    #[test]
    fn test_is_viewer_only() {
        assert!(is_viewer_only(&[Role::Viewer]));
        assert!(!is_viewer_only(&[Role::Viewer, Role::Admin]));
        assert!(!is_viewer_only(&[Role::Owner]));
        assert!(!is_viewer_only(&[]));
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Owner.as_str(), "OWNER");
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::Viewer.as_str(), "VIEWER");
    }

    #[test]
    fn test_enum_array_type_names() {
        // Arrays of these enums decode from role[] / action[] columns
        assert_eq!(Role::array_type_info().to_string(), "_role");
        assert_eq!(Action::array_type_info().to_string(), "_action");
    }
}
