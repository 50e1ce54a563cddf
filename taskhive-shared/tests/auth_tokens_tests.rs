/// Integration tests for the token and policy layer
///
/// Pure logic, no database required.
use taskhive_shared::auth::jwt::{
    create_token, issue_token_pair, validate_token, Claims, JwtError, TokenKind,
};
use taskhive_shared::auth::policy::{can_access_resource, can_perform, Action, Role};
use uuid::Uuid;

const ACCESS_SECRET: &str = "access-secret-for-tests-32-chars-min";
const REFRESH_SECRET: &str = "refresh-secret-for-tests-32-chars-mi";

#[test]
fn token_pair_roundtrips_with_matching_secrets() {
    let user_id = Uuid::new_v4();
    let roles = vec![Role::Admin, Role::Viewer];

    let pair = issue_token_pair(user_id, &roles, ACCESS_SECRET, REFRESH_SECRET)
        .expect("pair should be issued");

    let access = validate_token(&pair.access_token, ACCESS_SECRET).expect("access should validate");
    assert_eq!(access.sub, user_id);
    assert_eq!(access.roles, roles);

    let refresh =
        validate_token(&pair.refresh_token, REFRESH_SECRET).expect("refresh should validate");
    assert_eq!(refresh.sub, user_id);
}

#[test]
fn tokens_do_not_validate_across_secrets() {
    let pair = issue_token_pair(Uuid::new_v4(), &[Role::Owner], ACCESS_SECRET, REFRESH_SECRET)
        .expect("pair should be issued");

    assert!(validate_token(&pair.access_token, REFRESH_SECRET).is_err());
    assert!(validate_token(&pair.refresh_token, ACCESS_SECRET).is_err());
}

#[test]
fn expired_token_reports_expiry() {
    let claims = Claims::with_lifetime(Uuid::new_v4(), &[Role::Viewer], chrono::Duration::hours(-1));
    let token = create_token(&claims, ACCESS_SECRET).expect("token should be created");

    match validate_token(&token, ACCESS_SECRET) {
        Err(JwtError::Expired) => {}
        other => panic!("expected Expired, got {other:?}"),
    }
}

#[test]
fn refresh_tokens_outlive_access_tokens() {
    let access = Claims::new(Uuid::new_v4(), &[Role::Viewer], TokenKind::Access);
    let refresh = Claims::new(Uuid::new_v4(), &[Role::Viewer], TokenKind::Refresh);

    assert!(refresh.exp > access.exp);
}

#[test]
fn role_policy_matches_token_roles() {
    // The role set carried in a token drives the same policy decisions
    // as the database role set
    let pair = issue_token_pair(Uuid::new_v4(), &[Role::Viewer], ACCESS_SECRET, REFRESH_SECRET)
        .expect("pair should be issued");
    let claims = validate_token(&pair.access_token, ACCESS_SECRET).expect("should validate");

    assert!(can_perform(&claims.roles, Action::Read));
    assert!(!can_perform(&claims.roles, Action::Create));
    assert!(!can_perform(&claims.roles, Action::Delete));
}

#[test]
fn resource_access_requires_ownership_or_org_role() {
    let user = Uuid::new_v4();
    let org = Uuid::new_v4();
    let other_org = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    // Own resource, any role
    assert!(can_access_resource(user, Some(org), &[Role::Viewer], user, org));

    // Someone else's resource in the same org needs OWNER or ADMIN
    assert!(can_access_resource(user, Some(org), &[Role::Admin], stranger, org));
    assert!(!can_access_resource(user, Some(org), &[Role::Viewer], stranger, org));

    // Cross-org access is never granted by role alone
    assert!(!can_access_resource(
        user,
        Some(org),
        &[Role::Owner],
        stranger,
        other_org
    ));
}
