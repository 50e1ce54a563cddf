/// JWT token generation and validation
///
/// Access and refresh tokens are **independently signed with distinct
/// secrets** (HS256). A refresh token presented where an access token is
/// expected fails signature verification, so no `token_type` claim is
/// needed; the secrets themselves partition the token space.
///
/// # Token Lifetimes
///
/// - **Access token**: 24 hours, sent as `Authorization: Bearer <token>`
/// - **Refresh token**: 7 days, exchanged at `POST /auth/refresh`
///
/// Verification fails closed: an expired token, a bad signature, or a
/// token signed with the wrong secret all yield an error.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::jwt::{issue_token_pair, validate_token};
/// use taskhive_shared::auth::policy::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let pair = issue_token_pair(user_id, &[Role::Viewer], "access-secret", "refresh-secret")?;
///
/// let claims = validate_token(&pair.access_token, "access-secret")?;
/// assert_eq!(claims.sub, user_id);
///
/// // The refresh secret does not validate the access token
/// assert!(validate_token(&pair.access_token, "refresh-secret").is_err());
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::policy::Role;

/// Token issuer claim value
const ISSUER: &str = "taskhive";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    Create(String),

    /// Signature, issuer or structural validation failed
    #[error("Failed to validate token: {0}")]
    Validation(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Kind of token being issued, which determines its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived (24h) token used to authenticate API requests
    Access,

    /// Long-lived (7d) token used to obtain a fresh pair
    Refresh,
}

impl TokenKind {
    /// Lifetime assigned to freshly issued tokens of this kind
    pub fn lifetime(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::hours(24),
            TokenKind::Refresh => Duration::days(7),
        }
    }
}

/// Claims carried by both access and refresh tokens
///
/// `sub` is the user id and `roles` the role set at issue time. Role
/// changes therefore take effect on the next login or refresh, not
/// mid-token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Role set at the time the token was signed
    pub roles: Vec<Role>,

    /// Issuer - always "taskhive"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for a user with the default lifetime of `kind`
    pub fn new(user_id: Uuid, roles: &[Role], kind: TokenKind) -> Self {
        Self::with_lifetime(user_id, roles, kind.lifetime())
    }

    /// Creates claims with an explicit lifetime (used by tests to build
    /// already-expired tokens)
    pub fn with_lifetime(user_id: Uuid, roles: &[Role], lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            roles: roles.to_vec(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// A freshly issued access/refresh token pair
///
/// Serialized in camelCase to match the public API surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (7d)
    pub refresh_token: String,
}

/// Signs a token from claims using HS256
///
/// The secret should be at least 32 bytes of high-entropy material; the
/// server refuses to start with shorter secrets.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::Create(e.to_string()))
}

/// Validates a token and extracts its claims
///
/// Verifies the HS256 signature, expiration, `nbf` and issuer. Fails
/// closed on every problem.
///
/// # Errors
///
/// - `JwtError::Expired` if `exp` lies in the past
/// - `JwtError::Validation` for bad signatures, wrong secrets, wrong
///   issuer or malformed tokens
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Validation(e.to_string()),
    })?;

    Ok(data.claims)
}

/// Issues a matched access/refresh token pair for a user
///
/// The two tokens carry identical claims apart from their expiry, and
/// are signed with the two distinct secrets.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::jwt::issue_token_pair;
/// use taskhive_shared::auth::policy::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pair = issue_token_pair(
///     Uuid::new_v4(),
///     &[Role::Owner],
///     "access-secret-at-least-32-bytes-long",
///     "refresh-secret-at-least-32-bytes-xx",
/// )?;
/// assert_ne!(pair.access_token, pair.refresh_token);
/// # Ok(())
/// # }
/// ```
pub fn issue_token_pair(
    user_id: Uuid,
    roles: &[Role],
    access_secret: &str,
    refresh_secret: &str,
) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(user_id, roles, TokenKind::Access);
    let refresh_claims = Claims::new(user_id, roles, TokenKind::Refresh);

    Ok(TokenPair {
        access_token: create_token(&access_claims, access_secret)?,
        refresh_token: create_token(&refresh_claims, refresh_secret)?,
    })
}
