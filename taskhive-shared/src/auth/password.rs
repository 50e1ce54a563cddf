/// Password hashing and complexity policy
///
/// Hashing uses Argon2id; the rest of the system treats it as an opaque
/// one-way keyed function with a verify operation. Hashes are stored in
/// PHC string format, so parameters and salt travel with the hash.
///
/// # Complexity Policy
///
/// Registration enforces the following on plaintext passwords:
/// - between 8 and 20 characters
/// - at least one uppercase letter
/// - at least one lowercase letter
/// - at least one digit **or** one symbol
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Sup3rSecret!")?;
/// assert!(verify_password("Sup3rSecret!", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    Hash(String),

    /// Failed to verify password against a stored hash
    #[error("Failed to verify password: {0}")]
    Verify(String),
}

/// Rejection message for passwords failing the complexity policy
pub const PASSWORD_TOO_WEAK: &str = "password too weak!, password must have at least one lowercase character, one uppercase character, one special character eg:(@!#%$^&?_+|*><) and must be a minimum of 8 characters and maximum of 20 characters!";

/// Hashes a password using Argon2id with default parameters
///
/// A fresh 16-byte salt is drawn from the OS RNG for every call, so
/// hashing the same password twice produces different hashes.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC-format hash
///
/// # Returns
///
/// `Ok(true)` on a match, `Ok(false)` on a mismatch
///
/// # Errors
///
/// Returns `PasswordError::Verify` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::Verify(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

/// Validates a plaintext password against the complexity policy
///
/// # Returns
///
/// `Ok(())` when the policy holds, `Err` with the rejection message
/// otherwise. The message is deliberately a single catch-all so the API
/// does not enumerate which rule failed.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("MyP@ssw0rd").is_ok());
/// assert!(validate_password_strength("short").is_err());
/// assert!(validate_password_strength("alllowercase1").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if !(8..=20).contains(&length) {
        return Err(PASSWORD_TOO_WEAK.to_string());
    }

    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PASSWORD_TOO_WEAK.to_string());
    }

    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PASSWORD_TOO_WEAK.to_string());
    }

    // A digit or a symbol satisfies the last rule
    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());
    if !has_digit && !has_symbol {
        return Err(PASSWORD_TOO_WEAK.to_string());
    }

    Ok(())
}
