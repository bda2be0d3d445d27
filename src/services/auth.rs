use crate::credentials::{CredentialTable, Secret};
use crate::error::{AppError, Result};
use crate::models::session::{Identity, Session};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 2;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the PHC-encoded hash, suitable for the credential
/// file.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Checks a candidate password against a stored secret.
fn verify_password(password: &str, secret: &Secret) -> bool {
    match secret {
        Secret::Plain(expected) => password.as_bytes().ct_eq(expected.as_bytes()).into(),
        Secret::Argon2(hash) => {
            let mut password_bytes = password.as_bytes().to_vec();
            let result = PasswordHash::new(hash)
                .map(|parsed| {
                    Argon2::default()
                        .verify_password(&password_bytes, &parsed)
                        .is_ok()
                })
                .unwrap_or(false);
            password_bytes.zeroize();
            result
        }
    }
}

/// Authenticates a username/password pair against the credential table.
///
/// Unknown usernames and wrong passwords fail with the same message. Empty
/// strings are accepted as input and simply never match.
///
/// # Arguments
///
/// * `credentials` - The credential table.
/// * `username` - The submitted username.
/// * `password` - The submitted password.
///
/// # Returns
///
/// A `Result` containing an authenticated `Session`.
pub fn authenticate(credentials: &CredentialTable, username: &str, password: &str) -> Result<Session> {
    tracing::debug!("🔐 Authenticating user: {}", username);

    let entry = credentials
        .get(username)
        .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, &entry.secret) {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!("✅ User authenticated: {} ({})", username, entry.role);

    Ok(Session::Authenticated(Identity {
        username: username.to_string(),
        role: entry.role,
    }))
}

/// Ends a session. Always succeeds, and logging out an anonymous session is
/// a no-op.
pub fn logout(session: Session) -> Session {
    if let Session::Authenticated(identity) = session {
        tracing::info!("👋 Logout for user: {}", identity.username);
    }
    Session::Anonymous
}

/// Returns the identity of a session that may read the prediction history.
///
/// # Returns
///
/// `AppError::Authentication` for anonymous sessions and
/// `AppError::Unauthorized` for roles without history access.
pub fn require_history_access(session: &Session) -> Result<&Identity> {
    let identity = require_identity(session)?;

    if !identity.role.can_view_history() {
        tracing::warn!(
            "❌ History access denied for {} ({})",
            identity.username,
            identity.role
        );
        return Err(AppError::Unauthorized);
    }

    Ok(identity)
}

/// Returns the identity of an authenticated session.
pub fn require_identity(session: &Session) -> Result<&Identity> {
    session
        .identity()
        .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))
}
