use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use argon2::password_hash::PasswordHash;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::models::session::Role;

/// On-disk layout of the credential file.
#[derive(Deserialize)]
struct CredentialFile {
    users: HashMap<String, RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    secret: String,
    role: Role,
}

/// A stored secret.
pub enum Secret {
    /// Compared verbatim. Kept for compatibility with existing credential
    /// files; every such entry is reported at load time.
    Plain(Zeroizing<String>),
    /// An Argon2 PHC string.
    Argon2(String),
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Secret::Plain(..)"),
            Self::Argon2(_) => f.write_str("Secret::Argon2(..)"),
        }
    }
}

/// A credential table row.
#[derive(Debug)]
pub struct CredentialEntry {
    pub secret: Secret,
    pub role: Role,
}

/// Read-only mapping from username to secret and role, supplied at startup.
#[derive(Debug, Default)]
pub struct CredentialTable {
    users: HashMap<String, CredentialEntry>,
}

impl CredentialTable {
    /// Loads the table from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the credential file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `CredentialTable`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credential file {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Invalid credential file {}", path.display()))
    }

    /// Parses the table from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CredentialFile =
            sonic_rs::from_str(json).context("Credential file is not valid JSON")?;

        let mut users = HashMap::with_capacity(file.users.len());
        for (username, raw) in file.users {
            if username.is_empty() {
                anyhow::bail!("Credential table contains an empty username");
            }

            let secret = if raw.secret.starts_with("$argon2") {
                let parsed = PasswordHash::new(&raw.secret)
                    .map_err(|e| anyhow::anyhow!("Invalid Argon2 hash for '{}': {}", username, e))?;
                if parsed.salt.is_none() || parsed.hash.is_none() {
                    anyhow::bail!("Invalid Argon2 hash for '{}': missing salt or hash output", username);
                }
                Secret::Argon2(raw.secret)
            } else {
                tracing::warn!(
                    "⚠️ Credential for '{}' is stored in plain text; replace it with an Argon2 hash (see `hash-password`)",
                    username
                );
                Secret::Plain(Zeroizing::new(raw.secret))
            };

            users.insert(username, CredentialEntry { secret, role: raw.role });
        }

        tracing::info!("✅ Credential table loaded with {} identities", users.len());
        Ok(Self { users })
    }

    pub fn get(&self, username: &str) -> Option<&CredentialEntry> {
        self.users.get(username)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roles_and_secret_kinds() {
        let table = CredentialTable::from_json(
            r#"{"users": {
                "admin": {"secret": "admin123", "role": "admin"},
                "doctor": {"secret": "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$RdescudvJCsgt3ub+b+dWRWJTmaaJObG", "role": "doctor"}
            }}"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("admin").unwrap().role, Role::Admin);
        assert!(matches!(table.get("admin").unwrap().secret, Secret::Plain(_)));
        assert!(matches!(table.get("doctor").unwrap().secret, Secret::Argon2(_)));
        assert!(table.get("nobody").is_none());
    }

    #[test]
    fn rejects_unknown_roles_and_empty_usernames() {
        assert!(CredentialTable::from_json(
            r#"{"users": {"root": {"secret": "x", "role": "superuser"}}}"#
        )
        .is_err());
        assert!(CredentialTable::from_json(
            r#"{"users": {"": {"secret": "x", "role": "user"}}}"#
        )
        .is_err());
    }

    #[test]
    fn rejects_malformed_argon2_hashes() {
        assert!(CredentialTable::from_json(
            r#"{"users": {"admin": {"secret": "$argon2id$garbage", "role": "admin"}}}"#
        )
        .is_err());
    }

    #[test]
    fn rejects_argon2_hashes_without_output() {
        assert!(CredentialTable::from_json(
            r#"{"users": {"doctor": {"secret": "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA", "role": "doctor"}}}"#
        )
        .is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let table = CredentialTable::from_json(
            r#"{"users": {"user": {"secret": "user123", "role": "user"}}}"#,
        )
        .unwrap();
        assert!(!format!("{:?}", table).contains("user123"));
    }
}
