//! Credential model and secret indirection
//!
//! A [`Credential`] names one authentication method (SSH key pair or
//! username/password) and the class of remote URLs it applies to. Secret
//! material is never held in a comparable or printable field; it is reached
//! through a [`SecretProvider`], which may read the system keychain on
//! demand.

use std::fmt;

use keyring::Entry;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{PassportError, Result};

/// Authentication method of a credential
///
/// Fixed at construction; a credential never changes kind in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    /// SSH public/private key pair
    Ssh,
    /// Username and password (or token) pair
    Password,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Ssh => write!(f, "ssh"),
            CredentialKind::Password => write!(f, "password"),
        }
    }
}

/// On-demand secret retrieval
///
/// An inspectable tagged value rather than a captured closure: the
/// credential record stays serializable while the secret itself is only
/// reachable through [`SecretProvider::get`].
///
/// Retrieval may block: the keychain variant performs backend I/O and can
/// prompt the user to unlock. Callers that must stay responsive should not
/// invoke it on their hot path.
#[derive(Clone)]
pub enum SecretProvider {
    /// Secret held in memory, wrapped so it never appears in debug output
    Inline(SecretString),
    /// Secret resolved from the system keychain at access time
    Keychain {
        /// Keychain service name
        service: String,
        /// Account the secret is filed under
        account: String,
    },
    /// No secret available
    ///
    /// Absence is not an error: accessors return an empty secret and the
    /// downstream authentication step is expected to fail on its own.
    Absent,
}

impl SecretProvider {
    /// Provider holding the secret in memory
    pub fn inline(secret: impl Into<String>) -> Self {
        SecretProvider::Inline(SecretString::from(secret.into()))
    }

    /// Provider that reads the system keychain on each access
    pub fn keychain(service: impl Into<String>, account: impl Into<String>) -> Self {
        SecretProvider::Keychain {
            service: service.into(),
            account: account.into(),
        }
    }

    /// Provider with no secret
    pub fn absent() -> Self {
        SecretProvider::Absent
    }

    /// Retrieve the current secret value
    ///
    /// Returns `None` when no secret exists (absent provider, or keychain
    /// entry not found). Keychain access failures other than a missing
    /// entry surface as [`PassportError::Keychain`].
    pub fn get(&self) -> Result<Option<SecretString>> {
        match self {
            SecretProvider::Inline(secret) => Ok(Some(secret.clone())),
            SecretProvider::Keychain { service, account } => {
                let entry = Entry::new(service, account)?;
                match entry.get_password() {
                    Ok(password) => Ok(Some(SecretString::from(password))),
                    Err(keyring::Error::NoEntry) => Ok(None),
                    Err(e) => Err(PassportError::Keychain(format!(
                        "Cannot access system keychain. Make sure your keyring is unlocked. ({})",
                        e
                    ))),
                }
            }
            SecretProvider::Absent => Ok(None),
        }
    }

    /// Whether any secret can possibly be produced
    pub fn is_absent(&self) -> bool {
        matches!(self, SecretProvider::Absent)
    }
}

/// Equality deliberately ignores inline secret values: two credentials that
/// agree on every non-secret field compare equal even if their secrets
/// differ. Keychain handles compare by service and account.
impl PartialEq for SecretProvider {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SecretProvider::Inline(_), SecretProvider::Inline(_)) => true,
            (
                SecretProvider::Keychain { service, account },
                SecretProvider::Keychain {
                    service: other_service,
                    account: other_account,
                },
            ) => service == other_service && account == other_account,
            (SecretProvider::Absent, SecretProvider::Absent) => true,
            _ => false,
        }
    }
}

impl Eq for SecretProvider {}

impl fmt::Debug for SecretProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretProvider::Inline(_) => write!(f, "SecretProvider::Inline(***)"),
            SecretProvider::Keychain { service, account } => f
                .debug_struct("SecretProvider::Keychain")
                .field("service", service)
                .field("account", account)
                .finish(),
            SecretProvider::Absent => write!(f, "SecretProvider::Absent"),
        }
    }
}

/// One authentication method for one class of remote URLs
///
/// Each variant only carries the fields its kind needs, so "populated
/// payload matches kind" holds by construction. The `id` is the primary key
/// within a store; updates are replace-by-id, never in-place mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Username/password (or token) authentication
    Password {
        /// Unique identifier within the owning store
        id: String,
        /// A credential applies to a remote URL iff the URL starts with this prefix
        target_url: String,
        /// Account name presented to the remote
        username: String,
        /// On-demand password accessor
        secret: SecretProvider,
    },
    /// SSH key pair authentication
    Ssh {
        /// Unique identifier within the owning store
        id: String,
        /// A credential applies to a remote URL iff the URL starts with this prefix
        target_url: String,
        /// Public key text; may be empty
        public_key: String,
        /// On-demand private key accessor
        secret: SecretProvider,
    },
}

impl Credential {
    /// Create a username/password credential
    pub fn password(
        id: impl Into<String>,
        target_url: impl Into<String>,
        username: impl Into<String>,
        secret: SecretProvider,
    ) -> Self {
        Credential::Password {
            id: id.into(),
            target_url: target_url.into(),
            username: username.into(),
            secret,
        }
    }

    /// Create an SSH key-pair credential
    pub fn ssh(
        id: impl Into<String>,
        target_url: impl Into<String>,
        public_key: impl Into<String>,
        secret: SecretProvider,
    ) -> Self {
        Credential::Ssh {
            id: id.into(),
            target_url: target_url.into(),
            public_key: public_key.into(),
            secret,
        }
    }

    /// Unique identifier within the owning store
    pub fn id(&self) -> &str {
        match self {
            Credential::Password { id, .. } | Credential::Ssh { id, .. } => id,
        }
    }

    /// Authentication method of this credential
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::Password { .. } => CredentialKind::Password,
            Credential::Ssh { .. } => CredentialKind::Ssh,
        }
    }

    /// URL prefix this credential applies to
    pub fn target_url(&self) -> &str {
        match self {
            Credential::Password { target_url, .. } | Credential::Ssh { target_url, .. } => {
                target_url
            }
        }
    }

    /// Whether this credential applies to the given remote URL
    pub fn applies_to(&self, url: &str) -> bool {
        url.starts_with(self.target_url())
    }

    /// True iff this is a username/password credential
    pub fn is_password_auth(&self) -> bool {
        self.kind() == CredentialKind::Password
    }

    /// True iff this is an SSH credential
    pub fn is_ssh_auth(&self) -> bool {
        self.kind() == CredentialKind::Ssh
    }

    /// Account name for password authentication
    ///
    /// Only defined for the password variant; calling it on an SSH
    /// credential is a caller bug and fails with
    /// [`PassportError::MissingUsername`].
    pub fn username(&self) -> Result<&str> {
        match self {
            Credential::Password { username, .. } => Ok(username),
            Credential::Ssh { id, .. } => Err(PassportError::MissingUsername(id.clone())),
        }
    }

    /// Current password value
    ///
    /// Empty string when no secret is available or this is not a password
    /// credential. May block on keychain-backed providers.
    pub fn get_password(&self) -> Result<String> {
        match self {
            Credential::Password { secret, .. } => expose_or_empty(secret),
            Credential::Ssh { .. } => Ok(String::new()),
        }
    }

    /// Public key text; empty for password credentials
    pub fn public_key(&self) -> &str {
        match self {
            Credential::Ssh { public_key, .. } => public_key,
            Credential::Password { .. } => "",
        }
    }

    /// Current private key value
    ///
    /// Empty string when no secret is available or this is not an SSH
    /// credential. May block on keychain-backed providers.
    pub fn get_private_key(&self) -> Result<String> {
        match self {
            Credential::Ssh { secret, .. } => expose_or_empty(secret),
            Credential::Password { .. } => Ok(String::new()),
        }
    }

    /// The secret indirection itself, for persistence layers
    pub fn secret(&self) -> &SecretProvider {
        match self {
            Credential::Password { secret, .. } | Credential::Ssh { secret, .. } => secret,
        }
    }
}

fn expose_or_empty(secret: &SecretProvider) -> Result<String> {
    Ok(secret
        .get()?
        .map(|s| s.expose_secret().to_string())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let pw = Credential::password("gh", "https://github.com", "alice", SecretProvider::absent());
        assert!(pw.is_password_auth());
        assert!(!pw.is_ssh_auth());
        assert_eq!(pw.kind(), CredentialKind::Password);

        let ssh = Credential::ssh("srv", "git@server:", "ssh-ed25519 AAAA", SecretProvider::absent());
        assert!(ssh.is_ssh_auth());
        assert!(!ssh.is_password_auth());
        assert_eq!(ssh.kind(), CredentialKind::Ssh);
    }

    #[test]
    fn test_inline_secret_round_trip() {
        let cred = Credential::password(
            "gh",
            "https://github.com",
            "alice",
            SecretProvider::inline("hunter2"),
        );
        assert_eq!(cred.username().unwrap(), "alice");
        assert_eq!(cred.get_password().unwrap(), "hunter2");
    }

    #[test]
    fn test_absent_secret_yields_empty_string() {
        let pw = Credential::password("gh", "https://github.com", "alice", SecretProvider::absent());
        assert_eq!(pw.get_password().unwrap(), "");

        let ssh = Credential::ssh("srv", "git@server:", "", SecretProvider::absent());
        assert_eq!(ssh.get_private_key().unwrap(), "");
        assert_eq!(ssh.public_key(), "");
    }

    #[test]
    fn test_username_undefined_for_ssh() {
        let ssh = Credential::ssh("srv", "git@server:", "", SecretProvider::absent());
        assert!(matches!(
            ssh.username(),
            Err(PassportError::MissingUsername(id)) if id == "srv"
        ));
    }

    #[test]
    fn test_wrong_kind_secret_is_empty() {
        let pw = Credential::password(
            "gh",
            "https://github.com",
            "alice",
            SecretProvider::inline("hunter2"),
        );
        assert_eq!(pw.get_private_key().unwrap(), "");

        let ssh = Credential::ssh("srv", "git@server:", "", SecretProvider::inline("KEY"));
        assert_eq!(ssh.get_password().unwrap(), "");
    }

    #[test]
    fn test_equality_ignores_secret_value() {
        let a = Credential::password(
            "gh",
            "https://github.com",
            "alice",
            SecretProvider::inline("old-password"),
        );
        let b = Credential::password(
            "gh",
            "https://github.com",
            "alice",
            SecretProvider::inline("new-password"),
        );
        assert_eq!(a, b);

        let c = Credential::password("gh", "https://github.com", "bob", SecretProvider::absent());
        assert_ne!(a, c);
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let cred = Credential::password(
            "gh",
            "https://github.com",
            "alice",
            SecretProvider::inline("hunter2"),
        );
        let rendered = format!("{:?}", cred);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_applies_to_prefix() {
        let cred = Credential::password(
            "gh",
            "https://github.com/owner",
            "alice",
            SecretProvider::absent(),
        );
        assert!(cred.applies_to("https://github.com/owner/repo.git"));
        assert!(!cred.applies_to("https://gitlab.com/owner/repo.git"));
    }
}
