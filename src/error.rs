//! Custom error types for git-passport
//!
//! Every failure in the library is local and recoverable by the caller;
//! nothing here is fatal to the host process.

use thiserror::Error;

/// Main error type for the git-passport library
#[derive(Error, Debug)]
pub enum PassportError {
    /// A credential was submitted with an empty identifier
    #[error("The credential ID must not be empty.")]
    EmptyCredentialId,

    /// An insert collided with an already-stored credential
    #[error("A credential with ID '{0}' already exists. Cannot add another one.")]
    DuplicateCredentialId(String),

    /// An update referenced an ID the store no longer holds
    ///
    /// Indicates the caller kept a stale reference across an external
    /// mutation of the store.
    #[error("Cannot find credential '{0}' in the store.")]
    CredentialNotFound(String),

    /// The stored record's fields do not match its declared kind
    #[error("Credential record is malformed: {0}")]
    MalformedEntry(String),

    /// Secret backend error
    #[error("Cannot access secure storage: {0}\n\n  → On macOS: Make sure Keychain Access is available.\n  → On Linux: Ensure a secret service (like gnome-keyring) is running.")]
    Keychain(String),

    /// The username accessor was invoked on a credential that has none
    #[error("Credential '{0}' does not carry a username (not a password credential).")]
    MissingUsername(String),

    /// A repository state code outside the libgit2 enumeration
    #[error("Invalid repository state code {0}.")]
    UnknownStateCode(i32),

    /// Git operation error
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse credential store: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<keyring::Error> for PassportError {
    fn from(err: keyring::Error) -> Self {
        PassportError::Keychain(err.to_string())
    }
}

/// Result type alias using PassportError
pub type Result<T> = std::result::Result<T, PassportError>;
