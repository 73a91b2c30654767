//! Core functionality for git-passport
//!
//! This module contains the library's models and services:
//! - Credential model and secret indirection
//! - Durable credential storage
//! - URL-to-credential resolution
//! - Repository status snapshots
//! - Local working copy inspection

pub mod credential;
pub mod resolver;
pub mod status;
pub mod store;
pub mod worktree;

pub use credential::{Credential, CredentialKind, SecretProvider};
pub use resolver::CredentialResolver;
pub use status::{Diff, RepositoryState, RepositoryStatus};
pub use store::{CredentialStore, JsonFileCredentialStore};
pub use worktree::WorkingCopy;
