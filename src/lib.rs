//! git-passport - credential resolution and status snapshots for embedded git clients
//!
//! This library supplies authentication material (SSH key pairs,
//! username/password pairs) to remote version-control operations, and
//! models the observable state of an open working copy (branch, operation
//! in progress, staged/unstaged change sets).
//!
//! Secrets are never carried in comparable or serializable fields; they
//! are reached through a [`core::SecretProvider`], which can hold a value
//! inline or defer to the system keychain at access time.

pub mod core;
pub mod error;

pub use error::{PassportError, Result};
