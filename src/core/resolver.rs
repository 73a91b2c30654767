//! Credential resolution for remote authentication challenges
//!
//! The engine's authentication callback only ever needs "which credential
//! for this URL?". [`CredentialResolver`] is that narrow seam, so the
//! callback does not depend on the store's full CRUD surface.

use crate::core::credential::Credential;
use crate::core::store::CredentialStore;

/// Stateless resolution of a remote URL to a stored credential
pub struct CredentialResolver<S> {
    store: S,
}

impl<S: CredentialStore> CredentialResolver<S> {
    /// Wrap a store for resolution
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Credential to present for the given remote URL, if any
    ///
    /// Returns the first stored credential whose URL prefix matches.
    /// `None` means the engine should proceed without credentials.
    pub fn resolve(&self, url: &str) -> Option<Credential> {
        self.store.lookup(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credential::SecretProvider;
    use crate::core::store::JsonFileCredentialStore;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_delegates_to_store_lookup() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileCredentialStore::new(dir.path().join("credentials.json"));
        store
            .add_or_update(
                None,
                Credential::password(
                    "gh",
                    "https://github.com",
                    "alice",
                    SecretProvider::inline("hunter2"),
                ),
            )
            .unwrap();

        let resolver = CredentialResolver::new(store);
        assert_eq!(
            resolver
                .resolve("https://github.com/owner/repo.git")
                .unwrap()
                .id(),
            "gh"
        );
        assert!(resolver.resolve("https://gitlab.com/x.git").is_none());
    }
}
