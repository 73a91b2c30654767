//! Local working copy inspection
//!
//! This module is the bridge between a concrete libgit2 repository and the
//! library's models:
//! - Reading branch, operation state and staged/unstaged diffs into a
//!   [`RepositoryStatus`]
//! - Answering authentication challenges from a [`CredentialResolver`]
//!   during fetch/push

use std::path::Path;

use git2::{Cred, DiffOptions, RemoteCallbacks, Repository};

use crate::core::credential::Credential;
use crate::core::resolver::CredentialResolver;
use crate::core::status::{Diff, RepositoryStatus};
use crate::core::store::CredentialStore;
use crate::error::Result;

/// Wrapper for inspecting a local working copy
pub struct WorkingCopy {
    repo: Repository,
}

impl WorkingCopy {
    /// Open the working copy containing the current directory
    pub fn open_current_dir() -> Result<Self> {
        Self::discover(".")
    }

    /// Discover a working copy from the given path
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Self { repo })
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => {
                if head.is_branch() {
                    Ok(head.shorthand().unwrap_or("HEAD").to_string())
                } else {
                    // Detached HEAD state
                    Ok("HEAD".to_string())
                }
            }
            Err(e) => {
                // Handle unborn HEAD (no commits yet)
                if e.code() == git2::ErrorCode::UnbornBranch {
                    if let Ok(config) = self.repo.config() {
                        if let Ok(branch) = config.get_string("init.defaultBranch") {
                            return Ok(branch);
                        }
                    }
                    Ok("main".to_string())
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Numeric state code for the operation currently in progress
    ///
    /// Codes follow `git_repository_state_t` and feed
    /// [`RepositoryStatus::set_state`] verbatim.
    pub fn state_code(&self) -> i32 {
        match self.repo.state() {
            git2::RepositoryState::Clean => 0,
            git2::RepositoryState::Merge => 1,
            git2::RepositoryState::Revert => 2,
            git2::RepositoryState::RevertSequence => 3,
            git2::RepositoryState::CherryPick => 4,
            git2::RepositoryState::CherryPickSequence => 5,
            git2::RepositoryState::Bisect => 6,
            git2::RepositoryState::Rebase => 7,
            git2::RepositoryState::RebaseInteractive => 8,
            git2::RepositoryState::RebaseMerge => 9,
            git2::RepositoryState::ApplyMailbox => 10,
            git2::RepositoryState::ApplyMailboxOrRebase => 11,
        }
    }

    /// Get the diff of staged changes
    pub fn staged_diff(&self) -> Result<Diff> {
        // Unborn HEAD diffs against the empty tree
        let head = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let index = self.repo.index()?;

        let diff = self.repo.diff_tree_to_index(
            head.as_ref(),
            Some(&index),
            Some(&mut DiffOptions::new()),
        )?;

        Ok(Diff::new(render_patch(&diff)?))
    }

    /// Get the diff of unstaged changes
    pub fn unstaged_diff(&self) -> Result<Diff> {
        let index = self.repo.index()?;

        let diff = self
            .repo
            .diff_index_to_workdir(Some(&index), Some(&mut DiffOptions::new()))?;

        Ok(Diff::new(render_patch(&diff)?))
    }

    /// Recompute every field of a status snapshot
    pub fn refresh_status(&self, status: &mut RepositoryStatus) -> Result<()> {
        status.set_current_branch(self.current_branch()?);
        status.set_state(self.state_code())?;
        status.set_staged_changes(self.staged_diff()?);
        status.set_unstaged_changes(self.unstaged_diff()?);
        Ok(())
    }
}

fn render_patch(diff: &git2::Diff<'_>) -> Result<String> {
    let mut diff_text = String::new();
    diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
        diff_text.push_str(std::str::from_utf8(line.content()).unwrap_or(""));
        true
    })?;
    Ok(diff_text)
}

/// Remote callbacks that answer authentication challenges from a resolver
///
/// SSH credentials are presented as in-memory key pairs, password
/// credentials as plaintext pairs. When the resolver has nothing for the
/// URL the default credential is offered and the remote's own
/// authentication step decides the outcome.
pub fn credential_callbacks<S: CredentialStore>(
    resolver: &CredentialResolver<S>,
) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, _allowed| {
        match resolver.resolve(url) {
            Some(cred @ Credential::Ssh { .. }) => {
                let username = username_from_url.unwrap_or("git");
                let private_key = cred
                    .get_private_key()
                    .map_err(|e| git2::Error::from_str(&e.to_string()))?;
                let public_key = match cred.public_key() {
                    "" => None,
                    key => Some(key),
                };
                Cred::ssh_key_from_memory(username, public_key, &private_key, None)
            }
            Some(cred) => {
                let username = cred
                    .username()
                    .map_err(|e| git2::Error::from_str(&e.to_string()))?
                    .to_string();
                let password = cred
                    .get_password()
                    .map_err(|e| git2::Error::from_str(&e.to_string()))?;
                Cred::userpass_plaintext(&username, &password)
            }
            None => Cred::default(),
        }
    });
    callbacks
}
