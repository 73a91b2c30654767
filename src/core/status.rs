//! Repository status snapshot
//!
//! [`RepositoryStatus`] projects the engine's view of an open working copy
//! for display: current branch, any multi-step operation in progress, and
//! the staged/unstaged change sets. It computes nothing itself; the engine
//! pushes each piece through a setter after any operation that can change
//! it (checkout, commit, merge, stage/unstage).

use std::fmt;

use crate::error::{PassportError, Result};

/// Multi-step operation a repository can be in the middle of
///
/// Discriminants mirror `git_repository_state_t` from libgit2's
/// `repository.h`; codes arrive from the engine verbatim. A change in that
/// enumeration is an external contract break, not handled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum RepositoryState {
    /// No operation in progress
    #[default]
    None = 0,
    /// Merge in progress
    Merge = 1,
    /// Revert in progress
    Revert = 2,
    /// Sequenced revert in progress
    RevertSequence = 3,
    /// Cherry-pick in progress
    CherryPick = 4,
    /// Sequenced cherry-pick in progress
    CherryPickSequence = 5,
    /// Bisect in progress
    Bisect = 6,
    /// Rebase in progress
    Rebase = 7,
    /// Interactive rebase in progress
    RebaseInteractive = 8,
    /// Merge-backend rebase in progress
    RebaseMerge = 9,
    /// Mailbox apply in progress
    ApplyMailbox = 10,
    /// Mailbox apply or rebase in progress
    ApplyMailboxOrRebase = 11,
}

impl RepositoryState {
    /// Decode an engine state code
    ///
    /// Returns `None` for codes outside the enumeration.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(RepositoryState::None),
            1 => Some(RepositoryState::Merge),
            2 => Some(RepositoryState::Revert),
            3 => Some(RepositoryState::RevertSequence),
            4 => Some(RepositoryState::CherryPick),
            5 => Some(RepositoryState::CherryPickSequence),
            6 => Some(RepositoryState::Bisect),
            7 => Some(RepositoryState::Rebase),
            8 => Some(RepositoryState::RebaseInteractive),
            9 => Some(RepositoryState::RebaseMerge),
            10 => Some(RepositoryState::ApplyMailbox),
            11 => Some(RepositoryState::ApplyMailboxOrRebase),
            _ => None,
        }
    }

    /// Numeric engine code for this state
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            RepositoryState::None => "None",
            RepositoryState::Merge => "Merge",
            RepositoryState::Revert => "Revert",
            RepositoryState::RevertSequence => "Revert Sequence",
            RepositoryState::CherryPick => "Cherrypick",
            RepositoryState::CherryPickSequence => "Cherrypick Sequence",
            RepositoryState::Bisect => "Bisect",
            RepositoryState::Rebase => "Rebase",
            RepositoryState::RebaseInteractive => "Interactive Rebase",
            RepositoryState::RebaseMerge => "Merge Rebase",
            RepositoryState::ApplyMailbox => "Apply Mailbox",
            RepositoryState::ApplyMailboxOrRebase => "Apply Mailbox or Rebase",
        }
    }

    /// All states, in code order
    pub fn all() -> &'static [RepositoryState] {
        &[
            RepositoryState::None,
            RepositoryState::Merge,
            RepositoryState::Revert,
            RepositoryState::RevertSequence,
            RepositoryState::CherryPick,
            RepositoryState::CherryPickSequence,
            RepositoryState::Bisect,
            RepositoryState::Rebase,
            RepositoryState::RebaseInteractive,
            RepositoryState::RebaseMerge,
            RepositoryState::ApplyMailbox,
            RepositoryState::ApplyMailboxOrRebase,
        ]
    }
}

impl fmt::Display for RepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Opaque change set produced by the engine
///
/// The library stores and exposes diffs; it never interprets them. The
/// payload is the engine's rendered patch text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    patch: String,
}

impl Diff {
    /// Wrap engine-produced patch text
    pub fn new(patch: impl Into<String>) -> Self {
        Self {
            patch: patch.into(),
        }
    }

    /// The rendered patch text
    pub fn patch(&self) -> &str {
        &self.patch
    }

    /// Whether the change set is empty
    pub fn is_empty(&self) -> bool {
        self.patch.is_empty()
    }
}

/// Snapshot of an open working copy
///
/// One long-lived instance per repository view. Every field is settable
/// independently; last write wins per field, with no ordering constraint
/// between them.
#[derive(Debug, Clone, Default)]
pub struct RepositoryStatus {
    /// Name of the checked-out branch
    pub current_branch: String,
    /// Operation currently in progress, if any
    pub state: RepositoryState,
    /// Changes staged for the next commit
    pub staged_changes: Diff,
    /// Changes in the working tree not yet staged
    pub unstaged_changes: Diff,
}

impl RepositoryStatus {
    /// Empty snapshot: no branch, no operation, no changes
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current branch name
    pub fn set_current_branch(&mut self, branch: impl Into<String>) {
        self.current_branch = branch.into();
    }

    /// Record the staged change set
    pub fn set_staged_changes(&mut self, changes: Diff) {
        self.staged_changes = changes;
    }

    /// Record the unstaged change set
    pub fn set_unstaged_changes(&mut self, changes: Diff) {
        self.unstaged_changes = changes;
    }

    /// Record the in-progress-operation state from a raw engine code
    ///
    /// An unknown code leaves the previous state in place and fails with
    /// [`PassportError::UnknownStateCode`]; it is also reported through
    /// `tracing` so a misbehaving engine is visible.
    pub fn set_state(&mut self, code: i32) -> Result<()> {
        match RepositoryState::from_code(code) {
            Some(state) => {
                self.state = state;
                Ok(())
            }
            None => {
                tracing::warn!(code, "invalid repository state code");
                Err(PassportError::UnknownStateCode(code))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_decode() {
        assert_eq!(RepositoryState::from_code(0), Some(RepositoryState::None));
        assert_eq!(RepositoryState::from_code(7), Some(RepositoryState::Rebase));
        assert_eq!(
            RepositoryState::from_code(11),
            Some(RepositoryState::ApplyMailboxOrRebase)
        );
        assert_eq!(RepositoryState::from_code(12), None);
        assert_eq!(RepositoryState::from_code(-1), None);
    }

    #[test]
    fn test_code_round_trip() {
        for state in RepositoryState::all() {
            assert_eq!(RepositoryState::from_code(state.code()), Some(*state));
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RepositoryState::RebaseInteractive.to_string(), "Interactive Rebase");
        assert_eq!(
            RepositoryState::ApplyMailboxOrRebase.to_string(),
            "Apply Mailbox or Rebase"
        );
    }

    #[test]
    fn test_set_state() {
        let mut status = RepositoryStatus::new();
        status.set_state(7).unwrap();
        assert_eq!(status.state, RepositoryState::Rebase);
    }

    #[test]
    fn test_unknown_state_code_keeps_prior_state() {
        let mut status = RepositoryStatus::new();
        status.set_state(4).unwrap();

        let result = status.set_state(999);
        assert!(matches!(result, Err(PassportError::UnknownStateCode(999))));
        assert_eq!(status.state, RepositoryState::CherryPick);
    }

    #[test]
    fn test_setters_are_independent() {
        let mut status = RepositoryStatus::new();
        status.set_current_branch("main");
        status.set_staged_changes(Diff::new("+staged\n"));
        status.set_unstaged_changes(Diff::new("+unstaged\n"));

        assert_eq!(status.current_branch, "main");
        assert_eq!(status.staged_changes.patch(), "+staged\n");
        assert_eq!(status.unstaged_changes.patch(), "+unstaged\n");
        assert_eq!(status.state, RepositoryState::None);

        // Last write wins per field
        status.set_current_branch("feature");
        assert_eq!(status.current_branch, "feature");
        assert!(!status.staged_changes.is_empty());
    }
}
