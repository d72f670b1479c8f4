//! Dialogue error types.

use thiserror::Error;

/// Top-level error type shared by the Parley crates.
///
/// None of these cover ordinary traversal (end of lines, end of choices);
/// those are plain state-machine transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    /// A branch id was resolved but no branch carries it.
    #[error("branch not found: {0}")]
    MissingBranch(String),

    /// Two authored branches share an id.
    #[error("duplicate branch id: {0}")]
    DuplicateBranchId(String),

    /// An authored branch has no id.
    #[error("branch with empty id in group {group}")]
    EmptyBranchId {
        /// The group the offending branch was authored in.
        group: String,
    },

    /// Traversal came back to a branch without showing a line, a choice
    /// or an effect since it was last entered.
    #[error("branch {0} loops back to itself without dialogue")]
    SilentCycle(String),

    /// A conversation was started over a graph with no branches.
    #[error("conversation has no branches")]
    EmptyGraph,

    /// Authored content could not be read or parsed.
    #[error("invalid dialogue source: {0}")]
    InvalidSource(String),

    /// A scene hand-off could not be stored or loaded.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The engine is gone, or nobody is left to send it input.
    #[error("conversation engine closed")]
    EngineClosed,
}
