//! Branch lookup and traversal order.

use std::sync::Arc;

use indexmap::IndexMap;
use parley_core::error::DialogueError;
use tracing::warn;

use super::model::{Branch, BranchGroup};

/// Why a branch was left out of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The id was already taken by an earlier branch.
    Duplicate,
    /// The branch has no id.
    EmptyId,
}

/// A branch skipped during `BranchGraph::build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBranch {
    /// Group the branch was authored in.
    pub group: String,
    /// The offending id (empty for `RejectReason::EmptyId`).
    pub id: String,
    pub reason: RejectReason,
}

impl RejectedBranch {
    /// Converts the rejection into the matching `DialogueError`.
    #[must_use]
    pub fn to_error(&self) -> DialogueError {
        match self.reason {
            RejectReason::Duplicate => DialogueError::DuplicateBranchId(self.id.clone()),
            RejectReason::EmptyId => DialogueError::EmptyBranchId {
                group: self.group.clone(),
            },
        }
    }
}

/// Outcome of a graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of branches inserted.
    pub accepted: usize,
    /// Branches skipped, in the order they were encountered.
    pub rejected: Vec<RejectedBranch>,
}

impl BuildReport {
    /// Returns true when no branch was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Immutable-after-build mapping of branch ids to branches, in authoring
/// order.
///
/// The map preserves insertion order, so it doubles as the traversal order
/// used when a branch has neither choices nor an auto-next target.
#[derive(Debug, Clone, Default)]
pub struct BranchGraph {
    branches: IndexMap<String, Arc<Branch>>,
}

impl BranchGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph from `groups`, returning it with its build report.
    #[must_use]
    pub fn from_groups(groups: &[BranchGroup]) -> (Self, BuildReport) {
        let mut graph = Self::new();
        let report = graph.build(groups);
        (graph, report)
    }

    /// Clears the graph and repopulates it from `groups`.
    ///
    /// Branches with an empty id, or an id already present, are skipped
    /// and reported; the first-seen branch for an id wins.
    pub fn build(&mut self, groups: &[BranchGroup]) -> BuildReport {
        self.branches.clear();
        let mut report = BuildReport::default();

        for group in groups {
            for branch in &group.branches {
                let reason = if branch.id.is_empty() {
                    Some(RejectReason::EmptyId)
                } else if self.branches.contains_key(&branch.id) {
                    Some(RejectReason::Duplicate)
                } else {
                    None
                };

                match reason {
                    None => {
                        self.branches
                            .insert(branch.id.clone(), Arc::new(branch.clone()));
                        report.accepted += 1;
                    }
                    Some(reason) => {
                        warn!(
                            group = %group.name,
                            branch_id = %branch.id,
                            ?reason,
                            "duplicate or empty branch id; branch ignored"
                        );
                        report.rejected.push(RejectedBranch {
                            group: group.name.clone(),
                            id: branch.id.clone(),
                            reason,
                        });
                    }
                }
            }
        }

        report
    }

    /// Like `build`, but fails on the first duplicate or empty id.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::DuplicateBranchId` or
    /// `DialogueError::EmptyBranchId`; the graph is left empty.
    pub fn build_strict(&mut self, groups: &[BranchGroup]) -> Result<BuildReport, DialogueError> {
        let report = self.build(groups);
        if let Some(rejected) = report.rejected.first() {
            self.branches.clear();
            return Err(rejected.to_error());
        }
        Ok(report)
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&Arc<Branch>> {
        self.branches.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.branches.contains_key(id)
    }

    /// The first branch in traversal order.
    #[must_use]
    pub fn first(&self) -> Option<&Arc<Branch>> {
        self.branches.first().map(|(_, branch)| branch)
    }

    /// The branch immediately after `after_id` in traversal order.
    ///
    /// Returns `None` if `after_id` is last or unknown.
    #[must_use]
    pub fn next(&self, after_id: &str) -> Option<&Arc<Branch>> {
        let index = self.branches.get_index_of(after_id)?;
        self.branches.get_index(index + 1).map(|(_, branch)| branch)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Iterates branches in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Branch>> {
        self.branches.values()
    }
}
