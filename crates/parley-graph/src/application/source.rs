//! Authored conversation sources.
//!
//! A source is a versioned YAML document holding groups of branches. It is
//! loaded once and handed to `BranchGraph::build` whenever a conversation
//! starts.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use parley_core::error::DialogueError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::model::{Branch, BranchGroup, ChoiceTarget};

/// A non-fatal problem found by `ConversationSource::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIssue {
    DuplicateBranchId { group: String, id: String },
    EmptyBranchId { group: String },
    DanglingAutoNext { branch: String, target: String },
    DanglingChoiceTarget { branch: String, label: String, target: String },
    InvalidEffect { branch: String, reason: String },
    /// Branches with no lines, choices or effects that lead back to each
    /// other, listed from the earliest authored one in traversal order.
    SilentCycle { branches: Vec<String> },
}

impl fmt::Display for SourceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateBranchId { group, id } => {
                write!(f, "branch id '{id}' in group '{group}' is already used")
            }
            Self::EmptyBranchId { group } => write!(f, "group '{group}' has a branch without id"),
            Self::DanglingAutoNext { branch, target } => {
                write!(f, "branch '{branch}' auto-continues to unknown branch '{target}'")
            }
            Self::DanglingChoiceTarget {
                branch,
                label,
                target,
            } => write!(
                f,
                "choice '{label}' of branch '{branch}' targets unknown branch '{target}'"
            ),
            Self::InvalidEffect { branch, reason } => {
                write!(f, "effect of branch '{branch}': {reason}")
            }
            Self::SilentCycle { branches } => write!(
                f,
                "branches {} loop without lines, choices or effects",
                branches.join(" -> ")
            ),
        }
    }
}

/// A versioned description of every branch group of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSource {
    /// Author-maintained revision number.
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub groups: Vec<BranchGroup>,
}

impl ConversationSource {
    /// Creates a source from groups.
    #[must_use]
    pub fn new(version: u32, groups: Vec<BranchGroup>) -> Self {
        Self { version, groups }
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::InvalidSource` if the YAML is malformed or
    /// does not match the expected shape.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DialogueError> {
        serde_yaml::from_str(yaml).map_err(|e| DialogueError::InvalidSource(e.to_string()))
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError::InvalidSource` if the file cannot be read or
    /// parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DialogueError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            DialogueError::InvalidSource(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Hex-encoded SHA-256 of the canonical JSON form of the groups.
    ///
    /// Two sources with the same content hash to the same value regardless
    /// of YAML formatting or `version`.
    #[must_use]
    pub fn version_hash(&self) -> String {
        // Serialization of derived Serialize types to JSON is infallible.
        let canonical =
            serde_json::to_vec(&self.groups).expect("BranchGroup serialization is infallible");
        format!("{:x}", Sha256::digest(&canonical))
    }

    /// Lists every non-fatal authoring problem, in source order.
    #[must_use]
    pub fn validate(&self) -> Vec<SourceIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for group in &self.groups {
            for branch in &group.branches {
                if branch.id.is_empty() {
                    issues.push(SourceIssue::EmptyBranchId {
                        group: group.name.clone(),
                    });
                } else if !seen.insert(branch.id.as_str()) {
                    issues.push(SourceIssue::DuplicateBranchId {
                        group: group.name.clone(),
                        id: branch.id.clone(),
                    });
                }
            }
        }

        for branch in self.groups.iter().flat_map(|g| &g.branches) {
            if let Some(target) = branch.auto_next() {
                if !seen.contains(target) {
                    issues.push(SourceIssue::DanglingAutoNext {
                        branch: branch.id.clone(),
                        target: target.to_owned(),
                    });
                }
            }
            for choice in &branch.choices {
                if let ChoiceTarget::GotoBranch(target) = &choice.target {
                    if !seen.contains(target.as_str()) {
                        issues.push(SourceIssue::DanglingChoiceTarget {
                            branch: branch.id.clone(),
                            label: choice.label.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
            let effect = &branch.effect_settings;
            if effect.enabled {
                if effect.blink_count == 0 {
                    issues.push(SourceIssue::InvalidEffect {
                        branch: branch.id.clone(),
                        reason: "blink_count must be at least 1".to_owned(),
                    });
                }
                if effect.blink_speed <= 0.0 {
                    issues.push(SourceIssue::InvalidEffect {
                        branch: branch.id.clone(),
                        reason: "blink_speed must be positive".to_owned(),
                    });
                }
                if effect.delay < 0.0 {
                    issues.push(SourceIssue::InvalidEffect {
                        branch: branch.id.clone(),
                        reason: "delay must not be negative".to_owned(),
                    });
                }
            }
        }

        issues.extend(
            self.silent_cycles()
                .into_iter()
                .map(|branches| SourceIssue::SilentCycle { branches }),
        );
        issues
    }

    /// Cycles the engine would walk forever without waiting, following
    /// `auto_next` or else traversal order. First-seen branches win, as in
    /// `BranchGraph::build`.
    fn silent_cycles(&self) -> Vec<Vec<String>> {
        let mut order: Vec<&Branch> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for branch in self.groups.iter().flat_map(|g| &g.branches) {
            if !branch.id.is_empty() && !index.contains_key(branch.id.as_str()) {
                index.insert(&branch.id, order.len());
                order.push(branch);
            }
        }
        let follow = |at: usize| match order[at].auto_next() {
            Some(target) => index.get(target).copied(),
            None => Some(at + 1).filter(|next| *next < order.len()),
        };

        let mut found: HashSet<usize> = HashSet::new();
        let mut cycles: Vec<Vec<String>> = Vec::new();
        for start in 0..order.len() {
            let mut path: Vec<usize> = Vec::new();
            let mut at = Some(start);
            while let Some(current) = at.filter(|i| order[*i].passes_through()) {
                if let Some(pos) = path.iter().position(|i| *i == current) {
                    let cycle = &path[pos..];
                    let first = cycle.iter().copied().min().unwrap_or(current);
                    if found.insert(first) {
                        let from = cycle.iter().position(|i| *i == first).unwrap_or(0);
                        cycles.push(
                            cycle[from..]
                                .iter()
                                .chain(&cycle[..from])
                                .map(|i| order[*i].id.clone())
                                .collect(),
                        );
                    }
                    break;
                }
                path.push(current);
                at = follow(current);
            }
        }
        cycles
    }
}
