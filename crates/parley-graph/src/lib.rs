//! Parley — branch graph bounded context.
//!
//! Responsible for the authored dialogue data model, the immutable branch
//! lookup used during a conversation, and loading/versioning of authored
//! sources.

pub mod application;
pub mod domain;

pub use application::source::{ConversationSource, SourceIssue};
pub use domain::graph::{BranchGraph, BuildReport, RejectReason, RejectedBranch};
pub use domain::model::{
    Branch, BranchGroup, Choice, ChoiceTarget, EffectSettings, EffectType, Line,
};
