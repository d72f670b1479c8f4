//! Parley — effect serialization bounded context.
//!
//! Responsible for turning branch effect settings into effect requests and
//! for playing those requests one at a time, process-wide, in the order
//! they were made.

pub mod application;
pub mod domain;

pub use application::queue::{EffectCompletion, EffectQueue};
pub use application::ui_groups::{UiGroupPort, UiGroups};
pub use domain::mapping::{EffectMoment, request_for_branch};
