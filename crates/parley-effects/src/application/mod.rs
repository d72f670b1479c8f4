//! Application layer for the effect context.

pub mod queue;
pub mod ui_groups;
