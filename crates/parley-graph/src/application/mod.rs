//! Application layer for the branch graph context.

pub mod source;
