//! Parley — scripted dialogue bounded context.
//!
//! A script is a flat queue of dialogue nodes loaded from CSV: spoken
//! lines, prompts that ask the player for a value, and choices that name
//! the next script to load. Player-supplied values are substituted into
//! later text through `{Key}` placeholders.

pub mod application;
pub mod domain;

pub use application::loader::{ScriptDirectory, parse_script};
pub use application::runner::{ScriptEvent, ScriptRunner};
pub use domain::error::ScriptError;
pub use domain::names::NameTable;
pub use domain::node::{DialogNode, ScriptOption};
