//! Parley Core — shared abstractions for the dialogue runtime.
//!
//! This crate defines the fundamental types and ports that every other
//! Parley crate depends on: the clock, errors, configuration, and the
//! capability traits implemented by the host application (effect backend,
//! presentation, scene hand-off storage). It contains no scheduling code.

pub mod clock;
pub mod config;
pub mod effect;
pub mod error;
pub mod handoff;
pub mod presentation;
