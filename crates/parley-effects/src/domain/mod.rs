//! Domain layer for the effect context.

pub mod mapping;
