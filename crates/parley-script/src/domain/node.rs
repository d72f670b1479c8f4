//! Scripted dialogue nodes.

/// One option of a scripted choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOption {
    pub label: String,
    /// Name of the script loaded when this option is selected.
    pub next_script: String,
}

/// A single step of a linear script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogNode {
    /// Text spoken by a narrator. `narrator` is a name-table key.
    Line { narrator: String, text: String },
    /// Asks the player for a value and registers it under `key`.
    InputPrompt { key: String, prompt: String },
    /// Asks the player to pick the next script.
    Choice {
        prompt: String,
        options: Vec<ScriptOption>,
    },
}

impl DialogNode {
    /// Returns true for nodes that hold the script until the player
    /// answers them.
    #[must_use]
    pub fn needs_answer(&self) -> bool {
        !matches!(self, Self::Line { .. })
    }
}
