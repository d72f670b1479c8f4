//! Step-by-step playback of a scripted dialogue queue.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::domain::names::NameTable;
use crate::domain::node::DialogNode;

/// What the host should display after `ScriptRunner::advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    /// Show a spoken line.
    Line { speaker: String, text: String },
    /// Ask the player for a value; answer with `submit_input`.
    InputPrompt { prompt: String },
    /// Offer options; answer with `select`.
    Choice { prompt: String, labels: Vec<String> },
    /// The displayed prompt or choice has not been answered yet.
    Waiting,
    /// Nothing is left to play.
    Finished,
}

/// Plays a queue of `DialogNode`s one `advance` at a time.
///
/// Placeholders are substituted when a node is displayed, against the name
/// table as it is at that moment.
#[derive(Debug, Clone, Default)]
pub struct ScriptRunner {
    queue: VecDeque<DialogNode>,
    current: Option<DialogNode>,
    answered: bool,
    names: NameTable,
}

impl ScriptRunner {
    #[must_use]
    pub fn new(names: NameTable) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    /// Appends nodes to the end of the queue.
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = DialogNode>) {
        self.queue.extend(nodes);
    }

    /// Replaces every queued node.
    pub fn replace(&mut self, nodes: impl IntoIterator<Item = DialogNode>) {
        self.queue.clear();
        self.queue.extend(nodes);
    }

    /// Inserts a node so that it plays next.
    pub fn push_front(&mut self, node: DialogNode) {
        self.queue.push_front(node);
    }

    /// Number of nodes not yet displayed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut NameTable {
        &mut self.names
    }

    /// The node displayed last.
    #[must_use]
    pub fn current(&self) -> Option<&DialogNode> {
        self.current.as_ref()
    }

    /// Displays the next node.
    ///
    /// Returns `Waiting` while the displayed prompt or choice is
    /// unanswered.
    pub fn advance(&mut self) -> ScriptEvent {
        if self.current.as_ref().is_some_and(DialogNode::needs_answer) && !self.answered {
            return ScriptEvent::Waiting;
        }

        let Some(node) = self.queue.pop_front() else {
            self.current = None;
            return ScriptEvent::Finished;
        };
        let event = self.display(&node);
        self.current = Some(node);
        self.answered = false;
        event
    }

    /// Answers the displayed input prompt, registering `value` under its
    /// key. Returns false if no prompt is waiting.
    pub fn submit_input(&mut self, value: &str) -> bool {
        match &self.current {
            Some(DialogNode::InputPrompt { key, .. }) if !self.answered => {
                debug!(key = %key, "name registered");
                self.names.register(key.clone(), value);
                self.answered = true;
                true
            }
            _ => {
                warn!("input submitted while no prompt is waiting");
                false
            }
        }
    }

    /// Answers the displayed choice and returns the script to load next.
    /// Returns `None` if no choice is waiting or `index` is out of range.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let Some(DialogNode::Choice { options, .. }) = &self.current else {
            warn!(index, "selection made while no choice is waiting");
            return None;
        };
        if self.answered {
            return None;
        }
        let Some(option) = options.get(index) else {
            warn!(index, options = options.len(), "choice index out of range");
            return None;
        };
        let next = option.next_script.clone();
        self.answered = true;
        Some(next)
    }

    fn display(&self, node: &DialogNode) -> ScriptEvent {
        match node {
            DialogNode::Line { narrator, text } => ScriptEvent::Line {
                speaker: self.names.display_name(narrator).to_owned(),
                text: self.names.substitute(text).into_owned(),
            },
            DialogNode::InputPrompt { prompt, .. } => ScriptEvent::InputPrompt {
                prompt: self.names.substitute(prompt).into_owned(),
            },
            DialogNode::Choice { prompt, options } => ScriptEvent::Choice {
                prompt: self.names.substitute(prompt).into_owned(),
                labels: options
                    .iter()
                    .map(|option| self.names.substitute(&option.label).into_owned())
                    .collect(),
            },
        }
    }
}
