//! UI groups tracked in memory.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use parley_effects::UiGroupPort;
use tracing::debug;

/// Remembers group visibility without drawing anything. Unknown groups
/// start visible.
#[derive(Debug, Default)]
pub struct ConsoleUiGroups {
    visible: Mutex<HashMap<String, bool>>,
}

impl ConsoleUiGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiGroupPort for ConsoleUiGroups {
    fn set_group_visible(&self, group: &str, visible: bool) {
        debug!(group, visible, "UI group");
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(group.to_owned(), visible);
    }

    fn is_group_visible(&self, group: &str) -> bool {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(group)
            .copied()
            .unwrap_or(true)
    }
}
