//! Named UI groups hidden while a timed effect plays.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parley_core::effect::{EffectObserver, EffectRequest};
use tracing::{debug, warn};

/// Host capability toggling a named group of UI elements.
pub trait UiGroupPort: Send + Sync {
    fn set_group_visible(&self, group: &str, visible: bool);

    fn is_group_visible(&self, group: &str) -> bool;
}

#[derive(Debug, Default)]
struct GroupState {
    /// Registered groups, in registration order.
    names: Vec<String>,
    /// Visibility captured by the last `hide_all`, parallel to `names`.
    previous: Vec<bool>,
}

/// Registry of UI groups that hides every group for the duration of a
/// timed effect and restores the ones that were visible before.
pub struct UiGroups {
    port: Arc<dyn UiGroupPort>,
    state: Mutex<GroupState>,
}

impl std::fmt::Debug for UiGroups {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiGroups")
            .field("groups", &self.lock().names)
            .finish_non_exhaustive()
    }
}

impl UiGroups {
    #[must_use]
    pub fn new(port: Arc<dyn UiGroupPort>) -> Self {
        Self {
            port,
            state: Mutex::new(GroupState::default()),
        }
    }

    /// Registers a group. Registering the same name twice is a no-op.
    pub fn add_group(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.lock();
        if state.names.contains(&name) {
            return;
        }
        let visible = self.port.is_group_visible(&name);
        state.names.push(name);
        state.previous.push(visible);
    }

    /// Shows or hides one registered group.
    pub fn set_group_visible(&self, name: &str, visible: bool) {
        if self.lock().names.iter().any(|n| n == name) {
            self.port.set_group_visible(name, visible);
        } else {
            warn!(group = name, "unknown UI group");
        }
    }

    /// Remembers each group's visibility, then hides them all.
    pub fn hide_all(&self) {
        let mut state = self.lock();
        let GroupState { names, previous } = &mut *state;
        for (name, was_visible) in names.iter().zip(previous.iter_mut()) {
            *was_visible = self.port.is_group_visible(name);
            self.port.set_group_visible(name, false);
        }
        debug!(groups = names.len(), "UI groups hidden");
    }

    /// Shows again every group that was visible at the last `hide_all`.
    pub fn restore_all(&self) {
        let state = self.lock();
        for (name, _) in state
            .names
            .iter()
            .zip(&state.previous)
            .filter(|(_, visible)| **visible)
        {
            self.port.set_group_visible(name, true);
        }
        debug!("UI groups restored");
    }

    fn lock(&self) -> MutexGuard<'_, GroupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EffectObserver for UiGroups {
    fn effect_started(&self, _request: &EffectRequest) {
        self.hide_all();
    }

    fn effect_completed(&self, _request: &EffectRequest) {
        self.restore_all();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use parley_test_support::FixedClock;

    use super::*;
    use parley_core::effect::EffectKind;

    #[derive(Default)]
    struct FakeGroups {
        visible: Mutex<HashMap<String, bool>>,
    }

    impl FakeGroups {
        fn with(groups: &[(&str, bool)]) -> Self {
            let visible = groups
                .iter()
                .map(|(name, v)| ((*name).to_owned(), *v))
                .collect();
            Self {
                visible: Mutex::new(visible),
            }
        }

        fn get(&self, group: &str) -> bool {
            self.is_group_visible(group)
        }
    }

    impl UiGroupPort for FakeGroups {
        fn set_group_visible(&self, group: &str, visible: bool) {
            self.visible.lock().unwrap().insert(group.to_owned(), visible);
        }

        fn is_group_visible(&self, group: &str) -> bool {
            self.visible.lock().unwrap().get(group).copied().unwrap_or(false)
        }
    }

    #[test]
    fn test_effect_hides_groups_and_restores_only_visible_ones() {
        // Arrange
        let port = Arc::new(FakeGroups::with(&[("hud", true), ("map", false)]));
        let groups = UiGroups::new(port.clone());
        groups.add_group("hud");
        groups.add_group("map");
        let request = EffectRequest::new("A", EffectKind::Blink, &FixedClock::reference());

        // Act
        groups.effect_started(&request);
        let hud_during = port.get("hud");
        groups.effect_completed(&request);

        // Assert
        assert!(!hud_during);
        assert!(port.get("hud"));
        assert!(!port.get("map"));
    }

    #[test]
    fn test_set_group_visible_ignores_unregistered_group() {
        let port = Arc::new(FakeGroups::default());
        let groups = UiGroups::new(port.clone());
        groups.add_group("hud");

        groups.set_group_visible("hud", true);
        groups.set_group_visible("inventory", true);

        assert!(port.get("hud"));
        assert!(!port.get("inventory"));
    }

    #[test]
    fn test_hide_all_captures_visibility_changes_after_registration() {
        // Arrange
        let port = Arc::new(FakeGroups::with(&[("hud", false)]));
        let groups = UiGroups::new(port.clone());
        groups.add_group("hud");
        groups.set_group_visible("hud", true);

        // Act
        groups.hide_all();
        groups.restore_all();

        // Assert
        assert!(port.get("hud"));
    }
}
