//! Authored dialogue data: lines, choices, effect settings and branches.
//!
//! All of these are immutable once authored; the runtime only reads them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single line of dialogue spoken by one speaker slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Presentation slot of the speaker.
    #[serde(rename = "speaker")]
    pub speaker_index: usize,
    /// Name shown above the text.
    #[serde(rename = "name", default)]
    pub speaker_name: String,
    /// Text revealed character by character.
    pub text: String,
}

impl Line {
    /// Creates a line.
    #[must_use]
    pub fn new(speaker_index: usize, speaker_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker_index,
            speaker_name: speaker_name.into(),
            text: text.into(),
        }
    }
}

/// Where a selected choice sends the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceTarget {
    /// Continue with another branch of the same graph.
    GotoBranch(String),
    /// Leave the conversation and load another scene.
    GotoScene {
        /// Scene to load.
        scene_id: String,
        /// Camera position the next scene starts from.
        camera_position: Vec3,
    },
    /// Stop the conversation.
    EndConversation,
}

/// A player-selectable option shown after a branch's last line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AuthoredChoice", into = "AuthoredChoice")]
pub struct Choice {
    /// Button label.
    pub label: String,
    /// Resolved destination.
    pub target: ChoiceTarget,
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub fn new(label: impl Into<String>, target: ChoiceTarget) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

/// On-disk shape of a choice: optional branch and scene references.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthoredChoice {
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scene: Option<AuthoredScene>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthoredScene {
    scene_id: String,
    #[serde(default)]
    camera_position: Vec3,
}

impl From<AuthoredChoice> for Choice {
    fn from(raw: AuthoredChoice) -> Self {
        let branch = raw.next_branch.filter(|id| !id.is_empty());
        let scene = raw.scene.filter(|scene| !scene.scene_id.is_empty());
        let target = match (branch, scene) {
            (Some(id), _) => ChoiceTarget::GotoBranch(id),
            (None, Some(scene)) => ChoiceTarget::GotoScene {
                scene_id: scene.scene_id,
                camera_position: scene.camera_position,
            },
            (None, None) => ChoiceTarget::EndConversation,
        };
        Self {
            label: raw.label,
            target,
        }
    }
}

impl From<Choice> for AuthoredChoice {
    fn from(choice: Choice) -> Self {
        let (next_branch, scene) = match choice.target {
            ChoiceTarget::GotoBranch(id) => (Some(id), None),
            ChoiceTarget::GotoScene {
                scene_id,
                camera_position,
            } => (
                None,
                Some(AuthoredScene {
                    scene_id,
                    camera_position,
                }),
            ),
            ChoiceTarget::EndConversation => (None, None),
        };
        Self {
            label: choice.label,
            next_branch,
            scene,
        }
    }
}

/// Visual effect requested around a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    /// Vignette blink cycles.
    #[default]
    Blink,
    /// Blur set to the configured start/end intensity.
    Blur,
    /// Blur, blink cycles, then a smooth blur restore.
    BlinkWithBlur,
    /// Blur with intensities authored on the branch.
    CustomBlur,
}

/// Whether and how a branch waits for a visual effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    pub enabled: bool,
    pub effect_type: EffectType,
    pub trigger_on_start: bool,
    pub trigger_on_end: bool,
    /// Seconds to wait before requesting the effect.
    pub delay: f32,
    pub blur_start: f32,
    pub blur_end: f32,
    pub blink_count: u32,
    pub blink_speed: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            effect_type: EffectType::Blink,
            trigger_on_start: false,
            trigger_on_end: false,
            delay: 0.0,
            blur_start: 0.0,
            blur_end: 1.4,
            blink_count: 3,
            blink_speed: 0.8,
        }
    }
}

impl EffectSettings {
    /// Enabled settings that fire `effect_type` when the branch starts.
    #[must_use]
    pub fn on_start(effect_type: EffectType) -> Self {
        Self {
            enabled: true,
            effect_type,
            trigger_on_start: true,
            ..Self::default()
        }
    }

    /// Enabled settings that fire `effect_type` when the branch is left.
    #[must_use]
    pub fn on_end(effect_type: EffectType) -> Self {
        Self {
            enabled: true,
            effect_type,
            trigger_on_end: true,
            ..Self::default()
        }
    }

    /// Returns true if an effect must complete before the first line.
    #[must_use]
    pub fn fires_on_start(&self) -> bool {
        self.enabled && self.trigger_on_start
    }

    /// Returns true if an effect must complete after the branch is left.
    #[must_use]
    pub fn fires_on_end(&self) -> bool {
        self.enabled && self.trigger_on_end
    }
}

/// A named unit of dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique, non-empty identifier within a graph.
    pub id: String,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Branch played next when there are no choices.
    #[serde(default, rename = "auto_next", skip_serializing_if = "Option::is_none")]
    pub auto_next_branch_id: Option<String>,
    #[serde(default, rename = "effect")]
    pub effect_settings: EffectSettings,
}

impl Branch {
    /// Creates an empty branch with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lines: Vec::new(),
            choices: Vec::new(),
            auto_next_branch_id: None,
            effect_settings: EffectSettings::default(),
        }
    }

    /// Appends a line.
    #[must_use]
    pub fn with_line(mut self, speaker_index: usize, speaker_name: &str, text: &str) -> Self {
        self.lines.push(Line::new(speaker_index, speaker_name, text));
        self
    }

    /// Appends a choice.
    #[must_use]
    pub fn with_choice(mut self, label: &str, target: ChoiceTarget) -> Self {
        self.choices.push(Choice::new(label, target));
        self
    }

    /// Sets the auto-next branch.
    #[must_use]
    pub fn with_auto_next(mut self, id: &str) -> Self {
        self.auto_next_branch_id = Some(id.to_owned());
        self
    }

    /// Replaces the effect settings.
    #[must_use]
    pub fn with_effect(mut self, settings: EffectSettings) -> Self {
        self.effect_settings = settings;
        self
    }

    /// The auto-next target, treating an empty string as unset.
    #[must_use]
    pub fn auto_next(&self) -> Option<&str> {
        self.auto_next_branch_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Returns true if playing the branch never waits: it has no lines, no
    /// choices and no effect that fires.
    #[must_use]
    pub fn passes_through(&self) -> bool {
        self.lines.is_empty()
            && self.choices.is_empty()
            && !self.effect_settings.fires_on_start()
            && !self.effect_settings.fires_on_end()
    }
}

/// An authored group of branches, e.g. one scene's worth of dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchGroup {
    pub name: String,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl BranchGroup {
    /// Creates a group from branches.
    #[must_use]
    pub fn new(name: impl Into<String>, branches: Vec<Branch>) -> Self {
        Self {
            name: name.into(),
            branches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_choice(yaml: &str) -> Choice {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_choice_with_branch_resolves_to_goto_branch() {
        let choice = parse_choice("label: Stay\nnext_branch: B\n");

        assert_eq!(choice.target, ChoiceTarget::GotoBranch("B".to_owned()));
    }

    #[test]
    fn test_choice_with_scene_resolves_to_goto_scene() {
        let choice =
            parse_choice("label: Go\nscene:\n  scene_id: harbor\n  camera_position: [1.0, 2.0, 3.0]\n");

        assert_eq!(
            choice.target,
            ChoiceTarget::GotoScene {
                scene_id: "harbor".to_owned(),
                camera_position: Vec3::new(1.0, 2.0, 3.0),
            }
        );
    }

    #[test]
    fn test_choice_with_empty_branch_and_no_scene_ends_conversation() {
        let choice = parse_choice("label: Leave\nnext_branch: \"\"\n");

        assert_eq!(choice.target, ChoiceTarget::EndConversation);
    }

    #[test]
    fn test_choice_with_empty_scene_id_ends_conversation() {
        let choice = parse_choice("label: Leave\nscene:\n  scene_id: \"\"\n");

        assert_eq!(choice.target, ChoiceTarget::EndConversation);
    }

    #[test]
    fn test_branch_defaults_fill_missing_fields() {
        let branch: Branch = serde_yaml::from_str("id: A\n").unwrap();

        assert!(branch.lines.is_empty());
        assert!(branch.choices.is_empty());
        assert_eq!(branch.auto_next(), None);
        assert!(!branch.effect_settings.enabled);
    }

    #[test]
    fn test_empty_auto_next_is_treated_as_unset() {
        let branch = Branch::new("A").with_auto_next("");

        assert_eq!(branch.auto_next(), None);
    }

    #[test]
    fn test_only_empty_effectless_branches_pass_through() {
        assert!(Branch::new("A").with_auto_next("B").passes_through());
        assert!(!Branch::new("A").with_line(0, "Mira", "hi").passes_through());
        assert!(
            !Branch::new("A")
                .with_choice("Leave", ChoiceTarget::EndConversation)
                .passes_through()
        );
        assert!(
            !Branch::new("A")
                .with_effect(EffectSettings::on_end(EffectType::Blur))
                .passes_through()
        );
    }

    #[test]
    fn test_effect_triggers_require_enabled() {
        let mut settings = EffectSettings::on_start(EffectType::Blink);
        assert!(settings.fires_on_start());
        assert!(!settings.fires_on_end());

        settings.enabled = false;
        assert!(!settings.fires_on_start());
    }
}
