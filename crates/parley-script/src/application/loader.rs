//! CSV script loading.
//!
//! Rows are `type,narrator,is_talking,dialog` after a header row:
//!
//! * `100`: a spoken line; `narrator` is the name-table key.
//! * `200`: an input prompt; `narrator` is the key the answer registers.
//! * `300`: a choice; `dialog` is `prompt|label|label…` and `narrator`
//!   is `script|script…`, one script per label.
//!
//! Fields may be double-quoted. `*` in the dialog column stands for a
//! comma. Rows that do not fit are logged and skipped.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::error::ScriptError;
use crate::domain::node::{DialogNode, ScriptOption};

const LINE: u32 = 100;
const INPUT_PROMPT: u32 = 200;
const CHOICE: u32 = 300;

static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|([^,]+)"#).expect("field pattern is valid"));

/// Parses a whole CSV script.
#[must_use]
pub fn parse_script(csv: &str) -> Vec<DialogNode> {
    csv.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| !row.trim().is_empty())
        .filter_map(|(index, row)| {
            let node = parse_row(row);
            if node.is_none() {
                warn!(row = index + 1, content = row, "malformed script row; skipped");
            }
            node
        })
        .collect()
}

fn split_fields(row: &str) -> Vec<&str> {
    FIELD
        .captures_iter(row)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .collect()
}

fn parse_row(row: &str) -> Option<DialogNode> {
    let fields = split_fields(row);
    let [kind, narrator, is_talking, dialog, ..] = fields.as_slice() else {
        return None;
    };
    let kind: u32 = kind.parse().ok()?;
    is_talking.parse::<i32>().ok()?;
    let dialog = dialog.replace('*', ",");

    match kind {
        LINE => Some(DialogNode::Line {
            narrator: (*narrator).to_owned(),
            text: dialog,
        }),
        INPUT_PROMPT => Some(DialogNode::InputPrompt {
            key: (*narrator).to_owned(),
            prompt: dialog,
        }),
        CHOICE => parse_choice(narrator, &dialog),
        other => {
            debug!(kind = other, "unknown script row type");
            None
        }
    }
}

fn parse_choice(scripts: &str, dialog: &str) -> Option<DialogNode> {
    let mut parts = dialog.split('|');
    let prompt = parts.next().filter(|p| !p.is_empty())?.to_owned();
    let labels: Vec<&str> = parts.collect();
    let scripts: Vec<&str> = scripts.split('|').filter(|s| !s.is_empty()).collect();
    if labels.is_empty() || scripts.is_empty() {
        return None;
    }
    if labels.len() != scripts.len() {
        warn!(
            labels = labels.len(),
            scripts = scripts.len(),
            "choice labels and scripts differ in number; extra entries dropped"
        );
    }
    let options = labels
        .into_iter()
        .zip(scripts)
        .map(|(label, script)| ScriptOption {
            label: label.to_owned(),
            next_script: script.to_owned(),
        })
        .collect();
    Some(DialogNode::Choice { prompt, options })
}

/// A directory of `<name>.csv` scripts.
#[derive(Debug, Clone)]
pub struct ScriptDirectory {
    root: PathBuf,
}

impl ScriptDirectory {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the script called `name`.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::InvalidName` if `name` is empty, absolute, or
    /// walks out of the directory.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, ScriptError> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(ScriptError::InvalidName(name.to_owned()));
        }
        Ok(self.root.join(format!("{name}.csv")))
    }

    /// Reads and parses the script called `name`.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::InvalidName` for a bad name and
    /// `ScriptError::Io` if the file cannot be read.
    pub fn load(&self, name: &str) -> Result<Vec<DialogNode>, ScriptError> {
        let path = self.path_of(name)?;
        let csv = std::fs::read_to_string(&path).map_err(|source| ScriptError::Io {
            path: path.clone(),
            source,
        })?;
        let nodes = parse_script(&csv);
        debug!(script = name, nodes = nodes.len(), "script loaded");
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "type,narrator,is_talking,dialog\n";

    #[test]
    fn test_parse_script_reads_every_row_type() {
        // Arrange
        let csv = format!(
            "{HEADER}100,Narrator,1,Hello {{Player}}*\n\
             200,Player,0,What is your name?\n\
             300,forest|town,0,Where to?|Forest|Town\n"
        );

        // Act
        let nodes = parse_script(&csv);

        // Assert
        assert_eq!(
            nodes,
            vec![
                DialogNode::Line {
                    narrator: "Narrator".to_owned(),
                    text: "Hello {Player},".to_owned(),
                },
                DialogNode::InputPrompt {
                    key: "Player".to_owned(),
                    prompt: "What is your name?".to_owned(),
                },
                DialogNode::Choice {
                    prompt: "Where to?".to_owned(),
                    options: vec![
                        ScriptOption {
                            label: "Forest".to_owned(),
                            next_script: "forest".to_owned(),
                        },
                        ScriptOption {
                            label: "Town".to_owned(),
                            next_script: "town".to_owned(),
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let csv = format!("{HEADER}100,Witch,1,\"Well, well\"\n");

        let nodes = parse_script(&csv);

        assert_eq!(
            nodes,
            vec![DialogNode::Line {
                narrator: "Witch".to_owned(),
                text: "Well, well".to_owned(),
            }]
        );
    }

    #[test]
    fn test_malformed_and_unknown_rows_are_skipped() {
        // Arrange
        let csv = format!(
            "{HEADER}100,Narrator\n\
             abc,Narrator,1,text\n\
             999,Narrator,1,text\n\
             300,,0,Where?\n\
             100,Narrator,1,kept\n"
        );

        // Act
        let nodes = parse_script(&csv);

        // Assert
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], DialogNode::Line { text, .. } if text == "kept"));
    }

    #[test]
    fn test_header_only_script_is_empty() {
        assert!(parse_script(HEADER).is_empty());
        assert!(parse_script("").is_empty());
    }

    #[test]
    fn test_path_of_rejects_escaping_names() {
        let dir = ScriptDirectory::new("/data");

        assert_eq!(dir.path_of("intro").unwrap(), PathBuf::from("/data/intro.csv"));
        assert!(matches!(dir.path_of("../secret"), Err(ScriptError::InvalidName(_))));
        assert!(matches!(dir.path_of("/etc/passwd"), Err(ScriptError::InvalidName(_))));
        assert!(matches!(dir.path_of(""), Err(ScriptError::InvalidName(_))));
    }

    #[test]
    fn test_load_reads_named_script() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("intro.csv"),
            format!("{HEADER}100,Narrator,1,Welcome\n"),
        )
        .unwrap();
        let scripts = ScriptDirectory::new(dir.path());

        // Act
        let nodes = scripts.load("intro").unwrap();

        // Assert
        assert_eq!(nodes.len(), 1);
        assert!(matches!(scripts.load("missing"), Err(ScriptError::Io { .. })));
    }
}
