//! Entries shown in the item list and how they are loaded.
//!
//! Each view runs one fixed log template through the runner and splits every
//! output line into an identifier and a free-form label. Nothing else is
//! parsed.

use std::fmt;

use crate::dispatch::SelectedItem;

const REVISION_TEMPLATE: &str =
    r#"change_id.short() ++ " " ++ commit_id.short() ++ " " ++ description.first_line() ++ "\n""#;
const OPERATION_TEMPLATE: &str = r#"id.short() ++ " " ++ description.first_line() ++ "\n""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Revisions,
    Files,
    Operations,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Revisions => "Revisions",
            Self::Files => "Files",
            Self::Operations => "Operations",
        })
    }
}

/// One row of the item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub item: SelectedItem,
    pub label: String,
}

/// What to list, with the context needed to build the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    Revisions,
    Files { change_id: String, commit_id: String },
    Operations,
}

impl ItemSource {
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Revisions => ItemKind::Revisions,
            Self::Files { .. } => ItemKind::Files,
            Self::Operations => ItemKind::Operations,
        }
    }

    /// Arguments for the VCS program.
    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            Self::Revisions => vec!["log", "--no-graph", "--color=never", "-T", REVISION_TEMPLATE],
            Self::Files { change_id, .. } => {
                vec!["diff", "--summary", "--color=never", "-r", change_id.as_str()]
            }
            Self::Operations => vec!["op", "log", "--no-graph", "--color=never", "-T", OPERATION_TEMPLATE],
        };
        args.into_iter().map(str::to_string).collect()
    }

    /// Turn one output line into an entry; blank lines are skipped.
    pub fn parse_line(&self, line: &str) -> Option<ListEntry> {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return None;
        }

        let item = match self {
            Self::Revisions => {
                let mut fields = line.split_whitespace();
                let change_id = fields.next()?;
                let commit_id = fields.next().unwrap_or_default();
                SelectedItem::revision(change_id, commit_id)
            }
            Self::Files {
                change_id,
                commit_id,
            } => {
                // `M src/main.rs`: the status letter stays in the label only.
                let path = line.split_once(' ').map_or(line, |(_, path)| path).trim();
                SelectedItem::File {
                    change_id: change_id.clone(),
                    commit_id: commit_id.clone(),
                    path: path.to_string(),
                }
            }
            Self::Operations => SelectedItem::operation(line.split_whitespace().next()?),
        };

        Some(ListEntry {
            item,
            label: line.to_string(),
        })
    }

    pub fn parse(&self, lines: &[String]) -> Vec<ListEntry> {
        lines.iter().filter_map(|line| self.parse_line(line)).collect()
    }
}
