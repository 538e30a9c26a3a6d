use std::fmt;

use crate::dispatch::placeholder::{Placeholder, Replacements};

/// The item currently highlighted in the UI.
///
/// Owned by the UI; the dispatch code only reads it to decide applicability
/// and to build placeholder values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectedItem {
    Revision {
        change_id: String,
        commit_id: String,
    },
    File {
        change_id: String,
        commit_id: String,
        path: String,
    },
    Operation {
        operation_id: String,
    },
    #[default]
    None,
}

impl SelectedItem {
    pub fn revision(change_id: impl Into<String>, commit_id: impl Into<String>) -> Self {
        Self::Revision {
            change_id: change_id.into(),
            commit_id: commit_id.into(),
        }
    }

    pub fn operation(operation_id: impl Into<String>) -> Self {
        Self::Operation {
            operation_id: operation_id.into(),
        }
    }

    /// Change id when a whole revision is selected.
    pub fn revision_id(&self) -> Option<&str> {
        match self {
            Self::Revision { change_id, .. } => Some(change_id),
            Self::File { .. } | Self::Operation { .. } | Self::None => None,
        }
    }

    /// Placeholder values available for this selection.
    pub fn replacements(&self) -> Replacements {
        match self {
            Self::Revision {
                change_id,
                commit_id,
            } => Replacements::new()
                .with(Placeholder::ChangeId, change_id)
                .with(Placeholder::CommitId, commit_id),
            Self::File {
                change_id,
                commit_id,
                path,
            } => Replacements::new()
                .with(Placeholder::ChangeId, change_id)
                .with(Placeholder::CommitId, commit_id)
                .with(Placeholder::File, path),
            Self::Operation { operation_id } => {
                Replacements::new().with(Placeholder::OperationId, operation_id)
            }
            Self::None => Replacements::new(),
        }
    }
}

impl fmt::Display for SelectedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revision { change_id, .. } => write!(f, "revision {change_id}"),
            Self::File { path, .. } => write!(f, "file {path}"),
            Self::Operation { operation_id } => write!(f, "operation {operation_id}"),
            Self::None => f.write_str("nothing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_replacements() {
        let item = SelectedItem::revision("abc123", "def456");
        let replacements = item.replacements();

        assert_eq!(replacements.get(Placeholder::ChangeId), Some("abc123"));
        assert_eq!(replacements.get(Placeholder::CommitId), Some("def456"));
        assert_eq!(replacements.get(Placeholder::File), None);
    }

    #[test]
    fn test_file_replacements_include_revision() {
        let item = SelectedItem::File {
            change_id: "abc".into(),
            commit_id: "def".into(),
            path: "src/lib.rs".into(),
        };
        let replacements = item.replacements();

        assert_eq!(replacements.get(Placeholder::File), Some("src/lib.rs"));
        assert_eq!(replacements.get(Placeholder::ChangeId), Some("abc"));
    }

    #[test]
    fn test_revision_id_only_for_revisions() {
        assert_eq!(SelectedItem::revision("abc", "def").revision_id(), Some("abc"));
        assert_eq!(SelectedItem::operation("op1").revision_id(), None);
        assert_eq!(SelectedItem::None.revision_id(), None);
    }

    #[test]
    fn test_none_has_no_replacements() {
        assert!(SelectedItem::None.replacements().is_empty());
        assert_eq!(
            SelectedItem::operation("op1").replacements().get(Placeholder::OperationId),
            Some("op1")
        );
    }
}
