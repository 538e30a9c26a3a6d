use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use crate::config::keybindings::{GlobalAction, KeybindingsConfig, NavAction};
use crate::dispatch::SelectedItem;
use crate::items::{ItemKind, ItemSource, ListEntry};
use crate::theme::Theme;
use crate::ui::{Component, Handled, Result};

const PAGE: usize = 10;

pub enum ItemListEvent {
    /// Enter on a revision: list its files.
    OpenRevision { change_id: String, commit_id: String },
}

pub struct ItemList {
    source: ItemSource,
    entries: Vec<ListEntry>,
    state: ListState,
    loading: bool,
    keys: Arc<KeybindingsConfig>,
}

impl ItemList {
    pub fn new(keys: Arc<KeybindingsConfig>) -> Self {
        Self {
            source: ItemSource::Revisions,
            entries: Vec::new(),
            state: ListState::default(),
            loading: true,
            keys,
        }
    }

    pub const fn source(&self) -> &ItemSource {
        &self.source
    }

    /// Switch to another listing; entries arrive later through [`Self::set_entries`].
    pub fn set_source(&mut self, source: ItemSource) {
        self.source = source;
        self.entries.clear();
        self.state.select(None);
        self.loading = true;
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    /// Replace the entries, keeping the cursor where possible.
    ///
    /// Results for a view that is no longer shown are dropped.
    pub fn set_entries(&mut self, kind: ItemKind, entries: Vec<ListEntry>) {
        if kind != self.source.kind() {
            return;
        }
        self.loading = false;
        self.entries = entries;
        let selected = match self.state.selected() {
            _ if self.entries.is_empty() => None,
            Some(i) => Some(i.min(self.entries.len() - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    /// The highlighted item, or [`SelectedItem::None`] for an empty list.
    pub fn selected(&self) -> SelectedItem {
        self.state
            .selected()
            .and_then(|i| self.entries.get(i))
            .map(|entry| entry.item.clone())
            .unwrap_or_default()
    }

    fn title(&self) -> String {
        match &self.source {
            ItemSource::Files { change_id, .. } => format!(" Files of {change_id} "),
            source => format!(" {} ", source.kind()),
        }
    }

    fn navigate(&mut self, action: NavAction) {
        let last = self.entries.len().saturating_sub(1);
        let current = self.state.selected().unwrap_or(0);
        let next = match action {
            NavAction::Up => current.saturating_sub(1),
            NavAction::Down => (current + 1).min(last),
            NavAction::PageUp => current.saturating_sub(PAGE),
            NavAction::PageDown => (current + PAGE).min(last),
            NavAction::Top => 0,
            NavAction::Bottom => last,
        };
        if !self.entries.is_empty() {
            self.state.select(Some(next));
        }
    }
}

impl Component for ItemList {
    type Output = ItemListEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<Handled<Self::Output>> {
        if let Some(action) = self.keys.navigation(&key) {
            self.navigate(action);
            return Ok(Handled::Consumed);
        }

        if self.keys.global(&key) == Some(GlobalAction::Open)
            && let SelectedItem::Revision {
                change_id,
                commit_id,
            } = self.selected()
        {
            return Ok(ItemListEvent::OpenRevision {
                change_id,
                commit_id,
            }
            .into());
        }

        Ok(Handled::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface))
            .title(self.title())
            .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

        if self.entries.is_empty() {
            let placeholder = if self.loading { "Loading…" } else { "Nothing here" };
            let paragraph = Paragraph::new(placeholder)
                .style(Style::default().fg(theme.overlay))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let rows: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| ListItem::new(entry.label.clone()).style(Style::default().fg(theme.text)))
            .collect();
        let list = List::new(rows)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            );

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn entries(ids: &[&str]) -> Vec<ListEntry> {
        ids.iter()
            .map(|id| ListEntry {
                item: SelectedItem::revision(*id, format!("{id}-commit")),
                label: (*id).to_string(),
            })
            .collect()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_selection_follows_navigation() {
        let mut list = ItemList::new(Arc::default());
        assert_eq!(list.selected(), SelectedItem::None);

        list.set_entries(ItemKind::Revisions, entries(&["a", "b", "c"]));
        list.handle_key(press(KeyCode::Char('j'))).unwrap();
        list.handle_key(press(KeyCode::Char('j'))).unwrap();
        list.handle_key(press(KeyCode::Char('j'))).unwrap();

        assert_eq!(list.selected(), SelectedItem::revision("c", "c-commit"));
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let mut list = ItemList::new(Arc::default());
        list.set_source(ItemSource::Operations);

        list.set_entries(ItemKind::Revisions, entries(&["a"]));

        assert_eq!(list.selected(), SelectedItem::None);
    }

    #[test]
    fn test_enter_opens_revision() {
        let mut list = ItemList::new(Arc::default());
        list.set_entries(ItemKind::Revisions, entries(&["a"]));

        let handled = list.handle_key(press(KeyCode::Enter)).unwrap();

        assert!(matches!(
            handled,
            Handled::Event(ItemListEvent::OpenRevision { ref change_id, .. }) if change_id == "a"
        ));
    }
}
