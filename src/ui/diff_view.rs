use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::config::keybindings::{DiffAction, KeybindingsConfig, NavAction};
use crate::theme::Theme;
use crate::ui::{Component, Handled, Result};

const EMPTY: &str = "(empty)";

pub enum DiffEvent {
    /// Copy the captured output, or a git diff of `revision` when known.
    Copy {
        raw: String,
        revision: Option<String>,
    },
    Close,
}

/// Scrollable overlay showing captured command output.
pub struct DiffView {
    /// Output exactly as captured.
    raw: String,
    revision: Option<String>,
    /// Output as displayed.
    text: String,
    lines: u16,
    scroll: u16,
    height: u16,
    keys: Arc<KeybindingsConfig>,
}

impl DiffView {
    pub fn new(raw: String, revision: Option<String>, keys: Arc<KeybindingsConfig>) -> Self {
        let text = raw.replace('\r', "");
        let text = if text.trim().is_empty() {
            EMPTY.to_string()
        } else {
            text
        };
        let lines = u16::try_from(text.lines().count()).unwrap_or(u16::MAX);
        Self {
            raw,
            revision,
            text,
            lines,
            scroll: 0,
            height: 1,
            keys,
        }
    }

    fn scroll(&mut self, action: NavAction) {
        let max = self.lines.saturating_sub(1);
        let page = self.height.max(1);
        self.scroll = match action {
            NavAction::Up => self.scroll.saturating_sub(1),
            NavAction::Down => self.scroll.saturating_add(1).min(max),
            NavAction::PageUp => self.scroll.saturating_sub(page),
            NavAction::PageDown => self.scroll.saturating_add(page).min(max),
            NavAction::Top => 0,
            NavAction::Bottom => max,
        };
    }
}

impl Component for DiffView {
    type Output = DiffEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<Handled<Self::Output>> {
        match self.keys.diff(&key) {
            Some(DiffAction::Copy) => {
                let event = DiffEvent::Copy {
                    raw: self.raw.clone(),
                    revision: self.revision.clone(),
                };
                return Ok(event.into());
            }
            Some(DiffAction::Close) => return Ok(DiffEvent::Close.into()),
            None => {}
        }
        if let Some(action) = self.keys.navigation(&key) {
            self.scroll(action);
            return Ok(Handled::Consumed);
        }
        Ok(Handled::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.highlight))
            .title(format!(" Output  {} copy  {} close ", self.keys.diff.copy, self.keys.diff.close));
        self.height = block.inner(area).height;

        let paragraph = Paragraph::new(self.text.as_str())
            .style(Style::default().fg(theme.text))
            .block(block)
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}
