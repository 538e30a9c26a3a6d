use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::dispatch::{CustomCommand, SelectedItem};
use crate::search::Matcher;
use crate::theme::Theme;
use crate::ui::{Component, Handled, Result, centered};

pub enum PaletteEvent {
    Run(CustomCommand),
    Cancel,
}

struct Row {
    command: CustomCommand,
    /// Templated form, e.g. `jj describe -r abc123`.
    description: String,
}

/// Lists the custom commands that apply to the selection.
pub struct Palette {
    rows: Vec<Row>,
    query: String,
    visible: Vec<usize>,
    state: ListState,
    matcher: Matcher,
}

impl Palette {
    /// `commands` must already be filtered to the ones applicable to `item`.
    pub fn new(commands: Vec<CustomCommand>, program: &str, item: &SelectedItem) -> Self {
        let replacements = item.replacements();
        let rows: Vec<Row> = commands
            .into_iter()
            .map(|command| Row {
                description: command.description(program, &replacements),
                command,
            })
            .collect();

        let mut palette = Self {
            rows,
            query: String::new(),
            visible: Vec::new(),
            state: ListState::default(),
            matcher: Matcher::new(),
        };
        palette.refilter();
        palette
    }

    fn refilter(&mut self) {
        self.visible = self.matcher.rank(
            &self.rows,
            |row| format!("{} {}", row.command.label(), row.description),
            &self.query,
        );
        self.state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    fn move_selection(&mut self, down: bool) {
        let Some(current) = self.state.selected() else {
            return;
        };
        let last = self.visible.len().saturating_sub(1);
        let next = if down { (current + 1).min(last) } else { current.saturating_sub(1) };
        self.state.select(Some(next));
    }

    fn selected_command(&self) -> Option<&CustomCommand> {
        let index = *self.visible.get(self.state.selected()?)?;
        self.rows.get(index).map(|row| &row.command)
    }
}

impl Component for Palette {
    type Output = PaletteEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<Handled<Self::Output>> {
        let handled = match key.code {
            KeyCode::Esc => PaletteEvent::Cancel.into(),
            KeyCode::Enter => match self.selected_command() {
                Some(command) => PaletteEvent::Run(command.clone()).into(),
                None => Handled::Consumed,
            },
            KeyCode::Up => {
                self.move_selection(false);
                Handled::Consumed
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_selection(true);
                Handled::Consumed
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter();
                Handled::Consumed
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(c);
                self.refilter();
                Handled::Consumed
            }
            _ => Handled::Ignored,
        };
        Ok(handled)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let area = centered(area, 70, 60);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.accent))
            .title(" Commands ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [input_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

        let input = Line::from(vec![
            Span::styled(": ", Style::default().fg(theme.highlight)),
            Span::styled(self.query.as_str(), Style::default().fg(theme.text)),
        ]);
        frame.render_widget(Paragraph::new(input), input_area);

        if self.visible.is_empty() {
            let empty = Paragraph::new("No commands apply to this selection")
                .style(Style::default().fg(theme.overlay));
            frame.render_widget(empty, list_area);
            return;
        }

        let items: Vec<ListItem> = self
            .visible
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .map(|row| {
                ListItem::new(Line::from(vec![
                    Span::styled(row.command.label(), Style::default().fg(theme.text)),
                    Span::raw("  "),
                    Span::styled(row.description.clone(), Style::default().fg(theme.subtext)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, list_area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ShowMode;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn palette() -> Palette {
        Palette::new(
            vec![
                CustomCommand::from_args("new", &["new", "$change_id"], ShowMode::Silent),
                CustomCommand::from_args("describe", &["describe", "-r", "$change_id"], ShowMode::Interactive),
            ],
            "jj",
            &SelectedItem::revision("abc123", "def"),
        )
    }

    #[test]
    fn test_descriptions_are_templated() {
        let palette = palette();

        assert_eq!(palette.rows[1].description, "jj describe -r abc123");
    }

    #[test]
    fn test_typing_filters_and_enter_runs() {
        let mut palette = palette();
        for c in "desc".chars() {
            palette.handle_key(press(KeyCode::Char(c))).unwrap();
        }

        let handled = palette.handle_key(press(KeyCode::Enter)).unwrap();

        assert!(matches!(
            handled,
            Handled::Event(PaletteEvent::Run(ref command)) if command.name == "describe"
        ));
    }

    #[test]
    fn test_escape_cancels() {
        let mut palette = palette();

        assert!(matches!(
            palette.handle_key(press(KeyCode::Esc)).unwrap(),
            Handled::Event(PaletteEvent::Cancel)
        ));
    }
}
