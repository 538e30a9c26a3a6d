use std::collections::VecDeque;

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::error::CommandError;
use crate::message::CompletionEvent;
use crate::theme::Theme;
use crate::ui::Component;

const HISTORY_LIMIT: usize = 50;

/// A completion kept for the session.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub at: DateTime<Local>,
    pub event: CompletionEvent,
}

/// Running commands, the last result and a short in-memory history.
pub struct StatusBar {
    running: VecDeque<String>,
    last: Option<HistoryEntry>,
    history: VecDeque<HistoryEntry>,
    throbber: ThrobberState,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            running: VecDeque::new(),
            last: None,
            history: VecDeque::new(),
            throbber: ThrobberState::default(),
        }
    }

    pub fn command_running(&mut self, display: String) {
        self.running.push_back(display);
    }

    /// Retires the running entry the event was announced as. Unannounced
    /// events leave the running list alone.
    pub fn command_completed(&mut self, event: CompletionEvent) {
        let finished = event
            .command
            .as_ref()
            .and_then(|command| self.running.iter().position(|running| running == command));
        if let Some(index) = finished {
            self.running.remove(index);
        }
        let entry = HistoryEntry {
            at: Local::now(),
            event,
        };
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(entry.clone());
        self.last = Some(entry);
    }

    pub fn display_error(&mut self, message: String) {
        self.last = Some(HistoryEntry {
            at: Local::now(),
            event: CompletionEvent::failed(CommandError::collaborator(message)),
        });
    }

    pub fn history(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn is_busy(&self) -> bool {
        !self.running.is_empty()
    }

    fn last_line(&self, theme: &Theme) -> Line<'static> {
        let Some(HistoryEntry { at, event }) = &self.last else {
            return Line::default();
        };
        let time = Span::styled(
            format!("{} ", at.format("%H:%M:%S")),
            Style::default().fg(theme.overlay),
        );
        let first_line = event.output.lines().next().unwrap_or_default().to_string();
        match &event.error {
            None => Line::from(vec![
                time,
                Span::styled(first_line, Style::default().fg(theme.success)),
            ]),
            Some(error) => {
                let mut spans = vec![
                    time,
                    Span::styled(
                        error.to_string(),
                        Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                    ),
                ];
                if !first_line.is_empty() {
                    spans.push(Span::styled(format!("  {first_line}"), Style::default().fg(theme.subtext)));
                }
                Line::from(spans)
            }
        }
    }
}

impl Component for StatusBar {
    type Output = ();

    fn on_tick(&mut self) {
        if self.is_busy() {
            self.throbber.calc_next();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let failures = self.history().rev().take_while(|e| !e.event.is_success()).count();
        let [area, counter] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(16)]).areas(area);
        let counter_text = match failures {
            0 => format!("{} done", self.history.len()),
            n => format!("{n} failing"),
        };
        let counter_color = if failures == 0 { theme.overlay } else { theme.error };
        frame.render_widget(
            Paragraph::new(counter_text)
                .style(Style::default().fg(counter_color))
                .right_aligned(),
            counter,
        );

        let Some(current) = self.running.back() else {
            frame.render_widget(Paragraph::new(self.last_line(theme)), area);
            return;
        };

        let [spinner_area, rest] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
        let label = if self.running.len() > 1 {
            format!("{current} (+{})", self.running.len() - 1)
        } else {
            current.clone()
        };
        let throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .throbber_style(Style::default().fg(theme.accent))
            .style(Style::default().fg(theme.warning))
            .label(label);
        frame.render_stateful_widget(throbber, spinner_area, &mut self.throbber);
        frame.render_widget(Paragraph::new(self.last_line(theme)), rest);
    }
}
