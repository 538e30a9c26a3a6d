//! Application-level messages.
//!
//! Messages flow into the single UI loop through an unbounded channel and are
//! handled strictly in posting order. Background commands post them when they
//! finish; the loop itself never waits on process I/O.
//!
//! # Terminology
//! - **Event**: input from the terminal, see [`crate::tui::Event`]
//! - **Message**: internal communication, this module
//! - **Command**: async side effect, see [`crate::commands::Command`]

use crate::error::CommandError;
use crate::items::{ItemKind, ListEntry};
use crate::task::ExecRequest;

/// Result of one custom command invocation, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    /// Display form of the run announced by `CommandRunning`, if there was one.
    pub command: Option<String>,
    /// Combined, human-readable output.
    pub output: String,
    pub error: Option<CommandError>,
}

#[derive(Debug)]
pub enum AppMessage {
    // === Lifecycle ===
    /// Periodic tick for animations
    Tick,
    /// Render the UI
    Render,
    /// Terminal resized
    Resize(u16, u16),
    /// Suspend the application (Ctrl+Z)
    Suspend,
    /// Resume from suspension
    Resume,
    /// Quit the application
    Quit,
    /// Clear and redraw the screen
    ClearScreen,

    // === Feedback ===
    /// Display an error that is not tied to a command
    DisplayError(String),
    /// A command started; carries its display form
    CommandRunning(String),
    /// A command finished
    CommandCompleted(CompletionEvent),
    /// Open the diff view with raw output, remembering the revision it was
    /// captured for
    ShowDiff {
        text: String,
        revision: Option<String>,
    },
    /// Reload the item list
    Refresh,

    // === Terminal hand-off ===
    /// Suspend rendering and give the terminal to a child process
    Exec(ExecRequest),

    // === Data ===
    /// Entries for one of the item views finished loading
    ItemsLoaded {
        kind: ItemKind,
        entries: Vec<ListEntry>,
    },
}

impl AppMessage {
    /// Messages produced many times per second and not worth logging.
    pub const fn is_periodic(&self) -> bool {
        matches!(self, Self::Tick | Self::Render)
    }
}
