//! Views of the terminal front-end.
//!
//! - [`Component`] - interactive building block
//! - [`Handled`] - result of handling an input event

mod component;
mod diff_view;
mod item_list;
mod palette;
mod status_bar;

pub use component::Component;
pub use diff_view::{DiffEvent, DiffView};
pub use item_list::{ItemList, ItemListEvent};
pub use palette::{Palette, PaletteEvent};
pub use status_bar::StatusBar;

pub type Result<T> = std::result::Result<T, color_eyre::Report>;

/// Result of handling an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled<E> {
    /// Not handled, the parent should process it.
    Ignored,
    /// Handled without producing an event.
    Consumed,
    /// Handled and produced an event.
    Event(E),
}

impl<E> Handled<E> {
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for Handled<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Area of `percent_x` by `percent_y` centered in `area`.
pub fn centered(area: ratatui::layout::Rect, percent_x: u16, percent_y: u16) -> ratatui::layout::Rect {
    use ratatui::layout::Constraint;

    area.centered(Constraint::Percentage(percent_x), Constraint::Percentage(percent_y))
}
