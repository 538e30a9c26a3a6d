//! Custom command dispatch.
//!
//! Takes a configured [`CustomCommand`] and the [`SelectedItem`], checks
//! applicability, substitutes placeholders and picks the lifecycle that
//! matches the command's [`ShowMode`]. The result is a [`crate::task::Task`]
//! for the App to schedule.

mod completion;
mod definition;
mod placeholder;
mod selection;
mod shell;
mod strategy;

#[cfg(test)]
pub use definition::{CommandForm, ShowMode};
pub use definition::{CustomCommand, display_args};
pub use selection::SelectedItem;
pub use shell::{ProcessEnv, interactive_shell, shell_args};
pub use strategy::DispatchContext;

/// Commands that may run against `item`, in the order given.
pub fn applicable_to<'a>(
    commands: impl IntoIterator<Item = &'a CustomCommand>,
    item: &SelectedItem,
) -> Vec<&'a CustomCommand> {
    commands
        .into_iter()
        .filter(|command| command.is_applicable_to(item))
        .collect()
}
