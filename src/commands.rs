//! Async commands pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! Dispatch and the views return them wrapped in a [`crate::task::Task`], and
//! the App spawns them. Results flow back as [`AppMessage`]s.

mod clipboard;
mod diff;
mod load;
mod run;

use async_trait::async_trait;
pub use clipboard::CopyDiffCmd;
use color_eyre::Result;
use color_eyre::eyre::eyre;
pub use diff::DiffCmd;
pub use load::LoadItemsCmd;
pub use run::RunCmd;
use tokio::sync::mpsc::UnboundedSender;

use crate::message::AppMessage;

/// Async commands that perform side effects.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logs and status display.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()>;
}

/// Post a message back to the loop.
///
/// Fails only once the loop has shut down and dropped its receiver.
pub fn post(action_tx: &UnboundedSender<AppMessage>, message: AppMessage) -> Result<()> {
    action_tx
        .send(message)
        .map_err(|_| eyre!("application loop is no longer receiving messages"))
}
