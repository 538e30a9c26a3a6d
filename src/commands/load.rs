use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::commands::{Command, post};
use crate::items::ItemSource;
use crate::message::{AppMessage, CompletionEvent};
use crate::runner::CommandRunner;

/// Streams a listing from the VCS program into the item list.
pub struct LoadItemsCmd {
    runner: Arc<dyn CommandRunner>,
    source: ItemSource,
}

impl LoadItemsCmd {
    pub fn new(runner: Arc<dyn CommandRunner>, source: ItemSource) -> Self {
        Self { runner, source }
    }
}

#[async_trait]
impl Command for LoadItemsCmd {
    fn name(&self) -> String {
        format!("Loading {}", self.source.kind())
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let lines = match self.runner.run_streaming(&self.source.args()).await {
            Ok(stream) => stream.lines().await,
            Err(e) => Err(e),
        };

        let message = match lines {
            Ok(lines) => AppMessage::ItemsLoaded {
                kind: self.source.kind(),
                entries: self.source.parse(&lines),
            },
            Err(e) => {
                tracing::warn!("Loading {} failed: {e}", self.source.kind());
                AppMessage::CommandCompleted(CompletionEvent::failed(e))
            }
        };
        post(&action_tx, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::SelectedItem;
    use crate::items::ItemKind;
    use crate::runner::mock::MockCommandRunner;
    use crate::task::Task;

    #[tokio::test]
    async fn test_loads_revisions() {
        let mut mock = MockCommandRunner::new();
        mock.expect(&ItemSource::Revisions.args())
            .set_output("abc 111 first\ndef 222 second\n");
        let mock = Arc::new(mock);

        let messages = Task::spawn(LoadItemsCmd::new(mock.clone(), ItemSource::Revisions))
            .collect()
            .await;

        let [AppMessage::ItemsLoaded { kind, entries }] = messages.as_slice() else {
            panic!("unexpected messages: {messages:?}");
        };
        assert_eq!(*kind, ItemKind::Revisions);
        assert_eq!(entries[1].item, SelectedItem::revision("def", "222"));
        mock.verify();
    }
}
