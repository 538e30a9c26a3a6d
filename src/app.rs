use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::commands::{Command, CopyDiffCmd, LoadItemsCmd, post};
use crate::config::AppConfig;
use crate::config::keybindings::{GlobalAction, KeybindingsConfig};
use crate::dispatch::{CustomCommand, DispatchContext, applicable_to};
use crate::items::ItemSource;
use crate::message::AppMessage;
use crate::task::{ExecRequest, Task};
use crate::theme::{Theme, theme_from_name};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, DiffEvent, DiffView, Handled, ItemList, ItemListEvent, Palette, PaletteEvent,
    StatusBar,
};

enum Overlay {
    Palette(Palette),
    Diff(DiffView),
}

pub struct App {
    config: Arc<AppConfig>,
    keys: Arc<KeybindingsConfig>,
    theme: Theme,
    dispatch: DispatchContext,
    commands: Vec<CustomCommand>,
    items: ItemList,
    overlay: Option<Overlay>,
    status: StatusBar,
    should_quit: bool,
    should_suspend: bool,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(config: Arc<AppConfig>, dispatch: DispatchContext) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let keys = Arc::new(config.keybindings.clone());
        Self {
            theme: theme_from_name(&config.theme.name),
            commands: config.commands(),
            items: ItemList::new(Arc::clone(&keys)),
            keys,
            config,
            dispatch,
            overlay: None,
            status: StatusBar::new(),
            should_quit: false,
            should_suspend: false,
            message_tx,
            message_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(self.config.frame_rate, self.config.tick_rate)?;
        tui.enter()?;
        self.load_items();

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui).await?;
            if self.should_suspend {
                tui.suspend()?;
                self.post(AppMessage::Resume)?;
                self.post(AppMessage::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn post(&self, message: AppMessage) -> Result<()> {
        post(&self.message_tx, message)
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Init => {}
            Event::Quit => self.post(AppMessage::Quit)?,
            Event::Tick => self.post(AppMessage::Tick)?,
            Event::Render => self.post(AppMessage::Render)?,
            Event::Resize(width, height) => self.post(AppMessage::Resize(width, height))?,
            Event::Error(e) => self.post(AppMessage::DisplayError(e))?,
            Event::Key(key) => self.handle_key(key)?,
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.overlay.is_some() {
            return self.handle_overlay_key(key);
        }

        match self.keys.global(&key) {
            Some(GlobalAction::Quit) => return self.post(AppMessage::Quit),
            Some(GlobalAction::Suspend) => return self.post(AppMessage::Suspend),
            Some(GlobalAction::Refresh) => return self.post(AppMessage::Refresh),
            Some(GlobalAction::Palette) => {
                self.open_palette();
                return Ok(());
            }
            Some(GlobalAction::SwitchView) => {
                let next = match self.items.source() {
                    ItemSource::Operations => ItemSource::Revisions,
                    _ => ItemSource::Operations,
                };
                self.show(next);
                return Ok(());
            }
            Some(GlobalAction::Back) => {
                if matches!(self.items.source(), ItemSource::Files { .. }) {
                    self.show(ItemSource::Revisions);
                }
                return Ok(());
            }
            Some(GlobalAction::Open) | None => {}
        }

        if self.run_bound_command(&key) {
            return Ok(());
        }

        if let Handled::Event(ItemListEvent::OpenRevision {
            change_id,
            commit_id,
        }) = self.items.handle_key(key)?
        {
            self.show(ItemSource::Files {
                change_id,
                commit_id,
            });
        }
        Ok(())
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> Result<()> {
        match &mut self.overlay {
            Some(Overlay::Palette(palette)) => match palette.handle_key(key)? {
                Handled::Event(PaletteEvent::Run(command)) => {
                    self.overlay = None;
                    self.dispatch_command(&command);
                }
                Handled::Event(PaletteEvent::Cancel) => self.overlay = None,
                Handled::Consumed | Handled::Ignored => {}
            },
            Some(Overlay::Diff(view)) => match view.handle_key(key)? {
                Handled::Event(DiffEvent::Copy { raw, revision }) => {
                    let runner = Arc::clone(&self.dispatch.runner);
                    self.schedule(Task::spawn(CopyDiffCmd::new(runner, raw, revision)));
                }
                Handled::Event(DiffEvent::Close) => self.overlay = None,
                Handled::Consumed | Handled::Ignored => {}
            },
            None => {}
        }
        Ok(())
    }

    /// Run the first custom command bound to `key` that applies to the
    /// selection. Inapplicable commands are not selectable.
    fn run_bound_command(&mut self, key: &KeyEvent) -> bool {
        let selected = self.items.selected();
        let Some(command) = self
            .commands
            .iter()
            .find(|c| c.key.as_ref().is_some_and(|k| k.matches(key)) && c.is_applicable_to(&selected))
            .cloned()
        else {
            return false;
        };
        self.dispatch_command(&command);
        true
    }

    fn dispatch_command(&mut self, command: &CustomCommand) {
        let selected = self.items.selected();
        if !command.is_applicable_to(&selected) {
            debug!("{} does not apply to {selected}", command.label());
            return;
        }
        let task = command.prepare(&self.dispatch, &selected);
        self.schedule(task);
    }

    fn open_palette(&mut self) {
        let selected = self.items.selected();
        let applicable = applicable_to(&self.commands, &selected)
            .into_iter()
            .cloned()
            .collect();
        let palette = Palette::new(applicable, self.dispatch.runner.program(), &selected);
        self.overlay = Some(Overlay::Palette(palette));
    }

    fn show(&mut self, source: ItemSource) {
        self.items.set_source(source);
        self.load_items();
    }

    fn load_items(&mut self) {
        self.items.set_loading();
        let source = self.items.source().clone();
        self.schedule(Task::spawn(LoadItemsCmd::new(
            Arc::clone(&self.dispatch.runner),
            source,
        )));
    }

    /// Messages are posted, commands spawned and hand-offs queued so they run
    /// in order on this loop.
    fn schedule(&self, task: Task) {
        match task {
            Task::Message(message) => self.post_or_log(message),
            Task::Spawn(command) => self.spawn_command(command),
            Task::Exec(request) => self.post_or_log(AppMessage::Exec(request)),
            Task::Batch(tasks) => {
                for task in tasks {
                    self.schedule(task);
                }
            }
        }
    }

    fn post_or_log(&self, message: AppMessage) {
        if let Err(e) = self.post(message) {
            error!("Dropping message: {e}");
        }
    }

    fn spawn_command(&self, command: Box<dyn Command>) {
        let name = command.name();
        debug!("Spawning command: {name}");
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = command.execute(tx.clone()).await {
                error!("Command {name} failed: {e}");
                let _ = tx.send(AppMessage::DisplayError(format!("{name} failed: {e}")));
            }
        });
    }

    async fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(message) = self.message_rx.try_recv() {
            if !message.is_periodic() {
                debug!("Handling message: {message:?}");
            }

            match message {
                AppMessage::Tick => self.status.on_tick(),
                AppMessage::Render => self.render(tui)?,
                AppMessage::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.render(tui)?;
                }
                AppMessage::Suspend => self.should_suspend = true,
                AppMessage::Resume => self.should_suspend = false,
                AppMessage::Quit => self.should_quit = true,
                AppMessage::ClearScreen => tui.clear()?,
                AppMessage::DisplayError(e) => self.status.display_error(e),
                AppMessage::CommandRunning(display) => self.status.command_running(display),
                AppMessage::CommandCompleted(event) => self.status.command_completed(event),
                AppMessage::ShowDiff { text, revision } => {
                    let view = DiffView::new(text, revision, Arc::clone(&self.keys));
                    self.overlay = Some(Overlay::Diff(view));
                }
                AppMessage::Refresh => self.load_items(),
                AppMessage::Exec(request) => self.hand_off(tui, request).await?,
                AppMessage::ItemsLoaded { kind, entries } => self.items.set_entries(kind, entries),
            }
        }
        Ok(())
    }

    /// Give the terminal to a child process and take it back once it exits.
    async fn hand_off(&self, tui: &mut Tui, request: ExecRequest) -> Result<()> {
        debug!("Handing terminal to {}", request.describe());
        tui.exit()?;
        let messages = tokio::task::spawn_blocking(move || request.run()).await;
        tui.enter()?;
        tui.clear()?;

        match messages {
            Ok(messages) => {
                for message in messages {
                    self.post(message)?;
                }
            }
            Err(e) => self.post(AppMessage::DisplayError(format!("terminal hand-off failed: {e}")))?,
        }
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            let [main, status] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

            self.items.render(frame, main, &self.theme);
            match &mut self.overlay {
                Some(Overlay::Palette(palette)) => palette.render(frame, main, &self.theme),
                Some(Overlay::Diff(view)) => view.render(frame, main, &self.theme),
                None => {}
            }
            self.status.render(frame, status, &self.theme);
        })?;
        Ok(())
    }
}
