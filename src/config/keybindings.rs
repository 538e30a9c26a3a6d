use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Suspend,
    Refresh,
    Palette,
    SwitchView,
    Open,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffAction {
    Copy,
    Close,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub suspend: KeyBinding,
    pub refresh: KeyBinding,
    pub palette: KeyBinding,
    pub switch_view: KeyBinding,
    pub open: KeyBinding,
    pub back: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
    pub top: KeyBinding,
    pub bottom: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffKeybindings {
    pub copy: KeyBinding,
    pub close: KeyBinding,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub diff: DiffKeybindings,
}

fn first_match<A: Copy>(event: &KeyEvent, table: &[(&KeyBinding, A)]) -> Option<A> {
    table
        .iter()
        .find(|(binding, _)| binding.matches(event))
        .map(|(_, action)| *action)
}

impl KeybindingsConfig {
    pub fn global(&self, event: &KeyEvent) -> Option<GlobalAction> {
        let kb = &self.global;
        first_match(
            event,
            &[
                (&kb.quit, GlobalAction::Quit),
                (&kb.suspend, GlobalAction::Suspend),
                (&kb.refresh, GlobalAction::Refresh),
                (&kb.palette, GlobalAction::Palette),
                (&kb.switch_view, GlobalAction::SwitchView),
                (&kb.open, GlobalAction::Open),
                (&kb.back, GlobalAction::Back),
            ],
        )
    }

    pub fn navigation(&self, event: &KeyEvent) -> Option<NavAction> {
        let kb = &self.navigation;
        first_match(
            event,
            &[
                (&kb.up, NavAction::Up),
                (&kb.down, NavAction::Down),
                (&kb.page_up, NavAction::PageUp),
                (&kb.page_down, NavAction::PageDown),
                (&kb.top, NavAction::Top),
                (&kb.bottom, NavAction::Bottom),
            ],
        )
    }

    pub fn diff(&self, event: &KeyEvent) -> Option<DiffAction> {
        let kb = &self.diff;
        first_match(event, &[(&kb.copy, DiffAction::Copy), (&kb.close, DiffAction::Close)])
    }
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
            refresh: Key::char('r').into(),
            palette: Key::char(':').into(),
            switch_view: Key::new(KeyCode::Tab).into(),
            open: Key::new(KeyCode::Enter).into(),
            back: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: vec![Key::char('k'), Key::new(KeyCode::Up)].into(),
            down: vec![Key::char('j'), Key::new(KeyCode::Down)].into(),
            page_up: vec![Key::new(KeyCode::PageUp), Key::with_ctrl(KeyCode::Char('u'))].into(),
            page_down: vec![Key::new(KeyCode::PageDown), Key::with_ctrl(KeyCode::Char('d'))].into(),
            top: vec![Key::char('g'), Key::new(KeyCode::Home)].into(),
            bottom: vec![Key::char('G'), Key::new(KeyCode::End)].into(),
        }
    }
}

impl Default for DiffKeybindings {
    fn default() -> Self {
        Self {
            copy: Key::char('y').into(),
            close: vec![Key::new(KeyCode::Esc), Key::char('q')].into(),
        }
    }
}
