pub mod key;
pub mod keybindings;
pub mod loader;

use std::collections::BTreeMap;

use keybindings::KeybindingsConfig;
pub use loader::load;
use serde::{Deserialize, Serialize};

use crate::dispatch::CustomCommand;

const DEFAULT_PROGRAM: &str = "jj";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// VCS program that receives argument-form commands.
    pub program: String,
    /// Ticks per second.
    pub tick_rate: f64,
    /// Frames per second.
    pub frame_rate: f64,
    pub theme: ThemeConfig,
    pub keybindings: KeybindingsConfig,
    /// Keyed by display name.
    pub custom_commands: BTreeMap<String, CustomCommand>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            tick_rate: 4.0,
            frame_rate: 30.0,
            theme: ThemeConfig::default(),
            keybindings: KeybindingsConfig::default(),
            custom_commands: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Custom commands in name order.
    pub fn commands(&self) -> Vec<CustomCommand> {
        self.custom_commands.values().cloned().collect()
    }
}
