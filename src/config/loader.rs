use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "lazyrev";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
    #[error("custom command `{name}` is invalid: {reason}")]
    InvalidCommand { name: String, reason: String },
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the configuration from `path`, or from the default location.
///
/// A missing default file yields the defaults; an explicitly given file must
/// exist.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) if path.exists() => path,
            _ => {
                tracing::debug!("No config file found, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = parse(&path, &content)?;

    tracing::debug!(
        "Loaded config from {} with {} custom commands",
        path.display(),
        config.custom_commands.len()
    );
    Ok(config)
}

/// Parse and validate configuration text.
fn parse(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;

    for (name, command) in &mut config.custom_commands {
        if command.name.is_empty() {
            command.name.clone_from(name);
        }
        command
            .validate()
            .map_err(|reason| ConfigError::InvalidCommand {
                name: name.clone(),
                reason,
            })?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::dispatch::{CommandForm, ShowMode};

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_custom_commands() {
        let file = write_config(
            r#"
program = "jj"

[custom_commands.describe]
key = "D"
args = ["describe", "-r", "$change_id"]
show = "interactive"

[custom_commands."show file"]
key = "ctrl+f"
shell = "less $file"
show = "interactive_notify"
"#,
        );

        let config = load(Some(file.path())).unwrap();
        let commands = config.commands();

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].name, "describe");
        assert_eq!(commands[0].show, ShowMode::Interactive);
        assert_eq!(commands[1].name, "show file");
        assert_eq!(commands[1].form(), CommandForm::Shell("less $file"));
        assert_eq!(commands[1].show, ShowMode::InteractiveNotify);
    }

    #[test]
    fn test_defaults_when_empty() {
        let file = write_config("");

        let config = load(Some(file.path())).unwrap();

        assert_eq!(config.program, "jj");
        assert!(config.custom_commands.is_empty());
    }

    #[test]
    fn test_command_without_form_is_rejected() {
        let file = write_config("[custom_commands.broken]\nshow = \"diff\"\n");

        let err = load(Some(file.path())).unwrap_err();

        assert!(
            matches!(&err, ConfigError::InvalidCommand { name, .. } if name == "broken"),
            "{err}"
        );
    }

    #[test]
    fn test_command_with_both_forms_is_rejected() {
        let file = write_config("[custom_commands.both]\nargs = [\"st\"]\nshell = \"jj st\"\n");

        assert!(matches!(
            load(Some(file.path())),
            Err(ConfigError::InvalidCommand { .. })
        ));
    }

    #[test]
    fn test_unknown_show_mode_is_a_parse_error() {
        let file = write_config("[custom_commands.x]\nargs = [\"st\"]\nshow = \"loud\"\n");

        assert!(matches!(load(Some(file.path())), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
