//! Session configuration.
//!
//! Resolution order for every field: CLI override, then
//! `$SHELLCHAT_HOME/config.toml`, then a built-in default.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;
use crate::error::ShellChatErr;

pub const SHELLCHAT_HOME_ENV_VAR: &str = "SHELLCHAT_HOME";
const CONFIG_TOML_FILE: &str = "config.toml";

/// Fully resolved configuration for one session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial working directory. Guaranteed to exist and be a directory at
    /// load time.
    pub cwd: PathBuf,

    /// Program used to run arbitrary command lines with `-c` (`/C` under
    /// `cmd` on windows).
    pub shell: String,

    /// Interpreter used for `python` expression submissions.
    pub python: String,

    /// State directory (`$SHELLCHAT_HOME`, default `~/.shellchat`). Logs
    /// live under it; it is created on demand.
    pub shellchat_home: PathBuf,
}

/// Optional values sourced from the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cwd: Option<PathBuf>,
    pub shell: Option<String>,
    pub python: Option<String>,
}

/// Serde mirror of `config.toml`. Every field is optional so a partial or
/// missing file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigToml {
    cwd: Option<PathBuf>,
    shell: Option<String>,
    python: Option<String>,
}

impl Config {
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let shellchat_home = find_shellchat_home()?;
        let file = load_config_toml(&shellchat_home)?;
        Self::resolve(overrides, file, shellchat_home)
    }

    fn resolve(
        overrides: ConfigOverrides,
        file: ConfigToml,
        shellchat_home: PathBuf,
    ) -> Result<Self> {
        let cwd = overrides
            .cwd
            .or(file.cwd)
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                ShellChatErr::Config(
                    "no working directory given and the home directory could not be determined"
                        .to_string(),
                )
            })?;
        if !cwd.is_dir() {
            return Err(ShellChatErr::Config(format!(
                "working directory '{}' does not exist or is not a directory",
                cwd.display()
            )));
        }

        let shell = overrides
            .shell
            .or(file.shell)
            .unwrap_or_else(default_user_shell);
        let python = overrides
            .python
            .or(file.python)
            .unwrap_or_else(|| "python3".to_string());

        Ok(Self {
            cwd,
            shell,
            python,
            shellchat_home,
        })
    }
}

/// Returns the value of `$SHELLCHAT_HOME` if set, otherwise `~/.shellchat`.
/// The directory is not required to exist yet.
pub fn find_shellchat_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(SHELLCHAT_HOME_ENV_VAR)
        && !home.trim().is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    let mut home = dirs::home_dir().ok_or_else(|| {
        ShellChatErr::Config("could not determine the home directory".to_string())
    })?;
    home.push(".shellchat");
    Ok(home)
}

fn load_config_toml(shellchat_home: &Path) -> Result<ConfigToml> {
    let path = shellchat_home.join(CONFIG_TOML_FILE);
    match std::fs::read_to_string(&path) {
        Ok(contents) => toml::from_str(&contents).map_err(|e| {
            ShellChatErr::Config(format!("failed to parse {}: {e}", path.display()))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigToml::default()),
        Err(e) => Err(e.into()),
    }
}

/// The closest portable analogue of `shell=true`: the user's login shell on
/// unix, `cmd` on windows.
pub fn default_user_shell() -> String {
    #[cfg(windows)]
    {
        "cmd".to_string()
    }
    #[cfg(not(windows))]
    {
        match std::env::var("SHELL") {
            Ok(shell) if !shell.trim().is_empty() => shell,
            _ => "/bin/sh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overrides_win_over_file_values() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let overrides = ConfigOverrides {
            cwd: Some(dir.path().to_path_buf()),
            shell: Some("/bin/zsh".to_string()),
            python: None,
        };
        let file = ConfigToml {
            cwd: None,
            shell: Some("/bin/bash".to_string()),
            python: Some("python3.12".to_string()),
        };

        let config = Config::resolve(overrides, file, dir.path().join("home"))?;
        assert_eq!(config.cwd, dir.path());
        assert_eq!(config.shell, "/bin/zsh");
        assert_eq!(config.python, "python3.12");
        Ok(())
    }

    #[test]
    fn rejects_missing_working_directory() {
        let overrides = ConfigOverrides {
            cwd: Some(PathBuf::from("/definitely/not/a/real/path")),
            ..Default::default()
        };
        let err = Config::resolve(overrides, ConfigToml::default(), PathBuf::from("/tmp"));
        assert_matches::assert_matches!(err, Err(ShellChatErr::Config(_)));
    }
}
