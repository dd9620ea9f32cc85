use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the installation prefix.
pub const PREFIX_ENV: &str = "FORMULATE_PREFIX";

/// User configuration, read from `config.toml` in the global config directory.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    /// Installation prefix. Falls back to the global data directory.
    pub prefix: Option<PathBuf>,
    /// Default log filter, e.g. `"info"` or `"formulate=debug"`.
    pub log_level: Option<String>,
}

impl Config {
    /// Loads `config.toml` from the global config directory, or defaults if absent.
    pub fn load() -> Result<Config> {
        let path = project_dirs()?.config_dir().join("config.toml");
        Self::load_from(path)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))
    }

    /// Picks the installation prefix: explicit flag, then `FORMULATE_PREFIX`,
    /// then the config file, then the global data directory.
    ///
    /// The result is always absolute; relative prefixes are taken from the
    /// current directory.
    pub fn resolve_prefix(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        let prefix = match flag {
            Some(prefix) => prefix,
            None => match std::env::var_os(PREFIX_ENV).filter(|v| !v.is_empty()) {
                Some(prefix) => PathBuf::from(prefix),
                None => match &self.prefix {
                    Some(prefix) => prefix.clone(),
                    None => project_dirs()?.data_dir().to_path_buf(),
                },
            },
        };
        std::path::absolute(&prefix)
            .with_context(|| format!("Could not resolve prefix {:?}", prefix))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "formulate", "formulate")
        .ok_or_else(|| anyhow!("Could not get project directories"))
}
