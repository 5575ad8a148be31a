//! User configuration, read from `config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskError};
use crate::store::DEFAULT_FILE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Where the task list is stored.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

/// `<config dir>/tasktrack/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tasktrack").join("config.toml"))
}

/// Loads the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(err) => {
            return Err(TaskError::Config {
                path: path.to_path_buf(),
                message: err.to_string(),
            })
        }
    };
    toml::from_str(&content).map_err(|err| TaskError::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
