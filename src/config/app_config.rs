use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::hasher_config::HasherConfigData;
use crate::lib_constants::{DEFAULT_DATA_DIR, DEFAULT_MAX_NOTE_SIZE};

/// Application configuration, merged from defaults, the TOML config file
/// and `NOTEMARK_`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AppConfig {
    /// Holds the database file and the per-notebook note folders.
    #[serde(default = "app_config_default_data_directory")]
    pub data_directory: PathBuf,

    #[serde(default = "app_config_default_max_note_size")]
    pub max_note_size: u64,

    #[serde(default)]
    pub hasher: HasherConfigData,
}

fn app_config_default_data_directory() -> PathBuf {
    DEFAULT_DATA_DIR.into()
}

fn app_config_default_max_note_size() -> u64 {
    DEFAULT_MAX_NOTE_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_directory: app_config_default_data_directory(),
            max_note_size: app_config_default_max_note_size(),
            hasher: HasherConfigData::default(),
        }
    }
}
