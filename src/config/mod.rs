//! Configuration management module.
//!
//! This module handles loading, saving, and managing application
//! configuration, including the backend base URL, the session cookie, and
//! picker tuning knobs.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/planreg-tui";

/// Oversees management of configuration file.
///
#[derive(Clone)]
pub struct Config {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub submit_path: String,
    pub debounce_ms: u64,
    pub min_search_length: usize,
    pub theme_name: String,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub session_cookie: Option<String>,
    #[serde(default = "default_submit_path")]
    pub submit_path: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_search_length")]
    pub min_search_length: usize,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_submit_path() -> String {
    "/profile/entity".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_search_length() -> usize {
    2
}

fn default_theme_name() -> String {
    "tokyo-night".to_string()
}

impl Config {
    /// Return a new instance with defaults.
    ///
    pub fn new() -> Config {
        Config {
            base_url: default_base_url(),
            session_cookie: None,
            submit_path: default_submit_path(),
            debounce_ms: default_debounce_ms(),
            min_search_length: default_min_search_length(),
            theme_name: default_theme_name(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// path if provided. A missing file is not an error; the session cookie
    /// stays unset and the TUI onboarding collects it.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        // Try to create dir path if it doesn't exist
        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        // Specify config file path
        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.base_url = data.base_url;
            self.session_cookie = data.session_cookie;
            self.submit_path = data.submit_path;
            self.debounce_ms = data.debounce_ms;
            self.min_search_length = data.min_search_length;
            self.theme_name = data.theme_name;
        }

        Ok(())
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        let data = FileSpec {
            base_url: self.base_url.clone(),
            session_cookie: self.session_cookie.clone(),
            submit_path: self.submit_path.clone(),
            debounce_ms: self.debounce_ms,
            min_search_length: self.min_search_length,
            theme_name: self.theme_name.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Store a freshly entered session cookie and persist it.
    ///
    pub fn save_session_cookie(&mut self, cookie: String) -> Result<(), AppError> {
        self.session_cookie = Some(cookie);
        if self.file_path.is_none() {
            let dir_path = Config::default_path()?;
            if !dir_path.exists() {
                fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: dir_path.clone(),
                    source: e,
                })?;
            }
            self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        }
        self.save()
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
