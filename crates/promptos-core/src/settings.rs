// ABOUTME: Client-held settings for the direct (desktop) mode: API key and display preferences.
// ABOUTME: Stored as JSON under PROMPTOS_HOME; missing or corrupt files fall back to defaults.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompt::ModelKey;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Locally stored preferences. The API key never leaves this machine except
/// in requests to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub default_model: ModelKey,
    pub show_format_info: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: ModelKey::Claude,
            show_format_info: true,
        }
    }
}

impl Settings {
    /// Resolve the PromptOS home directory: `PROMPTOS_HOME`, else `~/.promptos`.
    pub fn home_dir() -> PathBuf {
        std::env::var("PROMPTOS_HOME")
            .ok()
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".promptos")
            })
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join(SETTINGS_FILE)
    }

    /// Load settings from `path`. A missing file yields defaults; an
    /// unparseable file is logged and also yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("ignoring unreadable settings at {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    /// On unix the file is mode 0600, since it holds the API key.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        write_owner_only(path, json.as_bytes()).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The stored key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = chars.len().min(4);
            let tail: String = chars[chars.len() - visible..].iter().collect();
            format!("{}{}", "*".repeat(chars.len() - visible), tail)
        })
    }
}

/// Write `contents` to `path` with permissions restricted to the owner,
/// tightening them if the file already existed.
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)
}
