use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use smitebot_api::Credentials;
use tracing::warn;

pub const SETTINGS_DIR: &str = "Settings";
pub const SETTINGS_FILE: &str = "settings.json";

/// `<script_dir>/Settings/settings.json`
pub fn settings_path(script_dir: &Path) -> PathBuf {
    script_dir.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Script settings as saved by the chat-bot host's settings UI.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(rename = "DevId")]
    pub dev_id: String,
    #[serde(rename = "AuthKey")]
    pub auth_key: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("dev_id", &self.dev_id)
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Loads settings from `path`. A missing or unreadable file yields empty
    /// credentials instead of an error.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "settings not readable, using empty credentials");
                return Self::default();
            }
        };

        match Self::from_json(&text) {
            Ok(settings) => settings,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "settings not parseable, using empty credentials");
                Self::default()
            }
        }
    }

    /// Parses a settings document. Both `DevId` and `AuthKey` are required.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(strip_bom(text))
            .map_err(|error| anyhow!("failed to parse settings: {error}"))
    }

    /// Replaces both fields with the ones in `text`.
    pub fn reload_from_json(&mut self, text: &str) -> Result<()> {
        *self = Self::from_json(text)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                anyhow!("failed to create settings dir {}: {error}", parent.display())
            })?;
        }

        let text = serde_json::to_string_pretty(self)
            .map_err(|error| anyhow!("failed to serialize settings: {error}"))?;
        std::fs::write(path, text)
            .map_err(|error| anyhow!("failed to write settings {}: {error}", path.display()))
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.dev_id.clone(), self.auth_key.clone())
    }
}

pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_bom_prefixed_file() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join("settings.json");
        if let Err(error) = std::fs::write(&path, "\u{feff}{\"DevId\": \"1004\", \"AuthKey\": \"ABC\"}") {
            panic!("write failed: {error}");
        }

        let settings = Settings::load(&path);

        assert_eq!(settings.dev_id, "1004");
        assert_eq!(settings.auth_key, "ABC");
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };

        let settings = Settings::load(&dir.path().join("nope.json"));

        assert_eq!(settings, Settings::default());
        assert!(settings.credentials().is_empty());
    }

    #[test]
    fn load_garbage_is_empty() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join("settings.json");
        if let Err(error) = std::fs::write(&path, "{\"DevId\": 12") {
            panic!("write failed: {error}");
        }

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn reload_requires_both_fields() {
        let mut settings = Settings::default();
        assert!(settings.reload_from_json("{\"DevId\": \"1\"}").is_err());
        assert!(
            settings
                .reload_from_json("{\"DevId\": \"1\", \"AuthKey\": \"K\"}")
                .is_ok()
        );
        assert_eq!(settings.credentials(), Credentials::new("1", "K"));
    }

    #[test]
    fn save_then_load() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join("Settings").join("settings.json");
        let settings = Settings {
            dev_id: "1004".to_string(),
            auth_key: "ABC".to_string(),
        };

        if let Err(error) = settings.save(&path) {
            panic!("save failed: {error}");
        }

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn debug_hides_auth_key() {
        let settings = Settings {
            dev_id: "1004".to_string(),
            auth_key: "TOPSECRET".to_string(),
        };
        assert!(!format!("{settings:?}").contains("TOPSECRET"));
    }
}
