use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use smitebot_api::{ClientConfig, Credentials, DEFAULT_API_URL, DEFAULT_LANG, SessionPolicy};

use crate::dispatcher::DEFAULT_PLAYER;

pub const DEFAULT_CONFIG_PATH: &str = "~/.smitebot/config.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default)]
pub struct AppCliFlags {
    pub base_url: Option<String>,
    pub dev_id: Option<String>,
    pub auth_key: Option<String>,
    pub script_dir: Option<PathBuf>,
    pub default_player: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub bot: BotSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub lang: String,
    pub timeout_secs: u64,
    pub strict_sessions: bool,
    /// Overrides the script settings file when both are set.
    pub dev_id: Option<String>,
    pub auth_key: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            strict_sessions: false,
            dev_id: None,
            auth_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    pub default_player: String,
    pub script_dir: PathBuf,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            default_player: DEFAULT_PLAYER.to_string(),
            script_dir: default_script_dir(),
        }
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>, cli: &AppCliFlags) -> Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);

        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|error| anyhow!("failed to read config {}: {error}", path.display()))?;
            let persisted: PersistedAppConfig = toml::from_str(&text)
                .map_err(|error| anyhow!("failed to parse config {}: {error}", path.display()))?;
            persisted.into_runtime()
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        config.apply_cli_overrides(cli);
        config.normalize_paths();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, config_path: Option<&Path>) -> Result<()> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                anyhow!("failed to create config dir {}: {error}", parent.display())
            })?;
        }

        let persisted = PersistedAppConfig::from_runtime(self);
        let text = toml::to_string_pretty(&persisted)
            .map_err(|error| anyhow!("failed to serialize config: {error}"))?;

        std::fs::write(&path, text)
            .map_err(|error| anyhow!("failed to write config {}: {error}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("api.base_url must be an http(s) url, got {url:?}"));
        }

        if self.api.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be greater than zero"));
        }

        if self.api.lang.trim().is_empty() {
            return Err(anyhow!("api.lang cannot be empty"));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let policy = if self.api.strict_sessions {
            SessionPolicy::Strict
        } else {
            SessionPolicy::Permissive
        };

        ClientConfig::new()
            .with_base_url(self.api.base_url.clone())
            .with_lang(self.api.lang.clone())
            .with_session_policy(policy)
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    /// Credentials set through the config, env or flags, if both halves are present.
    pub fn credentials_override(&self) -> Option<Credentials> {
        match (&self.api.dev_id, &self.api.auth_key) {
            (Some(dev_id), Some(auth_key)) => Some(Credentials::new(dev_id.clone(), auth_key.clone())),
            _ => None,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("SMITE_API_URL")
            && !value.trim().is_empty()
        {
            self.api.base_url = value;
        }

        if self.api.dev_id.is_none()
            && let Ok(value) = std::env::var("SMITE_DEV_ID")
        {
            self.api.dev_id = Some(value);
        }

        if self.api.auth_key.is_none()
            && let Ok(value) = std::env::var("SMITE_AUTH_KEY")
        {
            self.api.auth_key = Some(value);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &AppCliFlags) {
        if let Some(url) = &cli.base_url {
            self.api.base_url = url.clone();
        }
        if let Some(dev_id) = &cli.dev_id {
            self.api.dev_id = Some(dev_id.clone());
        }
        if let Some(auth_key) = &cli.auth_key {
            self.api.auth_key = Some(auth_key.clone());
        }
        if let Some(dir) = &cli.script_dir {
            self.bot.script_dir = dir.clone();
        }
        if let Some(player) = &cli.default_player {
            self.bot.default_player = player.clone();
        }
    }

    fn normalize_paths(&mut self) {
        self.api.base_url = self.api.base_url.trim_end_matches('/').to_string();
        self.bot.script_dir = expand_tilde_path(&self.bot.script_dir);
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedAppConfig {
    #[serde(default)]
    api: PersistedApiSettings,
    #[serde(default)]
    bot: PersistedBotSettings,
}

impl PersistedAppConfig {
    fn into_runtime(self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            api: ApiSettings {
                base_url: self.api.base_url.unwrap_or(defaults.api.base_url),
                lang: self.api.lang.unwrap_or(defaults.api.lang),
                timeout_secs: self.api.timeout_secs.unwrap_or(defaults.api.timeout_secs),
                strict_sessions: self
                    .api
                    .strict_sessions
                    .unwrap_or(defaults.api.strict_sessions),
                dev_id: self.api.dev_id,
                auth_key: self.api.auth_key,
            },
            bot: BotSettings {
                default_player: self
                    .bot
                    .default_player
                    .unwrap_or(defaults.bot.default_player),
                script_dir: self
                    .bot
                    .script_dir
                    .as_deref()
                    .map(PathBuf::from)
                    .unwrap_or(defaults.bot.script_dir),
            },
        }
    }

    fn from_runtime(config: &AppConfig) -> Self {
        Self {
            api: PersistedApiSettings {
                base_url: Some(config.api.base_url.clone()),
                lang: Some(config.api.lang.clone()),
                timeout_secs: Some(config.api.timeout_secs),
                strict_sessions: Some(config.api.strict_sessions),
                dev_id: config.api.dev_id.clone(),
                auth_key: config.api.auth_key.clone(),
            },
            bot: PersistedBotSettings {
                default_player: Some(config.bot.default_player.clone()),
                script_dir: Some(config.bot.script_dir.to_string_lossy().to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedApiSettings {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    strict_sessions: Option<bool>,
    #[serde(default)]
    dev_id: Option<String>,
    #[serde(default)]
    auth_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedBotSettings {
    #[serde(default)]
    default_player: Option<String>,
    #[serde(default)]
    script_dir: Option<String>,
}

fn default_script_dir() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        return home.join(".smitebot").join("script");
    }
    PathBuf::from(".smitebot/script")
}

pub fn default_config_path() -> PathBuf {
    expand_tilde_path(&PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn expand_tilde_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }

    if path_str == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }

    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::{AppCliFlags, AppConfig, default_config_path};
    use smitebot_api::{Credentials, SessionPolicy};

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bot.default_player, "Enchom");
        assert!(config.credentials_override().is_none());
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let mut config = AppConfig::default();
        let cli = AppCliFlags {
            base_url: Some("http://localhost:9000/smiteapi.svc/".to_string()),
            dev_id: Some("1004".to_string()),
            auth_key: Some("KEY".to_string()),
            ..Default::default()
        };

        config.apply_cli_overrides(&cli);
        config.normalize_paths();

        assert_eq!(config.api.base_url, "http://localhost:9000/smiteapi.svc");
        assert_eq!(
            config.credentials_override(),
            Some(Credentials::new("1004", "KEY"))
        );
    }

    #[test]
    fn half_credentials_are_not_an_override() {
        let mut config = AppConfig::default();
        config.api.dev_id = Some("1004".to_string());
        assert!(config.credentials_override().is_none());
    }

    #[test]
    fn strict_sessions_maps_to_policy() {
        let mut config = AppConfig::default();
        config.api.strict_sessions = true;
        assert_eq!(config.client_config().session_policy, SessionPolicy::Strict);
    }

    #[test]
    fn save_then_load_round_trips_partial_file() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join("config.toml");
        if let Err(error) = std::fs::write(&path, "[bot]\ndefault_player = \"Zapman\"\n") {
            panic!("write failed: {error}");
        }

        let config = match AppConfig::load(Some(&path), &AppCliFlags::default()) {
            Ok(config) => config,
            Err(error) => panic!("load failed: {error}"),
        };
        assert_eq!(config.bot.default_player, "Zapman");
        assert_eq!(config.api.lang, "1");

        if let Err(error) = config.save(Some(&path)) {
            panic!("save failed: {error}");
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) => panic!("read failed: {error}"),
        };
        assert!(text.contains("default_player = \"Zapman\""));
        assert!(text.contains("timeout_secs = 30"));
    }

    #[test]
    fn default_config_path_expands() {
        let path = default_config_path();
        assert!(!path.to_string_lossy().contains('~'));
    }
}
