//! Host lifecycle for the chat plugin: init, execute, tick, reload, unload and
//! toggle, the hooks a chat-bot runtime calls on its scripts.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use smitebot_api::{ClientConfig, Credentials, SmiteClient, Transport};
use tracing::{debug, info, warn};

use crate::{
    dispatcher::{DEFAULT_PLAYER, Dispatcher},
    settings::{SETTINGS_DIR, Settings, settings_path},
    types::InboundMessage,
    ui_config::{UI_CONFIG_FILE, sync_ui_config},
};

pub const SCRIPT_NAME: &str = "Smite API";
pub const SCRIPT_DESCRIPTION: &str = "!duelrank <player> and !godrank <player> <god> (add your smite dev id and auth key from the settings UI)";
pub const SCRIPT_CREATOR: &str = "Enchom";
pub const SCRIPT_VERSION: &str = "1.0.0.2";

/// What the plugin needs from the chat-bot runtime.
#[async_trait]
pub trait ChatHost: Send + Sync + 'static {
    async fn send_message(&self, text: &str) -> Result<()>;

    fn log(&self, script: &str, message: &str);
}

#[derive(Clone, Default)]
pub struct PluginOptions {
    pub client: ClientConfig,
    pub default_player: Option<String>,
    /// Takes precedence over the settings file when set.
    pub credentials: Option<Credentials>,
    /// Replaces the reqwest transport, mostly for tests.
    pub transport: Option<Arc<dyn Transport>>,
}

pub struct SmitePlugin {
    host: Arc<dyn ChatHost>,
    script_dir: PathBuf,
    settings: Settings,
    dispatcher: Dispatcher,
    enabled: bool,
}

impl SmitePlugin {
    /// Creates the settings directory, loads the settings and builds the client.
    pub fn init(
        script_dir: impl Into<PathBuf>,
        host: Arc<dyn ChatHost>,
        options: PluginOptions,
    ) -> Result<Self> {
        let script_dir = script_dir.into();
        let settings_dir = script_dir.join(SETTINGS_DIR);
        std::fs::create_dir_all(&settings_dir).map_err(|error| {
            anyhow!(
                "failed to create settings dir {}: {error}",
                settings_dir.display()
            )
        })?;

        let settings = Settings::load(&settings_path(&script_dir));
        let credentials = options
            .credentials
            .clone()
            .unwrap_or_else(|| settings.credentials());
        if credentials.is_empty() {
            warn!("no dev id / auth key configured, api calls will be rejected");
        }

        let sink_host = host.clone();
        let client = match options.transport {
            Some(transport) => SmiteClient::with_transport(options.client, credentials, transport),
            None => SmiteClient::new(options.client, credentials)
                .map_err(|error| anyhow!("failed to build api client: {error}"))?,
        }
        .with_log_sink(move |message| sink_host.log(SCRIPT_NAME, message));

        let default_player = options
            .default_player
            .unwrap_or_else(|| DEFAULT_PLAYER.to_string());

        info!(script_dir = %script_dir.display(), "smite plugin initialised");

        Ok(Self {
            host,
            script_dir,
            settings,
            dispatcher: Dispatcher::new(Arc::new(client), default_player),
            enabled: true,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &Arc<SmiteClient> {
        self.dispatcher.client()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn settings_path(&self) -> PathBuf {
        settings_path(&self.script_dir)
    }

    /// Handles one message from the host. Only chat messages are answered.
    pub async fn execute(&self, message: &InboundMessage) -> Result<()> {
        if !self.enabled || !message.is_chat_message() {
            return Ok(());
        }

        let Some(reply) = self.dispatcher.handle(&message.text).await else {
            return Ok(());
        };
        debug!(user = %message.user, "replying to chat command");
        self.host.send_message(&reply).await
    }

    /// Called on every host iteration. Nothing to do between messages.
    pub fn tick(&self) {}

    /// Applies settings saved from the host UI: rotates the client credentials,
    /// persists the settings and mirrors them into `UI_Config.json`.
    pub async fn reload_settings(&mut self, json: &str) -> Result<()> {
        self.settings.reload_from_json(json)?;
        self.client()
            .set_credentials(self.settings.credentials())
            .await;
        self.settings.save(&self.settings_path())?;

        let ui_path = self.script_dir.join(UI_CONFIG_FILE);
        if ui_path.exists() {
            sync_ui_config(&ui_path, &self.settings)?;
        } else {
            debug!(path = %ui_path.display(), "no ui config to update");
        }

        info!("settings reloaded");
        Ok(())
    }

    pub fn unload(&mut self) {
        info!("smite plugin unloaded");
    }

    pub fn script_toggled(&mut self, enabled: bool) {
        self.enabled = enabled;
        info!(enabled, "smite plugin toggled");
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }
}
