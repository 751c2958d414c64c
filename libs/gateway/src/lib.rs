pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod plugin;
pub mod settings;
pub mod types;
pub mod ui_config;

pub use commands::Command;
pub use config::{AppCliFlags, AppConfig};
pub use dispatcher::{DEFAULT_PLAYER, Dispatcher};
pub use plugin::{
    ChatHost, PluginOptions, SCRIPT_CREATOR, SCRIPT_DESCRIPTION, SCRIPT_NAME, SCRIPT_VERSION,
    SmitePlugin,
};
pub use settings::Settings;
pub use types::{InboundMessage, MessageKind};
