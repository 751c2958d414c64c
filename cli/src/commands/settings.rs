use std::path::Path;

use clap::Subcommand;
use smitebot_gateway::{
    AppConfig, Settings,
    settings::settings_path,
    ui_config::{UI_CONFIG_FILE, sync_ui_config},
};

#[derive(Subcommand, PartialEq, Debug)]
pub enum SettingsCommands {
    /// Print the script settings with the auth key masked
    Show,
    /// Update the dev id and/or auth key
    Set {
        #[arg(long)]
        dev_id: Option<String>,
        #[arg(long)]
        auth_key: Option<String>,
    },
}

impl SettingsCommands {
    pub fn run(self, config: AppConfig) -> Result<(), String> {
        let script_dir = config.bot.script_dir.as_path();
        match self {
            SettingsCommands::Show => {
                let settings = Settings::load(&settings_path(script_dir));
                println!("Settings file: {}", settings_path(script_dir).display());
                println!("DevId: {}", settings.dev_id);
                println!("AuthKey: {}", mask(&settings.auth_key));
            }
            SettingsCommands::Set { dev_id, auth_key } => {
                if dev_id.is_none() && auth_key.is_none() {
                    return Err("Nothing to set, pass --dev-id and/or --auth-key".to_string());
                }
                let settings = update_settings(script_dir, dev_id, auth_key)?;
                println!("Settings saved for dev id {}", settings.dev_id);
            }
        }
        Ok(())
    }
}

fn update_settings(
    script_dir: &Path,
    dev_id: Option<String>,
    auth_key: Option<String>,
) -> Result<Settings, String> {
    let path = settings_path(script_dir);
    let mut settings = Settings::load(&path);
    if let Some(dev_id) = dev_id {
        settings.dev_id = dev_id;
    }
    if let Some(auth_key) = auth_key {
        settings.auth_key = auth_key;
    }

    settings
        .save(&path)
        .map_err(|e| format!("Failed to save settings: {}", e))?;

    let ui_path = script_dir.join(UI_CONFIG_FILE);
    if ui_path.exists() {
        sync_ui_config(&ui_path, &settings)
            .map_err(|e| format!("Failed to update {}: {}", UI_CONFIG_FILE, e))?;
    }

    Ok(settings)
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return "<not set>".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}

#[cfg(test)]
mod tests {
    use smitebot_gateway::{Settings, settings::settings_path};

    use super::{mask, update_settings};

    #[test]
    fn masks_secrets() {
        assert_eq!(mask(""), "<not set>");
        assert_eq!(mask("ABCDEFGH"), "ABCD****");
        assert_eq!(mask("AB"), "AB****");
    }

    #[test]
    fn set_keeps_unchanged_field_and_syncs_ui_config() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let ui_path = dir.path().join("UI_Config.json");
        if let Err(error) = std::fs::write(
            &ui_path,
            r#"{"output_file": "settings.json", "DevId": {"value": ""}, "AuthKey": {"value": ""}}"#,
        ) {
            panic!("write failed: {error}");
        }

        if let Err(error) = update_settings(dir.path(), Some("1004".to_string()), Some("K1".to_string())) {
            panic!("first update failed: {error}");
        }
        let settings = match update_settings(dir.path(), None, Some("K2".to_string())) {
            Ok(settings) => settings,
            Err(error) => panic!("second update failed: {error}"),
        };

        assert_eq!(settings.dev_id, "1004");
        assert_eq!(Settings::load(&settings_path(dir.path())).auth_key, "K2");

        let ui = match std::fs::read_to_string(&ui_path) {
            Ok(text) => text,
            Err(error) => panic!("read failed: {error}"),
        };
        let ui: serde_json::Value = match serde_json::from_str(&ui) {
            Ok(value) => value,
            Err(error) => panic!("parse failed: {error}"),
        };
        assert_eq!(ui["DevId"]["value"], "1004");
        assert_eq!(ui["AuthKey"]["value"], "K2");
    }
}
