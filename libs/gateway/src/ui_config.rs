//! Keeps the host's `UI_Config.json` in step with the saved settings, so the
//! settings UI shows the credentials that are actually in use.

use std::path::Path;

use anyhow::{Result, anyhow};
use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};

use crate::settings::{Settings, strip_bom};

pub const UI_CONFIG_FILE: &str = "UI_Config.json";

/// Writes `DevId.value` and `AuthKey.value` into the UI config at `path`.
/// Output uses four-space indentation with sorted keys.
pub fn sync_ui_config(path: &Path, settings: &Settings) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| anyhow!("failed to read ui config {}: {error}", path.display()))?;
    let mut ui: Value = serde_json::from_str(strip_bom(&text))
        .map_err(|error| anyhow!("failed to parse ui config {}: {error}", path.display()))?;

    set_field_value(&mut ui, "DevId", &settings.dev_id)?;
    set_field_value(&mut ui, "AuthKey", &settings.auth_key)?;

    std::fs::write(path, to_pretty_json(&sort_keys(ui))?)
        .map_err(|error| anyhow!("failed to write ui config {}: {error}", path.display()))
}

fn set_field_value(ui: &mut Value, field: &str, value: &str) -> Result<()> {
    let entry = ui
        .get_mut(field)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow!("ui config has no `{field}` entry"))?;
    entry.insert("value".to_string(), Value::String(value.to_string()));
    Ok(())
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn to_pretty_json(value: &Value) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|error| anyhow!("failed to serialize ui config: {error}"))?;
    String::from_utf8(out).map_err(|error| anyhow!("ui config is not utf-8: {error}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ui_fixture() -> Value {
        json!({
            "output_file": "settings.json",
            "DevId": {"type": "textbox", "value": "", "label": "Dev Id", "group": "Smite API"},
            "AuthKey": {"type": "textbox", "value": "", "label": "Auth Key", "group": "Smite API"}
        })
    }

    #[test]
    fn sync_updates_values_and_sorts_keys() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join(UI_CONFIG_FILE);
        if let Err(error) = std::fs::write(&path, ui_fixture().to_string()) {
            panic!("write failed: {error}");
        }
        let settings = Settings {
            dev_id: "1004".to_string(),
            auth_key: "ABC".to_string(),
        };

        if let Err(error) = sync_ui_config(&path, &settings) {
            panic!("sync failed: {error}");
        }

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) => panic!("read failed: {error}"),
        };
        let written: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(error) => panic!("parse failed: {error}"),
        };
        assert_eq!(written["DevId"]["value"], json!("1004"));
        assert_eq!(written["AuthKey"]["value"], json!("ABC"));
        assert_eq!(written["DevId"]["label"], json!("Dev Id"));
        assert!(text.starts_with("{\n    \"AuthKey\": {\n        \"group\""));
    }

    #[test]
    fn sync_fails_when_field_missing() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join(UI_CONFIG_FILE);
        if let Err(error) = std::fs::write(&path, "{\"DevId\": {\"value\": \"\"}}") {
            panic!("write failed: {error}");
        }

        assert!(sync_ui_config(&path, &Settings::default()).is_err());
    }
}
