//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print a single value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;

    let mut values = serde_json::Map::new();
    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    for key in CONFIG_KEYS {
        let value = config.get(key)?;
        match &value {
            Some(v) => text.push_str(&format!("  {}: {}\n", key.cyan(), v)),
            None => text.push_str(&format!("  {}: {}\n", key.cyan(), "not set".dimmed())),
        }
        values.insert(key.to_string(), json!(value));
    }
    text.push_str(&format!(
        "\n{}",
        format!("Config file: {}", path.display()).dimmed()
    ));

    CommandOutput::new(json!({
        "values": values,
        "config_file": path.to_string_lossy(),
    }))
    .with_text(text)
    .print(output_json)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    let text = value.clone().unwrap_or_else(|| "not set".to_string());

    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(text)
        .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    // Read back through `get` so secrets stay masked
    let shown = config.get(key)?.unwrap_or_default();
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} = {}", key.cyan(), shown))
    .print(output_json)
}
