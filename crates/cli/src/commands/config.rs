use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use fleetfare_core::{AppConfig, LoadOptions};
use toml::Value;

use super::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("config", "config_validation", error.to_string(), 2)
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let fields: [(&str, String, &[&str]); 6] = [
        (
            "defaults.currency",
            config.defaults.currency.clone(),
            &["FLEETFARE_DEFAULT_CURRENCY"],
        ),
        (
            "defaults.tax_percent",
            config.defaults.tax_percent.to_string(),
            &["FLEETFARE_DEFAULT_TAX_PERCENT"],
        ),
        (
            "defaults.regular_discount_percent",
            config.defaults.regular_discount_percent.to_string(),
            &["FLEETFARE_DEFAULT_DISCOUNT_PERCENT"],
        ),
        (
            "defaults.rounding_scale",
            config.defaults.rounding_scale.to_string(),
            &["FLEETFARE_ROUNDING_SCALE"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["FLEETFARE_LOGGING_LEVEL", "FLEETFARE_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_lowercase(),
            &["FLEETFARE_LOGGING_FORMAT", "FLEETFARE_LOG_FORMAT"],
        ),
    ];

    for (key, value, env_vars) in fields {
        lines.push(render_line(
            key,
            &value,
            field_source(key, env_vars, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    CommandResult::success(lines.join("\n"))
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  [{source}]")
}

fn field_source(
    key: &str,
    env_vars: &[&str],
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    // Aliases share precedence with the primary var; first non-empty wins,
    // mirroring the load path.
    for var in env_vars {
        if env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env:{var}");
        }
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        if file_contains_key(doc, key) {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}

fn file_contains_key(doc: &Value, dotted_key: &str) -> bool {
    let mut current = doc;
    for part in dotted_key.split('.') {
        match current.get(part) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("fleetfare.toml"), PathBuf::from("config/fleetfare.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    toml::from_str(&raw).ok()
}
