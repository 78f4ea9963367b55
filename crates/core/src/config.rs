use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub defaults: PricingDefaults,
    pub logging: LoggingConfig,
}

/// Every fallback the original system scattered across call sites, gathered
/// into one explicit struct so tests can override each default
/// deterministically. No pricing code reads ambient constants.
#[derive(Clone, Debug, PartialEq)]
pub struct PricingDefaults {
    pub currency: String,
    pub tax_percent: Decimal,
    pub regular_discount_percent: Decimal,
    /// Decimal places kept when formatting amounts for display. The engine
    /// itself emits full-precision figures; rounding happens once, at the
    /// formatting boundary.
    pub rounding_scale: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub currency: Option<String>,
    pub tax_percent: Option<Decimal>,
    pub regular_discount_percent: Option<Decimal>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: PricingDefaults {
                currency: "JPY".to_string(),
                // Japanese consumption tax, the fleet's home market.
                tax_percent: Decimal::from(10),
                regular_discount_percent: Decimal::ZERO,
                rounding_scale: 0,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("fleetfare.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(defaults) = patch.defaults {
            if let Some(currency) = defaults.currency {
                self.defaults.currency = currency;
            }
            if let Some(tax_percent) = defaults.tax_percent {
                self.defaults.tax_percent = tax_percent;
            }
            if let Some(regular_discount_percent) = defaults.regular_discount_percent {
                self.defaults.regular_discount_percent = regular_discount_percent;
            }
            if let Some(rounding_scale) = defaults.rounding_scale {
                self.defaults.rounding_scale = rounding_scale;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("FLEETFARE_DEFAULT_CURRENCY") {
            self.defaults.currency = value;
        }
        if let Some(value) = read_env("FLEETFARE_DEFAULT_TAX_PERCENT") {
            self.defaults.tax_percent = parse_decimal("FLEETFARE_DEFAULT_TAX_PERCENT", &value)?;
        }
        if let Some(value) = read_env("FLEETFARE_DEFAULT_DISCOUNT_PERCENT") {
            self.defaults.regular_discount_percent =
                parse_decimal("FLEETFARE_DEFAULT_DISCOUNT_PERCENT", &value)?;
        }
        if let Some(value) = read_env("FLEETFARE_ROUNDING_SCALE") {
            self.defaults.rounding_scale = parse_u32("FLEETFARE_ROUNDING_SCALE", &value)?;
        }

        let log_level =
            read_env("FLEETFARE_LOGGING_LEVEL").or_else(|| read_env("FLEETFARE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("FLEETFARE_LOGGING_FORMAT").or_else(|| read_env("FLEETFARE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(currency) = overrides.currency {
            self.defaults.currency = currency;
        }
        if let Some(tax_percent) = overrides.tax_percent {
            self.defaults.tax_percent = tax_percent;
        }
        if let Some(regular_discount_percent) = overrides.regular_discount_percent {
            self.defaults.regular_discount_percent = regular_discount_percent;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_defaults(&self.defaults)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("fleetfare.toml"), PathBuf::from("config/fleetfare.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_defaults(defaults: &PricingDefaults) -> Result<(), ConfigError> {
    let currency = defaults.currency.trim();
    if currency.len() != 3 || !currency.chars().all(|ch| ch.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(
            "defaults.currency must be a three-letter uppercase ISO code (e.g. JPY)".to_string(),
        ));
    }

    let percent_range = Decimal::ZERO..=Decimal::from(100);
    if !percent_range.contains(&defaults.tax_percent) {
        return Err(ConfigError::Validation(
            "defaults.tax_percent must be in range 0..=100".to_string(),
        ));
    }
    if !percent_range.contains(&defaults.regular_discount_percent) {
        return Err(ConfigError::Validation(
            "defaults.regular_discount_percent must be in range 0..=100".to_string(),
        ));
    }

    if defaults.rounding_scale > 4 {
        return Err(ConfigError::Validation(
            "defaults.rounding_scale must be in range 0..=4".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    value.parse::<Decimal>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    defaults: Option<DefaultsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DefaultsPatch {
    currency: Option<String>,
    tax_percent: Option<Decimal>,
    regular_discount_percent: Option<Decimal>,
    rounding_scale: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_describe_the_home_market() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.defaults.currency == "JPY", "default currency should be JPY")?;
        ensure(
            config.defaults.tax_percent == Decimal::from(10),
            "default tax should be the 10% consumption tax",
        )?;
        ensure(config.defaults.rounding_scale == 0, "JPY formats with no decimal places")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_FLEET_CURRENCY", "THB");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("fleetfare.toml");
            fs::write(
                &path,
                r#"
[defaults]
currency = "${TEST_FLEET_CURRENCY}"
tax_percent = "7"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.defaults.currency == "THB",
                "currency should be interpolated from the environment",
            )?;
            ensure(
                config.defaults.tax_percent == Decimal::from(7),
                "tax percent should come from the file",
            )
        })();

        clear_vars(&["TEST_FLEET_CURRENCY"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("FLEETFARE_DEFAULT_TAX_PERCENT", "8");
        env::set_var("FLEETFARE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("fleetfare.toml");
            fs::write(
                &path,
                r#"
[defaults]
currency = "USD"
tax_percent = "5"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    currency: Some("EUR".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.defaults.currency == "EUR", "programmatic currency override should win")?;
            ensure(
                config.defaults.tax_percent == Decimal::from(8),
                "env tax percent should win over the file",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "log format alias env var should be honored",
            )
        })();

        clear_vars(&["FLEETFARE_DEFAULT_TAX_PERCENT", "FLEETFARE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("FLEETFARE_DEFAULT_CURRENCY", "yen");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("defaults.currency")
            );
            ensure(has_message, "validation failure should mention defaults.currency")
        })();

        clear_vars(&["FLEETFARE_DEFAULT_CURRENCY"]);
        result
    }

    #[test]
    fn out_of_range_percent_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("FLEETFARE_DEFAULT_TAX_PERCENT", "250");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected tax percent validation failure".to_string()),
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("tax_percent")
            );
            ensure(has_message, "validation failure should mention tax_percent")
        })();

        clear_vars(&["FLEETFARE_DEFAULT_TAX_PERCENT"]);
        result
    }
}
