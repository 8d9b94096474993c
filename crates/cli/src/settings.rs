//! Configuration loading
//!
//! Sources, lowest priority first:
//! - built-in defaults
//! - `bridge.toml`, or the file named by `BRIDGE_CONFIG` (optional)
//! - environment variables such as `BRIDGE__MONITOR__INTERVAL_MS`

use anyhow::Context;
use config::{Config, Environment, File, Source};
use std::env;

use bridge_core::AppConfig;

pub const CONFIG_PATH_ENV: &str = "BRIDGE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "bridge.toml";

pub fn load() -> anyhow::Result<AppConfig> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_with(File::with_name(&path).required(false))
        .with_context(|| format!("loading configuration from {path}"))
}

fn load_with<S>(file: S) -> anyhow::Result<AppConfig>
where
    S: Source + Send + Sync + 'static,
{
    let settings = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(file)
        .add_source(
            Environment::with_prefix("BRIDGE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_without_file() {
        let config = load_with(File::with_name("does-not-exist.toml").required(false)).unwrap();
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.scoring.cost, 0.35);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [monitor]
            interval_ms = 5000

            [history]
            default_window_secs = 600
        "#;

        let config = load_with(File::from_str(toml, FileFormat::Toml)).unwrap();
        assert_eq!(config.monitor.interval_ms, 5000);
        assert_eq!(config.monitor.probe_timeout_ms, 10_000);
        assert_eq!(config.history.default_window_secs, 600);
        assert_eq!(config.history.retention_secs, 86_400);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let toml = r#"
            [monitor]
            interval_ms = 0
        "#;

        assert!(load_with(File::from_str(toml, FileFormat::Toml)).is_err());
    }
}
