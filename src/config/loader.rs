//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_ENV: &str = "ROLLOUT_TARGET_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid seed {0:?}: expected an unsigned integer")]
    InvalidSeed(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line. They win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub port: Option<String>,
    pub behavior: Option<String>,
    pub version: Option<String>,
}

/// Parse a TOML file into a configuration without validating it.
pub fn load_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply `VERSION`, `BEHAVIOR`, `PORT`, `HOSTNAME_OVERRIDE` and
/// `BEHAVIOR_SEED` from `lookup`. Empty values count as unset.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(version) = get("VERSION") {
        config.service.version = version;
    }
    if let Some(behavior) = get("BEHAVIOR") {
        config.service.behavior = behavior;
    }
    if let Some(port) = get("PORT") {
        config.listener.port = port;
    }
    if let Some(hostname) = get("HOSTNAME_OVERRIDE") {
        config.service.hostname = Some(hostname);
    }
    if let Some(seed) = get("BEHAVIOR_SEED") {
        let parsed = seed
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidSeed(seed.clone()))?;
        config.service.seed = Some(parsed);
    }
    Ok(())
}

/// Build the effective configuration: defaults, then the optional TOML file,
/// then environment, then command-line overrides. The result is validated.
pub fn load_layered<F>(overrides: &Overrides, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = overrides
        .config_path
        .clone()
        .or_else(|| lookup(CONFIG_FILE_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

    let mut config = match path {
        Some(path) => load_file(&path)?,
        None => ServiceConfig::default(),
    };

    apply_env(&mut config, &lookup)?;

    if let Some(port) = &overrides.port {
        config.listener.port = port.clone();
    }
    if let Some(behavior) = &overrides.behavior {
        config.service.behavior = behavior.clone();
    }
    if let Some(version) = &overrides.version {
        config.service.version = version.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration using the process environment.
pub fn load_config(overrides: &Overrides) -> Result<ServiceConfig, ConfigError> {
    load_layered(overrides, |key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = load_layered(&Overrides::default(), env(&[])).unwrap();
        assert_eq!(config.service.version, "1.0");
        assert_eq!(config.service.behavior, "normal");
        assert_eq!(config.listener.port, "8080");
        assert_eq!(config.timeouts.read_secs, 5);
        assert_eq!(config.timeouts.write_secs, 10);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = load_layered(
            &Overrides::default(),
            env(&[
                ("VERSION", "2.3"),
                ("BEHAVIOR", "chaotic"),
                ("PORT", "9000"),
                ("BEHAVIOR_SEED", "42"),
            ]),
        )
        .unwrap();
        assert_eq!(config.service.version, "2.3");
        assert_eq!(config.service.behavior, "chaotic");
        assert_eq!(config.listener.port, "9000");
        assert_eq!(config.service.seed, Some(42));
    }

    #[test]
    fn test_empty_env_counts_as_unset() {
        let config =
            load_layered(&Overrides::default(), env(&[("VERSION", ""), ("PORT", "")])).unwrap();
        assert_eq!(config.service.version, "1.0");
        assert_eq!(config.listener.port, "8080");
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let err = load_layered(&Overrides::default(), env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("invalid port"));
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let err =
            load_layered(&Overrides::default(), env(&[("BEHAVIOR_SEED", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeed(_)));
    }

    #[test]
    fn test_file_then_env_then_cli() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
version = "3.0"
behavior = "slow"

[listener]
port = "7000"

[observability]
log_format = "json"
"#
        )
        .unwrap();

        let overrides = Overrides {
            config_path: Some(file.path().to_path_buf()),
            behavior: Some("error-prone".into()),
            ..Overrides::default()
        };
        let config = load_layered(&overrides, env(&[("PORT", "7100")])).unwrap();

        assert_eq!(config.service.version, "3.0");
        assert_eq!(config.service.behavior, "error-prone");
        assert_eq!(config.listener.port, "7100");
        assert_eq!(
            config.observability.log_format,
            crate::config::schema::LogFormat::Json
        );
        assert_eq!(config.timeouts.write_secs, 10);
    }

    #[test]
    fn test_config_file_from_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nversion = \"9.9\"").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config =
            load_layered(&Overrides::default(), env(&[(CONFIG_FILE_ENV, path.as_str())])).unwrap();
        assert_eq!(config.service.version, "9.9");
    }

    #[test]
    fn test_missing_file() {
        let overrides = Overrides {
            config_path: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Overrides::default()
        };
        let err = load_layered(&overrides, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service\nversion = ").unwrap();
        let overrides = Overrides {
            config_path: Some(file.path().to_path_buf()),
            ..Overrides::default()
        };
        assert!(matches!(
            load_layered(&overrides, env(&[])).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
