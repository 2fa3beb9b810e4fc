//! CLI argument definitions for the Solace server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use solace_core::config::SolaceConfig;
use solace_core::error::SolaceError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SOLACE_CONFIG";

/// Port overrides, checked in order.
pub const PORT_ENVS: [&str; 2] = ["SOLACE_PORT", "PORT"];

/// Solace - a supportive chat companion backend.
#[derive(Parser, Debug)]
#[command(name = "solace", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// HTTP port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SOLACE_CONFIG env var > ./solace.toml.
    /// Only the last is implicit.
    pub fn resolve_config_path(&self) -> ConfigPath {
        if let Some(ref p) = self.config {
            return ConfigPath {
                path: p.clone(),
                explicit: true,
            };
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            if !p.trim().is_empty() {
                return ConfigPath {
                    path: PathBuf::from(p),
                    explicit: true,
                };
            }
        }
        ConfigPath {
            path: PathBuf::from("solace.toml"),
            explicit: false,
        }
    }

    /// Resolve the HTTP port.
    ///
    /// Priority: --port flag > SOLACE_PORT > PORT > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        PORT_ENVS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find_map(|val| val.trim().parse::<u16>().ok())
            .unwrap_or(config_port)
    }

    pub fn resolve_host(&self, config_host: &str) -> String {
        self.host.clone().unwrap_or_else(|| config_host.to_string())
    }

    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Where the config file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
    /// Named by the operator rather than the built-in default.
    pub explicit: bool,
}

/// How an implicit config file was handled. Logged once tracing is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOutcome {
    Loaded,
    Missing,
    Rejected(String),
}

/// Load the config file.
///
/// An explicit file must load and validate. The implicit `./solace.toml`
/// falls back to defaults when absent or rejected.
pub fn load_config(location: &ConfigPath) -> Result<(SolaceConfig, ConfigOutcome), SolaceError> {
    if location.explicit {
        return SolaceConfig::load(&location.path).map(|c| (c, ConfigOutcome::Loaded));
    }
    if !location.path.exists() {
        return Ok((SolaceConfig::default(), ConfigOutcome::Missing));
    }
    match SolaceConfig::load(&location.path) {
        Ok(config) => Ok((config, ConfigOutcome::Loaded)),
        Err(e) => Ok((SolaceConfig::default(), ConfigOutcome::Rejected(e.to_string()))),
    }
}

/// Log how `path` was handled.
pub fn log_config_outcome(path: &Path, outcome: &ConfigOutcome) {
    match outcome {
        ConfigOutcome::Loaded => tracing::info!(path = %path.display(), "Configuration loaded"),
        ConfigOutcome::Missing => {
            tracing::info!(path = %path.display(), "No configuration file, using defaults")
        }
        ConfigOutcome::Rejected(reason) => tracing::warn!(
            path = %path.display(),
            error = %reason,
            "Failed to load configuration, using defaults"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "solace",
            "--config",
            "/etc/solace.toml",
            "--port",
            "9000",
            "--host",
            "127.0.0.1",
            "-l",
            "debug",
        ]);
        assert_eq!(
            args.resolve_config_path(),
            ConfigPath {
                path: PathBuf::from("/etc/solace.toml"),
                explicit: true,
            }
        );
        assert_eq!(args.resolve_port(8080), 9000);
        assert_eq!(args.resolve_host("0.0.0.0"), "127.0.0.1");
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_config_values_used_without_flags() {
        let args = CliArgs::parse_from(["solace"]);
        assert_eq!(args.resolve_host("0.0.0.0"), "0.0.0.0");
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const OUT_OF_RANGE: &str = "[general]\nport = 9999\n\n[llm]\ntemperature = 3.5\n";

    #[test]
    fn test_explicit_invalid_config_is_an_error() {
        let file = write_config(OUT_OF_RANGE);
        let location = ConfigPath {
            path: file.path().to_path_buf(),
            explicit: true,
        };
        let err = load_config(&location).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let location = ConfigPath {
            path: dir.path().join("absent.toml"),
            explicit: true,
        };
        assert!(load_config(&location).is_err());
    }

    #[test]
    fn test_explicit_valid_config_is_used() {
        let file = write_config("[general]\nport = 9999\n");
        let location = ConfigPath {
            path: file.path().to_path_buf(),
            explicit: true,
        };
        let (config, outcome) = load_config(&location).unwrap();
        assert_eq!(config.general.port, 9999);
        assert_eq!(outcome, ConfigOutcome::Loaded);
    }

    #[test]
    fn test_implicit_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ConfigPath {
            path: dir.path().join("solace.toml"),
            explicit: false,
        };
        let (config, outcome) = load_config(&missing).unwrap();
        assert_eq!(config.general.port, 8080);
        assert_eq!(outcome, ConfigOutcome::Missing);

        let file = write_config(OUT_OF_RANGE);
        let rejected = ConfigPath {
            path: file.path().to_path_buf(),
            explicit: false,
        };
        let (config, outcome) = load_config(&rejected).unwrap();
        assert_eq!(config.general.port, 8080);
        assert!(matches!(outcome, ConfigOutcome::Rejected(ref r) if r.contains("temperature")));
    }
}
