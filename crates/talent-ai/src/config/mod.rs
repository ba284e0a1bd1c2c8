use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::workflows::mandates::{ScoringConfig, ScoringConfigError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: load_scoring()?,
        })
    }
}

/// Scoring weights: defaults, then `SCORING_CONFIG_PATH`, then per-weight
/// overrides from the environment.
fn load_scoring() -> Result<ScoringConfig, ConfigError> {
    let mut scoring = match env::var("SCORING_CONFIG_PATH") {
        Ok(path) if !path.trim().is_empty() => scoring_from_file(Path::new(path.trim()))?,
        _ => ScoringConfig::default(),
    };

    let overrides: [(&'static str, &mut f64); 3] = [
        ("SCORING_EXPERTISE_WEIGHT", &mut scoring.expertise_weight),
        ("SCORING_SIMILARITY_WEIGHT", &mut scoring.similarity_weight),
        ("SCORING_RELIABILITY_WEIGHT", &mut scoring.reliability_weight),
    ];
    for (variable, slot) in overrides {
        if let Ok(raw) = env::var(variable) {
            *slot = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidWeight {
                    variable,
                    value: raw.clone(),
                })?;
        }
    }

    scoring.validate().map_err(ConfigError::Scoring)?;
    Ok(scoring)
}

/// Read and validate a JSON scoring config; absent fields keep their defaults.
pub fn scoring_from_file(path: &Path) -> Result<ScoringConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ScoringFile {
        path: path.to_path_buf(),
        source,
    })?;
    let scoring: ScoringConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::ScoringFormat {
            path: path.to_path_buf(),
            source,
        })?;
    scoring.validate().map_err(ConfigError::Scoring)?;
    Ok(scoring)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { variable: &'static str, value: String },
    ScoringFile { path: PathBuf, source: std::io::Error },
    ScoringFormat { path: PathBuf, source: serde_json::Error },
    Scoring(ScoringConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { variable, value } => {
                write!(f, "{variable} must be a number (found '{value}')")
            }
            ConfigError::ScoringFile { path, .. } => {
                write!(f, "unable to read scoring config {}", path.display())
            }
            ConfigError::ScoringFormat { path, source } => {
                write!(f, "invalid scoring config {}: {}", path.display(), source)
            }
            ConfigError::Scoring(err) => write!(f, "invalid scoring config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidWeight { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::ScoringFile { source, .. } => Some(source),
            ConfigError::ScoringFormat { source, .. } => Some(source),
            ConfigError::Scoring(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SCORING_CONFIG_PATH",
            "SCORING_EXPERTISE_WEIGHT",
            "SCORING_SIMILARITY_WEIGHT",
            "SCORING_RELIABILITY_WEIGHT",
        ] {
            env::remove_var(variable);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn weight_overrides_apply_after_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("SCORING_SIMILARITY_WEIGHT", "0.05");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.scoring.similarity_weight, 0.05);
        assert_eq!(config.scoring.expertise_weight, 0.60);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_and_negative_weights() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_EXPERTISE_WEIGHT", "heavy");
        match AppConfig::load() {
            Err(ConfigError::InvalidWeight { variable, value }) => {
                assert_eq!(variable, "SCORING_EXPERTISE_WEIGHT");
                assert_eq!(value, "heavy");
            }
            other => panic!("expected invalid weight, got {other:?}"),
        }

        env::set_var("SCORING_EXPERTISE_WEIGHT", "-1");
        assert!(matches!(AppConfig::load(), Err(ConfigError::Scoring(_))));
        reset_env();
    }

    #[test]
    fn scoring_file_is_read_before_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = env::temp_dir().join(format!("talent-ai-scoring-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "similarity_weight": 0.1, "bias_risk": { "high_gap_threshold": 30.0 } }"#,
        )
        .expect("write scoring file");
        env::set_var("SCORING_CONFIG_PATH", &path);
        env::set_var("SCORING_RELIABILITY_WEIGHT", "0.3");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.similarity_weight, 0.1);
        assert_eq!(config.scoring.reliability_weight, 0.3);
        assert_eq!(config.scoring.bias_risk.high_gap_threshold, 30.0);
        assert_eq!(config.scoring.bias_risk.moderate_gap_threshold, 10.0);

        std::fs::remove_file(&path).ok();
        env::set_var("SCORING_CONFIG_PATH", "./missing-scoring.json");
        assert!(matches!(AppConfig::load(), Err(ConfigError::ScoringFile { .. })));
        reset_env();
    }

    #[test]
    fn scoring_files_with_invalid_weights_are_rejected() {
        let path = env::temp_dir().join(format!(
            "talent-ai-invalid-scoring-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "expertise_weight": -1.0 }"#).expect("write scoring file");

        let result = scoring_from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(ConfigError::Scoring(ScoringConfigError::InvalidWeight {
                field: "expertise_weight",
                ..
            }))
        ));
    }
}
