use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::intake::validator::{DEFAULT_MAX_ENTRIES, DEFAULT_MAX_RESUME_BYTES};

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        let value = value.to_ascii_lowercase();
        if value == "production" || value == "prod" {
            Self::Production
        } else if value == "test" || value == "ci" {
            Self::Test
        } else {
            Self::Development
        }
    }
}

/// Everything the binary reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    /// Read `.env` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: text_var("APP_HOST", "127.0.0.1"),
            port: parsed_var("APP_PORT", 3000)?,
        };
        let telemetry = TelemetryConfig {
            log_level: text_var("APP_LOG_LEVEL", "info"),
            log_format: LogFormat::parse(&text_var("APP_LOG_FORMAT", "compact")),
        };
        let intake = IntakeConfig {
            max_entries: parsed_var("INTAKE_MAX_ENTRIES", DEFAULT_MAX_ENTRIES)?,
            max_resume_bytes: parsed_var("INTAKE_MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)?,
        };

        Ok(Self {
            environment: AppEnvironment::parse(&text_var("APP_ENV", "development")),
            server,
            telemetry,
            intake,
        })
    }
}

fn text_var(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Resolve the bind address. `localhost` maps to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output style of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("pretty") {
            Self::Pretty
        } else {
            Self::Compact
        }
    }
}

/// Limits applied to inbound candidate submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeConfig {
    pub max_entries: usize,
    pub max_resume_bytes: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_resume_bytes: DEFAULT_MAX_RESUME_BYTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    InvalidNumber {
        key: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST '{host}' is neither localhost nor an IP address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} is not a valid number"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            ConfigError::InvalidNumber { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "INTAKE_MAX_ENTRIES",
            "INTAKE_MAX_RESUME_BYTES",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let _lock = ENV_LOCK.lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("defaults load");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(
            config.server.socket_addr().expect("default host parses"),
            SocketAddr::from(([127, 0, 0, 1], 3000))
        );
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.intake, IntakeConfig::default());
    }

    #[test]
    fn localhost_maps_to_loopback() {
        let _lock = ENV_LOCK.lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "LocalHost");
        let addr = AppConfig::load()
            .and_then(|config| config.server.socket_addr())
            .expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000));
        reset_env();
    }

    #[test]
    fn reads_intake_limits() {
        let _lock = ENV_LOCK.lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_MAX_ENTRIES", "3");
        env::set_var("INTAKE_MAX_RESUME_BYTES", "1024");
        env::set_var("APP_LOG_FORMAT", "Pretty");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.intake.max_entries, 3);
        assert_eq!(config.intake.max_resume_bytes, 1024);
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
        reset_env();
    }

    #[test]
    fn rejects_unparseable_host() {
        let _lock = ENV_LOCK.lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "not-a-host");
        let config = AppConfig::load().expect("host is checked when binding");
        let err = config.server.socket_addr().expect_err("host rejected");
        assert!(std::error::Error::source(&err).is_some());
        match err {
            ConfigError::InvalidHost { host, .. } => assert_eq!(host, "not-a-host"),
            other => panic!("expected invalid host, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_port() {
        let _lock = ENV_LOCK.lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "70000");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { key }) => assert_eq!(key, "APP_PORT"),
            other => panic!("expected invalid port, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_limits() {
        let _lock = ENV_LOCK.lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_MAX_ENTRIES", "many");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { key }) => assert_eq!(key, "INTAKE_MAX_ENTRIES"),
            other => panic!("expected invalid number, got {other:?}"),
        }
        reset_env();
    }
}
