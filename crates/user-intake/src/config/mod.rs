use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::registration::credit::DEFAULT_MAX_IN_FLIGHT;
use crate::registration::eligibility::{EligibilityConfig, EmailPolicy};

const DEFAULT_CREDIT_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_STUB_CREDIT_LIMIT: u32 = 1_000;

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
    pub registration: RegistrationConfig,
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
            registration: RegistrationConfig::from_env()?,
        })
    }
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Eligibility thresholds plus collaborator wiring for the registration workflow.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    pub eligibility: EligibilityConfig,
    pub credit_timeout: Duration,
    pub credit_max_in_flight: usize,
    pub clients_csv: Option<PathBuf>,
    pub stub_credit_limit: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            eligibility: EligibilityConfig::default(),
            credit_timeout: Duration::from_millis(DEFAULT_CREDIT_TIMEOUT_MS),
            credit_max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            clients_csv: None,
            stub_credit_limit: DEFAULT_STUB_CREDIT_LIMIT,
        }
    }
}

impl RegistrationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let eligibility = EligibilityConfig {
            minimum_age: parse_var(
                "REGISTRATION_MINIMUM_AGE",
                defaults.eligibility.minimum_age,
            )?,
            minimum_credit_limit: parse_var(
                "REGISTRATION_MINIMUM_CREDIT_LIMIT",
                defaults.eligibility.minimum_credit_limit,
            )?,
            important_multiplier: parse_var(
                "REGISTRATION_IMPORTANT_MULTIPLIER",
                defaults.eligibility.important_multiplier,
            )?,
            email_policy: match env::var("REGISTRATION_EMAIL_POLICY") {
                Ok(raw) => EmailPolicy::from_label(&raw)
                    .ok_or(ConfigError::InvalidEmailPolicy { value: raw })?,
                Err(_) => defaults.eligibility.email_policy,
            },
        };

        let timeout_ms = parse_var("REGISTRATION_CREDIT_TIMEOUT_MS", DEFAULT_CREDIT_TIMEOUT_MS)?;
        let clients_csv = env::var("REGISTRATION_CLIENTS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            eligibility,
            credit_timeout: Duration::from_millis(timeout_ms),
            credit_max_in_flight: parse_var(
                "REGISTRATION_CREDIT_MAX_IN_FLIGHT",
                defaults.credit_max_in_flight,
            )?,
            clients_csv,
            stub_credit_limit: parse_var(
                "REGISTRATION_STUB_CREDIT_LIMIT",
                defaults.stub_credit_limit,
            )?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
    InvalidEmailPolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative integer (found '{value}')")
            }
            ConfigError::InvalidEmailPolicy { value } => {
                write!(
                    f,
                    "REGISTRATION_EMAIL_POLICY must be 'any' or 'all' (found '{value}')"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidEmailPolicy { .. } => None,
        }
    }
}
