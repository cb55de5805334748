use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::dossier::DEFAULT_DOSSIER_PRICE_CENTS;
use crate::rates::RefreshSchedule;

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

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rates: RatesConfig,
    pub billing: BillingConfig,
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

        let refresh_day = env::var("APP_RATE_REFRESH_DAY")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .ok()
            .filter(|day| (1..=28).contains(day))
            .ok_or(ConfigError::InvalidRefreshDay)?;
        let refresh_hour = env::var("APP_RATE_REFRESH_HOUR")
            .unwrap_or_else(|_| "9".to_string())
            .parse::<u32>()
            .ok()
            .filter(|hour| *hour < 24)
            .ok_or(ConfigError::InvalidRefreshHour)?;
        let csv_path = env::var("APP_RATE_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let dossier_price_cents = match env::var("APP_DOSSIER_PRICE_CENTS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|cents| *cents > 0)
                .ok_or(ConfigError::InvalidDossierPrice)?,
            Err(_) => DEFAULT_DOSSIER_PRICE_CENTS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rates: RatesConfig {
                schedule: RefreshSchedule::new(refresh_day, refresh_hour),
                csv_path,
            },
            billing: BillingConfig {
                dossier_price_cents,
            },
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

/// Where rates come from and when they are refreshed.
#[derive(Debug, Clone)]
pub struct RatesConfig {
    pub schedule: RefreshSchedule,
    pub csv_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub dossier_price_cents: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRefreshDay,
    InvalidRefreshHour,
    InvalidDossierPrice,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRefreshDay => {
                write!(f, "APP_RATE_REFRESH_DAY must be a day between 1 and 28")
            }
            ConfigError::InvalidRefreshHour => {
                write!(f, "APP_RATE_REFRESH_HOUR must be an hour between 0 and 23")
            }
            ConfigError::InvalidDossierPrice => {
                write!(f, "APP_DOSSIER_PRICE_CENTS must be a positive amount in cents")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRefreshDay
            | ConfigError::InvalidRefreshHour
            | ConfigError::InvalidDossierPrice => None,
        }
    }
}
