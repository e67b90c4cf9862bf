use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub scheduler: SchedulerConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Monthly reminder sweep trigger: day-of-month and hour, evaluated at a
/// single configured UTC offset.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub sweep_day: u8,
    pub sweep_hour: u32,
    pub utc_offset_minutes: i32,
}

impl SchedulerConfig {
    pub fn utc_offset(&self) -> FixedOffset {
        // Range-checked in from_env; fall back to UTC just in case.
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            Err(_) => Some(10),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            Err(_) => Some(1),
        };

        let sweep_enabled = match env::var("REMINDER_SWEEP_ENABLED") {
            Ok(val) => val.parse().context("Failed to parse REMINDER_SWEEP_ENABLED")?,
            Err(_) => true,
        };
        let sweep_day: u8 = env::var("REMINDER_SWEEP_DAY")
            .unwrap_or_else(|_| "4".to_string())
            .parse()
            .context("Failed to parse REMINDER_SWEEP_DAY")?;
        if !(1..=31).contains(&sweep_day) {
            anyhow::bail!("REMINDER_SWEEP_DAY must be between 1 and 31");
        }
        let sweep_hour: u32 = env::var("REMINDER_SWEEP_HOUR")
            .unwrap_or_else(|_| "9".to_string())
            .parse()
            .context("Failed to parse REMINDER_SWEEP_HOUR")?;
        if sweep_hour > 23 {
            anyhow::bail!("REMINDER_SWEEP_HOUR must be between 0 and 23");
        }
        let utc_offset_minutes: i32 = env::var("REMINDER_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "330".to_string())
            .parse()
            .context("Failed to parse REMINDER_UTC_OFFSET_MINUTES")?;
        if FixedOffset::east_opt(utc_offset_minutes * 60).is_none() {
            anyhow::bail!("REMINDER_UTC_OFFSET_MINUTES is out of range");
        }

        let environment_str =
            env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = match environment_str.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Rentdesk".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            scheduler: SchedulerConfig {
                enabled: sweep_enabled,
                sweep_day,
                sweep_hour,
                utc_offset_minutes,
            },
            app: AppConfig {
                name: app_name,
                environment,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    #[allow(unused)]
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}
