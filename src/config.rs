use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let session_secret = env_required("SESSION_SECRET")?;

        let host: IpAddr = env_or("AUTHGATE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid AUTHGATE_HOST: {e}"))?;

        let port: u16 = env_or("AUTHGATE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid AUTHGATE_PORT: {e}"))?;

        let base_url = env_or("AUTHGATE_BASE_URL", &format!("http://{host}:{port}"));

        let trusted_proxies: Vec<IpNet> = env_or("AUTHGATE_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid AUTHGATE_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_level = env_or("AUTHGATE_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("AUTHGATE_SMTP_HOST").ok(),
            std::env::var("AUTHGATE_SMTP_PORT").ok(),
            std::env::var("AUTHGATE_SMTP_USER").ok(),
            std::env::var("AUTHGATE_SMTP_PASS").ok(),
            std::env::var("AUTHGATE_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid AUTHGATE_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            session_secret,
            host,
            port,
            base_url,
            trusted_proxies,
            log_level,
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
