//! Server configuration from environment variables

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::AdminSeed;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
/// Upper bound for configured durations (one year)
const MAX_DURATION_SECS: u64 = 365 * 24 * 3600;

#[derive(Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub admin: AdminSeed,
}

impl ServerConfig {
    /// Read the process environment
    ///
    /// `SESSION_SECRET` is mandatory in release builds; debug builds fall
    /// back to a random secret and development cookie/KDF settings.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), !cfg!(debug_assertions))
    }

    fn from_lookup<F>(lookup: F, release: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let mut auth = if release {
            AuthConfig::default()
        } else {
            AuthConfig::development()
        };

        match lookup("SESSION_SECRET") {
            Some(encoded) => auth.session_secret = decode_secret(&encoded)?,
            None if release => bail!("SESSION_SECRET must be set in production"),
            None => tracing::warn!("SESSION_SECRET not set, using a random secret"),
        }

        if let Some(secs) = lookup("SESSION_IDLE_TTL_SECS") {
            auth.session_idle_ttl = parse_secs("SESSION_IDLE_TTL_SECS", &secs)?;
        }
        if let Some(secs) = lookup("SESSION_REAP_INTERVAL_SECS") {
            auth.session_reap_interval = parse_secs("SESSION_REAP_INTERVAL_SECS", &secs)?;
        }
        if let Some(pepper) = lookup("PASSWORD_PEPPER").filter(|p| !p.is_empty()) {
            auth.password_pepper = Some(pepper.into_bytes());
        }

        let mut admin = AdminSeed::default();
        if let Some(email) = lookup("ADMIN_EMAIL") {
            admin.email = email;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            admin.password = password;
        }
        if let Some(name) = lookup("ADMIN_NAME") {
            admin.name = name;
        }

        Ok(Self {
            bind_addr,
            frontend_origins,
            auth,
            admin,
        })
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("SESSION_SECRET must be base64")?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

fn parse_secs(key: &str, value: &str) -> anyhow::Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds"))?;
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    if secs > MAX_DURATION_SECS {
        bail!("{key} must be at most {MAX_DURATION_SECS} seconds");
    }
    Ok(Duration::from_secs(secs))
}
