use std::fmt;

use serde::Deserialize;

use codepool_core::config::Config;
use codepool_session::SessionSettings;

/// Username of the admin account created on first start.
pub const DEFAULT_ADMIN_USERNAME: &str = "administrator";

/// Initial password of that account. Stored only as a hash; override with
/// `DEFAULT_ADMIN_PASSWORD` in any real deployment.
pub const DEFAULT_ADMIN_PASSWORD: &str = "Loc@R@2";

const MIN_SESSION_SECRET_LEN: usize = 32;

/// One week.
const MAX_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Codepool service configuration loaded from environment variables.
#[derive(Deserialize)]
pub struct CodepoolConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for admin session tokens. Env var: `SESSION_SECRET`.
    pub session_secret: String,
    /// TCP port to listen on (default 5000). Env var: `CODEPOOL_PORT`.
    #[serde(default = "default_port")]
    pub codepool_port: u16,
    /// Admin session lifetime (default 30 minutes). Env var: `ADMIN_SESSION_TTL_SECS`.
    #[serde(default = "default_session_ttl")]
    pub admin_session_ttl_secs: u64,
    /// `Secure` cookie attribute (default true). Env var: `COOKIE_SECURE`.
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
    #[serde(default = "default_admin_username")]
    pub default_admin_username: String,
    #[serde(default = "default_admin_password")]
    pub default_admin_password: String,
}

impl Config for CodepoolConfig {}

fn default_port() -> u16 {
    5000
}

fn default_session_ttl() -> u64 {
    1800
}

fn default_cookie_secure() -> bool {
    true
}

fn default_admin_username() -> String {
    DEFAULT_ADMIN_USERNAME.to_owned()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_owned()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes")]
    WeakSessionSecret,
    #[error("ADMIN_SESSION_TTL_SECS must be positive")]
    ZeroSessionTtl,
    #[error("ADMIN_SESSION_TTL_SECS must not exceed {MAX_SESSION_TTL_SECS}")]
    SessionTtlTooLong,
}

impl CodepoolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::WeakSessionSecret);
        }
        if self.admin_session_ttl_secs == 0 {
            return Err(ConfigError::ZeroSessionTtl);
        }
        if self.admin_session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::SessionTtlTooLong);
        }
        Ok(())
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.default_admin_password == DEFAULT_ADMIN_PASSWORD
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            secret: self.session_secret.clone(),
            ttl_secs: self.admin_session_ttl_secs,
            secure_cookies: self.cookie_secure,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for CodepoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodepoolConfig")
            .field("database_url", &"<redacted>")
            .field("session_secret", &"<redacted>")
            .field("codepool_port", &self.codepool_port)
            .field("admin_session_ttl_secs", &self.admin_session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .field("default_admin_username", &self.default_admin_username)
            .finish_non_exhaustive()
    }
}
