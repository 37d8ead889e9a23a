//! # Configuration Management
//!
//! Configuration is read from environment variables (and a `.env` file when
//! present). Nothing secret is compiled into the binary.
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 5000)
//! - `DATABASE_URL`: SQLite database connection string
//! - `SECRET_KEY`: Secret used to sign the session cookie
//! - `COOKIE_SECURE`: Only send the session cookie over HTTPS (default: false)
//! - `ADMIN_USER`, `ADMIN_PASS`, `ADMIN_MAIL`: Account seeded on first start
//! - `LOG_FILE`: Rotating log file (default: wah.log, empty disables it)

use anyhow::Result;
use sha2::{Digest, Sha512};
use std::env;
use std::path::PathBuf;
use tower_sessions::cookie::Key;

const DEV_SECRET_KEY: &str = "wah-development-secret-change-me";
const DEV_ADMIN_PASS: &str = "admin";
const DEFAULT_LOG_FILE: &str = "wah.log";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    pub host: String,

    /// Server port number
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.sqlite?mode=rwc" (read, write, create)
    pub database_url: String,

    /// Secret the session cookie signing key is derived from
    pub secret_key: String,

    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,

    /// Username of the account created when the database is empty
    pub admin_user: String,

    /// Plaintext password of the seeded account (hashed before storage)
    pub admin_pass: String,

    /// Email of the seeded account
    pub admin_mail: String,

    /// Log file written next to the console output, `None` for console only
    pub log_file: Option<PathBuf>,
}

// Secrets are kept out of log output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("secret_key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("admin_user", &self.admin_user)
            .field("admin_pass", &"<redacted>")
            .field("admin_mail", &self.admin_mail)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Falls back to development defaults for everything; see
    /// [`Config::warn_on_defaults`].
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=5000
    /// DATABASE_URL=sqlite:wah.sqlite?mode=rwc
    /// SECRET_KEY=some-long-random-string
    /// ADMIN_USER=admin
    /// ADMIN_PASS=hunter2
    /// ADMIN_MAIL=admin@example.org
    /// LOG_FILE=/var/log/wah/wah.log
    /// ```
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:wah.sqlite?mode=rwc".to_string()),
            secret_key: env::var("SECRET_KEY").unwrap_or_else(|_| DEV_SECRET_KEY.to_string()),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            admin_user: env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
            admin_pass: env::var("ADMIN_PASS").unwrap_or_else(|_| DEV_ADMIN_PASS.to_string()),
            admin_mail: env::var("ADMIN_MAIL")
                .unwrap_or_else(|_| "admin@example.org".to_string()),
            log_file: log_file_from(env::var("LOG_FILE").ok()),
        };

        Ok(config)
    }

    /// Warn about development defaults still in use
    ///
    /// Called once logging is set up, since `from_env` runs before it.
    pub fn warn_on_defaults(&self) {
        if self.secret_key == DEV_SECRET_KEY {
            tracing::warn!("SECRET_KEY not set, using the development key");
        }
        if self.admin_pass == DEV_ADMIN_PASS {
            tracing::warn!("ADMIN_PASS not set, the seeded admin account uses the default password");
        }
    }

    /// Get the socket address to bind the server to, e.g. "127.0.0.1:5000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cookie signing key derived from `secret_key`
    ///
    /// SHA-512 yields exactly the 64 bytes `Key::from` requires, whatever
    /// the length of the configured secret.
    pub fn session_key(&self) -> Key {
        let digest = Sha512::digest(self.secret_key.as_bytes());
        Key::from(digest.as_slice())
    }
}

/// `LOG_FILE` unset means the default file; set but empty turns it off
fn log_file_from(value: Option<String>) -> Option<PathBuf> {
    match value {
        None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        Some(v) if v.trim().is_empty() => None,
        Some(v) => Some(PathBuf::from(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> Config {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: "sqlite::memory:".to_string(),
            secret_key: secret.to_string(),
            cookie_secure: false,
            admin_user: "admin".to_string(),
            admin_pass: "s3cret".to_string(),
            admin_mail: "admin@example.org".to_string(),
            log_file: None,
        }
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        assert_eq!(config("k").bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn session_key_is_stable_per_secret() {
        let a = config("short").session_key();
        let b = config("short").session_key();
        let c = config("another secret").session_key();
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let out = format!("{:?}", config("topsecret"));
        assert!(!out.contains("topsecret"));
        assert!(!out.contains("s3cret"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn log_file_defaults_and_can_be_disabled() {
        assert_eq!(log_file_from(None), Some(PathBuf::from("wah.log")));
        assert_eq!(log_file_from(Some(String::new())), None);
        assert_eq!(log_file_from(Some("  ".to_string())), None);
        assert_eq!(
            log_file_from(Some("/var/log/wah/app.log".to_string())),
            Some(PathBuf::from("/var/log/wah/app.log"))
        );
    }
}
