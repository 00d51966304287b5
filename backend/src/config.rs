//! # Server Configuration
//!
//! Loaded from environment variables and validated on startup to fail fast if
//! misconfigured.
//!
//! | variable | default |
//! |---|---|
//! | `BIND_HOST` | `0.0.0.0` |
//! | `PORT` | `5000` |
//! | `SESSION_TTL_HOURS` | `24` |
//! | `CORS_ORIGINS` | local dev origins on ports 3000 and 5173 |
//! | `ADMIN_USERNAME` / `ADMIN_PASSWORD` / `ADMIN_EMAIL` | unset (no seeded superadmin) |

use lib_utils::{get_env, get_env_or, get_env_parse_or};

pub const DEFAULT_PORT: u16 = 5000;

/// Credentials of the superadmin created at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Session validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub session_ttl_hours: i64,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
    pub seed_admin: Option<SeedAdmin>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            session_ttl_hours: 24,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            seed_admin: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let port = get_env_parse_or("PORT", defaults.port).map_err(|e| e.to_string())?;
        let session_ttl_hours =
            get_env_parse_or("SESSION_TTL_HOURS", defaults.session_ttl_hours).map_err(|e| e.to_string())?;

        let allowed_origins = match get_env("CORS_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.allowed_origins,
        };

        let seed_admin = match (get_env("ADMIN_USERNAME"), get_env("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(SeedAdmin {
                email: get_env_or("ADMIN_EMAIL", &format!("{}@localhost.localdomain", username)),
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host: get_env_or("BIND_HOST", &defaults.host),
            port,
            session_ttl_hours,
            allowed_origins,
            seed_admin,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        if self.session_ttl_hours < 1 || self.session_ttl_hours > 720 {
            return Err("SESSION_TTL_HOURS must be between 1 and 720 (30 days)".to_string());
        }

        if let Some(admin) = &self.seed_admin {
            if admin.password.chars().count() < lib_auth::pwd::MIN_PASSWORD_LEN {
                return Err("ADMIN_PASSWORD must be at least 8 characters long".to_string());
            }
        }

        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
