//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the user's configuration
//! directory (or at `$SUPPORT_CONFIG`) and includes:
//! - The base URL of the ENT platform
//! - The session cookie used to authenticate against it
//! - The signed-in user's context (administered schools, apps, schools)

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SupportError};
use crate::user::UserContext;

pub const CONFIG_PATH_ENV: &str = "SUPPORT_CONFIG";
pub const BASE_URL_ENV: &str = "SUPPORT_BASE_URL";
pub const SESSION_ENV: &str = "SUPPORT_SESSION";

pub const CONFIG_KEYS: &[&str] = &[
    "base_url",
    "auth.session",
    "locale",
    "connect_timeout",
    "user.id",
    "user.username",
    "user.admin_schools",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the platform, e.g. `https://ent.example.org`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Preferred locale sent as `Accept-Language`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Current user context
    #[serde(default)]
    pub user: UserContext,

    /// Connection timeout in seconds (default: 30)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            auth: AuthConfig::default(),
            locale: None,
            user: UserContext::default(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionAuth>,
}

/// Session cookie of an authenticated platform user
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionAuth {
    pub cookie: String,
}

impl fmt::Debug for SessionAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAuth")
            .field("cookie", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let dirs = directories::ProjectDirs::from("net", "entcore", "ent-support").ok_or_else(
            || SupportError::Config("could not determine the configuration directory".to_string()),
        )?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            SupportError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SupportError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            SupportError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // The file holds a session cookie: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)?;
        }

        Ok(())
    }

    /// Get the platform base URL from environment variable or config
    pub fn base_url(&self) -> Option<String> {
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            return Some(url);
        }

        self.base_url.clone()
    }

    /// Get the session cookie from environment variable or config
    pub fn session_cookie(&self) -> Option<String> {
        if let Ok(cookie) = env::var(SESSION_ENV)
            && !cookie.is_empty()
        {
            return Some(cookie);
        }

        self.auth.session.as_ref().map(|s| s.cookie.clone())
    }

    pub fn set_session_cookie(&mut self, cookie: String) {
        self.auth.session = Some(SessionAuth { cookie });
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Get a configuration value by key. Secrets are masked.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "base_url" => self.base_url(),
            "auth.session" => self.session_cookie().map(|c| mask_secret(&c)),
            "locale" => self.locale.clone(),
            "connect_timeout" => Some(self.connect_timeout.to_string()),
            "user.id" => non_empty(&self.user.id),
            "user.username" => non_empty(&self.user.username),
            "user.admin_schools" => {
                if self.user.admin_schools.is_empty() {
                    None
                } else {
                    Some(self.user.admin_schools.join(","))
                }
            }
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                url::Url::parse(value)?;
                self.base_url = Some(value.trim_end_matches('/').to_string());
            }
            "auth.session" => self.set_session_cookie(value.to_string()),
            "locale" => self.locale = Some(value.to_string()),
            "connect_timeout" => {
                self.connect_timeout = value.parse().map_err(|_| {
                    SupportError::Config(format!(
                        "connect_timeout must be a number of seconds, got '{value}'"
                    ))
                })?;
            }
            "user.id" => self.user.id = value.to_string(),
            "user.username" => self.user.username = value.to_string(),
            "user.admin_schools" => {
                self.user.admin_schools = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn unknown_key(key: &str) -> SupportError {
    SupportError::Config(format!(
        "unknown key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

/// Mask all but the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
