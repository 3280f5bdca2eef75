//! Server configuration loaded from `CONTACTS_*` environment variables.

use contacts_core::{
    default_log_level, DbLocation, FieldLimits, SanitizePolicy, StoreConfig, EMAIL_FIELD_SIZE,
    NAME_FIELD_SIZE,
};
use std::env;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:5001";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug)]
pub enum ConfigError {
    InvalidBind { value: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBind { value, reason } => {
                write!(f, "invalid CONTACTS_BIND `{value}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub store: StoreConfig,
    pub static_dir: PathBuf,
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr when `None`.
    pub log_dir: Option<String>,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("CONTACTS_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBind {
                value: bind_raw.clone(),
                reason: err.to_string(),
            })?;

        let db = lookup("CONTACTS_DB_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(|value| DbLocation::parse(&value))
            .unwrap_or_default();

        let store = StoreConfig {
            db,
            limits: FieldLimits {
                name_max_chars: env_usize(&lookup, "CONTACTS_NAME_MAX_CHARS", NAME_FIELD_SIZE),
                email_max_chars: env_usize(&lookup, "CONTACTS_EMAIL_MAX_CHARS", EMAIL_FIELD_SIZE),
            },
            sanitize: SanitizePolicy {
                denylist: env_bool(&lookup, "CONTACTS_SQL_DENYLIST", true),
            },
        };

        Ok(Self {
            bind,
            store,
            static_dir: lookup("CONTACTS_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            log_level: lookup("CONTACTS_LOG_LEVEL")
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: lookup("CONTACTS_LOG_DIR").filter(|value| !value.trim().is_empty()),
            max_body_bytes: env_usize(&lookup, "CONTACTS_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
        })
    }
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    lookup(name)
        .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_usize(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: usize) -> usize {
    lookup(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig, DEFAULT_MAX_BODY_BYTES};
    use contacts_core::DbLocation;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind.port(), 5001);
        assert_eq!(config.store.db, DbLocation::File(PathBuf::from("contacts.db")));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.store.limits.name_max_chars, 50);
        assert_eq!(config.store.limits.email_max_chars, 120);
        assert!(config.store.sanitize.denylist);
        assert!(config.log_dir.is_none());
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn overrides_are_parsed_and_garbage_falls_back() {
        let config = config_from(&[
            ("CONTACTS_BIND", "127.0.0.1:8080"),
            ("CONTACTS_DB_PATH", ":memory:"),
            ("CONTACTS_SQL_DENYLIST", "off"),
            ("CONTACTS_NAME_MAX_CHARS", "80"),
            ("CONTACTS_EMAIL_MAX_CHARS", "not-a-number"),
        ])
        .unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:8080");
        assert_eq!(config.store.db, DbLocation::InMemory);
        assert!(!config.store.sanitize.denylist);
        assert_eq!(config.store.limits.name_max_chars, 80);
        assert_eq!(config.store.limits.email_max_chars, 120);
    }

    #[test]
    fn invalid_bind_is_an_error() {
        let err = config_from(&[("CONTACTS_BIND", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("CONTACTS_BIND"));
    }
}
