use std::env;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection settings of the Firebase project holding history and favorites.
#[derive(Clone)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub database_url: String,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
    /// Sent as `?auth=` on every database request
    pub auth_token: Option<String>,
}

impl FirebaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let database_url = required("FIREBASE_DATABASE_URL")?;
        if !(database_url.starts_with("https://") || database_url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                name: "FIREBASE_DATABASE_URL",
                reason: format!("{database_url:?} is not an http(s) url"),
            });
        }

        Ok(Self {
            api_key: required("FIREBASE_API_KEY")?,
            auth_domain: optional("FIREBASE_AUTH_DOMAIN"),
            project_id: optional("FIREBASE_PROJECT_ID"),
            database_url,
            storage_bucket: optional("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: optional("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: optional("FIREBASE_APP_ID"),
            measurement_id: optional("FIREBASE_MEASUREMENT_ID"),
            auth_token: optional("FIREBASE_AUTH_TOKEN"),
        })
    }
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &REDACTED)
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("database_url", &self.database_url)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("app_id", &self.app_id)
            .field("measurement_id", &self.measurement_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| REDACTED))
            .finish()
    }
}

pub struct Config {
    /// `None` keeps history and favorites in memory
    pub firebase: Option<FirebaseConfig>,
    pub dictionary_url: Option<String>,
}

impl Config {
    pub fn load(memory_store: bool) -> Result<Self, ConfigError> {
        let firebase = if memory_store {
            None
        } else {
            Some(FirebaseConfig::from_env()?)
        };
        let dictionary_url = env::var("DICTIONARY_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        Ok(Config {
            firebase,
            dictionary_url,
        })
    }
}
