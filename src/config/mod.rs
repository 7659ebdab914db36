use std::env;

use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "https://api.instantly.ai/api/v2";
const DEFAULT_CAMPAIGN_ID: &str = "bfe30fd9-3417-410f-800b-7b8e7151a965";
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "changeme";
const DEFAULT_PORT: u16 = 5001;

/// Keywords that mark a lead's company as a clinic.
pub const DEFAULT_CLINIC_KEYWORDS: &[&str] = &[
    "clinic",
    "medicine",
    "wellness",
    "health",
    "naturopathic",
    "integrative",
    "holistic",
    "doctor",
    "dr.",
    "medical",
];

/// Startup configuration failures. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("DASHBOARD_USERNAME and DASHBOARD_PASSWORD must be set when APP_ENV=production")]
    DefaultCredentials,
}

/// Deployment environment, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Basic Auth credentials for the single dashboard operator.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// True when either value fell back to the built-in default.
    pub is_default: bool,
}

// Keep the password out of Debug output (AppConfig is logged at startup).
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("is_default", &self.is_default)
            .finish()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    pub instantly_api_key: String,
    pub instantly_base_url: String,
    pub campaign_id: Uuid,
    pub credentials: Credentials,
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub clinic_keywords: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("instantly_api_key", &"<redacted>")
            .field("instantly_base_url", &self.instantly_base_url)
            .field("campaign_id", &self.campaign_id)
            .field("credentials", &self.credentials)
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("clinic_keywords", &self.clinic_keywords)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let instantly_api_key =
            get("INSTANTLY_API_KEY").ok_or(ConfigError::Missing("INSTANTLY_API_KEY"))?;

        let instantly_base_url = get("INSTANTLY_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let campaign_id = get("INSTANTLY_CAMPAIGN_ID")
            .unwrap_or_else(|| DEFAULT_CAMPAIGN_ID.to_string());
        let campaign_id = Uuid::parse_str(&campaign_id).map_err(|e| ConfigError::Invalid {
            var: "INSTANTLY_CAMPAIGN_ID",
            reason: e.to_string(),
        })?;

        let environment = match get("APP_ENV").as_deref().map(str::to_ascii_lowercase) {
            None => Environment::Development,
            Some(v) if v == "development" || v == "dev" => Environment::Development,
            Some(v) if v == "production" || v == "prod" => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "APP_ENV",
                    reason: format!("expected development or production, got {other}"),
                })
            }
        };

        let username = get("DASHBOARD_USERNAME");
        let password = get("DASHBOARD_PASSWORD");
        let is_default = username.is_none() || password.is_none();
        if is_default && environment == Environment::Production {
            return Err(ConfigError::DefaultCredentials);
        }
        let credentials = Credentials {
            username: username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: password.unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            is_default,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                reason: format!("{raw} is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        let clinic_keywords = match get("CLINIC_KEYWORDS") {
            Some(raw) => raw
                .split(',')
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            None => DEFAULT_CLINIC_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        };

        Ok(Self {
            instantly_api_key,
            instantly_base_url,
            campaign_id,
            credentials,
            environment,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            clinic_keywords,
        })
    }
}
