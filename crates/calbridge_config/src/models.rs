// --- File: crates/calbridge_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Marker value that asks the loader to pull the real value from a secret env var.
pub const SECRET_MARKER: &str = "secret_from_env";

// --- Google Calendar Config ---
// Holds the credential settings. Secrets may be written as "secret_from_env" and are
// then resolved from CALBRIDGE_SECRET_GCAL_<NAME> or the legacy GCAL_<NAME>.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>, // Secret
    pub refresh_token: Option<String>, // Secret
    pub key_path: Option<String>,      // Service account key file, used when no refresh token is set
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            key_path: None,
            calendar_id: default_calendar_id(),
        }
    }
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

/// Which credential shape a [`GcalConfig`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GcalCredentials {
    /// OAuth2 client plus a long-lived refresh token.
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    /// Path to a service account JSON key.
    ServiceAccount { key_path: String },
}

impl GcalConfig {
    /// Resolves the credentials to use.
    ///
    /// The authorized-user triple wins when all three values are present and non-empty,
    /// otherwise a service account key path is used. The error lists what is missing.
    pub fn credentials(&self) -> Result<GcalCredentials, String> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty() && *s != SECRET_MARKER)
                .map(str::to_string)
        };

        let client_id = present(&self.client_id);
        let client_secret = present(&self.client_secret);
        let refresh_token = present(&self.refresh_token);

        if let (Some(client_id), Some(client_secret), Some(refresh_token)) =
            (client_id.clone(), client_secret.clone(), refresh_token.clone())
        {
            return Ok(GcalCredentials::AuthorizedUser {
                client_id,
                client_secret,
                refresh_token,
            });
        }

        if let Some(key_path) = present(&self.key_path) {
            return Ok(GcalCredentials::ServiceAccount { key_path });
        }

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("gcal.client_id");
        }
        if client_secret.is_none() {
            missing.push("gcal.client_secret");
        }
        if refresh_token.is_none() {
            missing.push("gcal.refresh_token");
        }
        Err(format!(
            "no usable Google credentials: missing {} (or set gcal.key_path)",
            missing.join(", ")
        ))
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String, // trace, debug, info, warn, error
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
