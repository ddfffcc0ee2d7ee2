// File: crates/calbridge_gcal/src/auth.rs
use calbridge_common::{auth_error, config_error, Result};
use calbridge_config::{GcalConfig, GcalCredentials};
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{
        authorized_user::AuthorizedUserSecret, read_service_account_key,
        AuthorizedUserAuthenticator, ServiceAccountAuthenticator,
    },
    CalendarHub,
};
use std::path::Path;
use tracing::{debug, info};

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Builds an authorized hub from the configured credentials.
///
/// A refresh token (authorized user) takes precedence over a service account key.
/// Tokens are fetched lazily, so bad credentials that are well-formed only surface on
/// the first call as `AuthFailure`.
pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType> {
    let credentials = config.credentials().map_err(config_error)?;

    let auth = match credentials {
        GcalCredentials::AuthorizedUser {
            client_id,
            client_secret,
            refresh_token,
        } => {
            debug!("Using authorized user credentials for client {}", client_id);
            let secret = AuthorizedUserSecret {
                client_id,
                client_secret,
                refresh_token,
                key_type: "authorized_user".to_string(),
            };
            AuthorizedUserAuthenticator::builder(secret)
                .build()
                .await
                .map_err(auth_error)?
        }
        GcalCredentials::ServiceAccount { key_path } => {
            debug!("Using service account key at {}", key_path);
            let sa_key = read_service_account_key(Path::new(&key_path))
                .await
                .map_err(|e| config_error(format!("cannot read key file {}: {}", key_path, e)))?;
            ServiceAccountAuthenticator::builder(sa_key)
                .build()
                .await
                .map_err(auth_error)?
        }
    };

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| config_error(format!("cannot load native TLS roots: {}", e)))?
        .https_or_http()
        .enable_http1()
        .build();

    // Create client without specifying body type
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    info!("Google Calendar hub ready");
    Ok(CalendarHub::new(client, auth))
}
