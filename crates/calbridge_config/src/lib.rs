use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Credential paths that may be supplied purely through the environment.
const CREDENTIAL_PATHS: [&str; 4] = [
    "gcal.client_id",
    "gcal.client_secret",
    "gcal.refresh_token",
    "gcal.key_path",
];

/// Loads the configuration relative to the current working directory.
///
/// Sources, lowest priority first: `config/default.*`, `config/{RUN_ENV}.*`, then
/// `CALBRIDGE__*` environment variables. Both files are optional.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let cwd = env::current_dir()
        .map_err(|err| ConfigError::Message(format!("cannot resolve working directory: {err}")))?;
    load_config_from(&cwd)
}

/// Same as [`load_config`] but with an explicit base directory.
pub fn load_config_from(base_dir: &Path) -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = base_dir.join("config/default");
    let env_path = base_dir.join(format!("config/{}", run_env));

    debug!("loading config from {}", base_dir.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(env_vars::CONFIG_SEPARATOR));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Resolves `"secret_from_env"` markers and fills unset credentials from the environment.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("config is not serializable: {err}")))?;
    resolve_env_values(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("config is not deserializable: {err}")))
}

fn resolve_env_values(json: &mut Value) {
    if env_vars::inject_env_vars(json) {
        debug!("resolved secret markers from environment");
    }
    if env_vars::fill_missing_from_env(json, &CREDENTIAL_PATHS) {
        debug!("filled credentials from environment");
    }
}

static INIT_DOTENV: OnceCell<PathBuf> = OnceCell::new();

/// Loads the dotenv file once per process.
///
/// `DOTENV_OVERRIDE` selects the file, otherwise `.env` in the working directory.
/// A missing file is not an error. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> &'static Path {
    INIT_DOTENV.get_or_init(|| {
        let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());
        dotenv::from_filename(&dotenv_path).ok();
        PathBuf::from(dotenv_path)
    })
}
