// --- File: crates/calbridge_common/src/lib.rs ---

pub mod error; // Error taxonomy shared across crates
pub mod logging; // Subscriber setup

pub use error::{auth_error, config_error, CalbridgeError, HttpStatusCode};

pub use logging::{init, init_from_str, init_with_level, log_result};

/// Result alias used throughout calbridge.
pub type Result<T> = std::result::Result<T, CalbridgeError>;
