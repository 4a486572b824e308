use thiserror::Error;

pub mod database;
pub mod settings;

pub use settings::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to hash ADMIN_PASSWORD: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}
