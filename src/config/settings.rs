use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use super::ConfigError;
use crate::utils::{jwt::JwtConfig, password::hash_password};

pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    MySql { database_url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBackend {
    Local { dir: PathBuf },
    Cloudinary(CloudinaryConfig),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub storage: StorageBackend,
    pub jwt: JwtConfig,
    pub admin_password_hash: String,
    pub uploads: UploadBackend,
    pub max_attachment_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = Source { lookup };

        let storage = match source.or_default("STORAGE_BACKEND", "mysql").as_str() {
            "mysql" => StorageBackend::MySql {
                database_url: source.required("DATABASE_URL")?,
            },
            "memory" => {
                warn!("Using in-memory storage, applications are lost on restart");
                StorageBackend::Memory
            }
            other => return Err(invalid("STORAGE_BACKEND", other, "expected mysql or memory")),
        };

        let uploads = match source.or_default("UPLOAD_BACKEND", "local").as_str() {
            "local" => UploadBackend::Local {
                dir: PathBuf::from(source.or_default("UPLOAD_DIR", "./uploads")),
            },
            "cloudinary" => UploadBackend::Cloudinary(CloudinaryConfig {
                cloud_name: source.required("CLOUDINARY_CLOUD_NAME")?,
                api_key: source.required("CLOUDINARY_API_KEY")?,
                api_secret: source.required("CLOUDINARY_API_SECRET")?,
                folder: source.or_default("CLOUDINARY_FOLDER", "recruitment"),
            }),
            other => return Err(invalid("UPLOAD_BACKEND", other, "expected local or cloudinary")),
        };

        let admin_password_hash = match source.get("ADMIN_PASSWORD_HASH") {
            Some(hash) => hash,
            None => {
                let password = source.required("ADMIN_PASSWORD")?;
                warn!("ADMIN_PASSWORD_HASH not set, hashing ADMIN_PASSWORD at startup");
                hash_password(&password)?
            }
        };

        Ok(Self {
            port: source.parsed("APP_PORT", 3000)?,
            cors_origin: source.or_default("CORS_ORIGIN", "http://localhost:5173"),
            storage,
            jwt: JwtConfig {
                secret: source.required("JWT_SECRET")?,
                expiration_secs: source.parsed("JWT_EXPIRATION", 60 * 60 * 8)?,
            },
            admin_password_hash,
            uploads,
            max_attachment_bytes: source
                .parsed("MAX_ATTACHMENT_BYTES", DEFAULT_MAX_ATTACHMENT_BYTES)?,
        })
    }

    /// Body limit for the submit route: four base64-encoded attachments plus
    /// room for the text fields.
    pub fn submit_body_limit(&self) -> usize {
        4 * (self.max_attachment_bytes * 4).div_ceil(3) + 64 * 1024
    }
}

struct Source<F> {
    lookup: F,
}

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| invalid(key, &value, e)),
            None => {
                info!("{key} not set, using default: {default}");
                Ok(default)
            }
        }
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        port: 0,
        cors_origin: "http://localhost:5173".to_string(),
        storage: StorageBackend::Memory,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiration_secs: 3600,
        },
        admin_password_hash: bcrypt::hash("admin123", 4).unwrap(),
        uploads: UploadBackend::Local {
            dir: env::temp_dir().join("recruitment-portal-tests"),
        },
        max_attachment_bytes: 1024,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config = load(&[
            ("DATABASE_URL", "mysql://root@localhost/recruitment"),
            ("JWT_SECRET", "secret"),
            ("ADMIN_PASSWORD_HASH", "$2b$10$abc"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.max_attachment_bytes, DEFAULT_MAX_ATTACHMENT_BYTES);
        assert_eq!(
            config.uploads,
            UploadBackend::Local {
                dir: PathBuf::from("./uploads")
            }
        );
        assert!(matches!(config.storage, StorageBackend::MySql { .. }));
    }

    #[test]
    fn mysql_backend_requires_database_url() {
        let result = load(&[("JWT_SECRET", "secret"), ("ADMIN_PASSWORD_HASH", "x")]);
        assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn plain_admin_password_is_hashed() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("ADMIN_PASSWORD", "admin123"),
        ])
        .unwrap();
        assert!(bcrypt::verify("admin123", &config.admin_password_hash).unwrap());
    }

    #[test]
    fn rejects_unparseable_port() {
        let result = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "secret"),
            ("ADMIN_PASSWORD_HASH", "x"),
            ("APP_PORT", "http"),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "APP_PORT", .. })
        ));
    }

    #[test]
    fn body_limit_covers_four_encoded_attachments() {
        let config = test_config();
        let encoded = (1024usize * 4).div_ceil(3);
        assert_eq!(config.submit_body_limit(), 4 * encoded + 64 * 1024);
    }
}
