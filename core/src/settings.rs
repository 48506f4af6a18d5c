//! Fixture configuration read from the environment (and `.env`, if present).

use std::path::PathBuf;
use std::time::Duration;

use dotenv::dotenv;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub email: String,
    pub password: String,
    pub images_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Load from `PETFRIENDS_*` variables after applying `.env`.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// Credentials are required; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Configuration(format!("{name} must be set")))
        };

        let timeout = match lookup("PETFRIENDS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ApiError::Configuration(format!(
                        "PETFRIENDS_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            base_url: lookup("PETFRIENDS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            email: required("PETFRIENDS_EMAIL")?,
            password: required("PETFRIENDS_PASSWORD")?,
            images_dir: lookup("PETFRIENDS_IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("images")),
            timeout,
        })
    }

    pub fn image(&self, file_name: &str) -> PathBuf {
        self.images_dir.join(file_name)
    }
}
