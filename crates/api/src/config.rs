use std::str::FromStr;

use axum::http::HeaderValue;

/// Runtime settings, read once at startup from the environment.
///
/// Every setting has a default suited to local development:
///
/// | Variable                | Default                 |
/// |-------------------------|-------------------------|
/// | `HOST`                  | `0.0.0.0`               |
/// | `PORT`                  | `3000`                  |
/// | `CORS_ORIGINS`          | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
/// | `MAX_UPLOAD_BYTES`      | `20971520` (20 MiB)     |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`, parsed into header values up front.
    pub cors_origins: Vec<HeaderValue>,
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after SIGINT/SIGTERM.
    pub shutdown_timeout_secs: u64,
    /// Request body cap. Bounds spreadsheet uploads.
    pub max_upload_bytes: usize,
}

/// A setting that is present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid CORS origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },
}

/// Read `key` and parse it, falling back to `default` when unset.
fn env_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_cors_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidOrigin {
                origin: origin.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_origins = parse_cors_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        )?;

        Ok(Self {
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 3000)?,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn unset_variables_use_defaults() {
        assert_eq!(env_or("SIRPOL_TEST_SURELY_UNSET", 42u16).unwrap(), 42);
    }

    #[test]
    fn unparsable_values_are_reported() {
        std::env::set_var("SIRPOL_TEST_BAD_PORT", "eighty");
        let err = env_or::<u16>("SIRPOL_TEST_BAD_PORT", 80).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { key: "SIRPOL_TEST_BAD_PORT", .. });
    }

    #[test]
    fn origin_list_skips_blanks() {
        let origins = parse_cors_origins(" http://a.test , ,http://b.test").unwrap();
        assert_eq!(origins, ["http://a.test", "http://b.test"]);
    }

    #[test]
    fn origin_with_control_character_is_rejected() {
        let err = parse_cors_origins("http://ok.test,http://bad\n.test").unwrap_err();
        assert_matches!(err, ConfigError::InvalidOrigin { origin, .. } if origin == "http://bad\n.test");
    }
}
