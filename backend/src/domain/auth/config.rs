//! Environment-driven settings for magic-link authentication.

use mockable::Env;
use url::Url;

/// Environment variable holding the public origin used in magic links.
pub const BASE_URL_ENV: &str = "APP_BASE_URL";
/// Environment variable holding the session lifetime in days.
pub const SESSION_DAYS_ENV: &str = "SESSION_DURATION_DAYS";
/// Environment variable holding the verification-code lifetime in minutes.
pub const VERIFICATION_MINUTES_ENV: &str = "VERIFICATION_CODE_MINUTES";

const DEFAULT_BASE_URL: &str = "http://localhost:5173";
const DEFAULT_SESSION_DAYS: i64 = 30;
const DEFAULT_VERIFICATION_MINUTES: i64 = 10;
const POSITIVE_INTEGER_EXPECTED: &str = "a positive integer";

/// Errors raised while validating authentication settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthConfigError {
    /// The base URL did not parse.
    #[error("invalid value for {name}='{value}': {reason}")]
    InvalidBaseUrl {
        /// Variable that was read.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The base URL parsed but cannot carry a path, for example `mailto:`.
    #[error("{name}='{value}' must be an http(s) origin")]
    OpaqueBaseUrl {
        /// Variable that was read.
        name: &'static str,
        /// Raw value.
        value: String,
    },
    /// A duration was not a positive integer.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidDuration {
        /// Variable that was read.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Description of accepted values.
        expected: &'static str,
    },
}

/// Settings consumed by [`crate::domain::AuthService`].
///
/// # Examples
/// ```
/// use backend::domain::auth::AuthSettings;
///
/// let settings = AuthSettings::default();
/// assert_eq!(settings.base_url().as_str(), "http://localhost:5173/");
/// assert_eq!(settings.session_days(), 30);
/// assert_eq!(settings.verification_minutes(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    base_url: Url,
    session_days: i64,
    verification_minutes: i64,
}

impl AuthSettings {
    /// Build settings from already validated parts.
    #[must_use]
    pub const fn new(base_url: Url, session_days: i64, verification_minutes: i64) -> Self {
        Self {
            base_url,
            session_days,
            verification_minutes,
        }
    }

    /// Load settings from the real process environment.
    pub fn from_env() -> Result<Self, AuthConfigError> {
        Self::from_env_with(&mockable::DefaultEnv::new())
    }

    /// Load settings from a custom environment source.
    ///
    /// Missing variables fall back to defaults; present but invalid values
    /// are reported rather than ignored.
    pub fn from_env_with<E: Env>(env: &E) -> Result<Self, AuthConfigError> {
        let base_url = match env.string(BASE_URL_ENV) {
            Some(raw) => parse_base_url(&raw)?,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };
        let session_days = positive_integer(env, SESSION_DAYS_ENV, DEFAULT_SESSION_DAYS)?;
        let verification_minutes = positive_integer(
            env,
            VERIFICATION_MINUTES_ENV,
            DEFAULT_VERIFICATION_MINUTES,
        )?;
        Ok(Self::new(base_url, session_days, verification_minutes))
    }

    /// Origin magic links point back to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Session lifetime in days.
    #[must_use]
    pub const fn session_days(&self) -> i64 {
        self.session_days
    }

    /// Verification-code lifetime in minutes.
    #[must_use]
    pub const fn verification_minutes(&self) -> i64 {
        self.verification_minutes
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        match parse_base_url(DEFAULT_BASE_URL) {
            Ok(base_url) => Self::new(base_url, DEFAULT_SESSION_DAYS, DEFAULT_VERIFICATION_MINUTES),
            Err(err) => panic!("default base url must parse: {err}"),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AuthConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| AuthConfigError::InvalidBaseUrl {
        name: BASE_URL_ENV,
        value: raw.to_owned(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(AuthConfigError::OpaqueBaseUrl {
            name: BASE_URL_ENV,
            value: raw.to_owned(),
        });
    }
    Ok(url)
}

fn positive_integer<E: Env>(
    env: &E,
    name: &'static str,
    default: i64,
) -> Result<i64, AuthConfigError> {
    let Some(raw) = env.string(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AuthConfigError::InvalidDuration {
            name,
            value: raw,
            expected: POSITIVE_INTEGER_EXPECTED,
        }),
    }
}
