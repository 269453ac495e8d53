//! Passwordless authentication primitives.
//!
//! Input normalisation for the login form, expiry arithmetic for sessions and
//! verification codes, and magic-link URL construction. Everything here is a
//! pure function of its arguments: callers pass `now` explicitly and perform
//! persistence or delivery themselves.

use std::sync::OnceLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use url::Url;

use super::validation::{ValidationCode, input_length, trim_input, validation_codes};

mod config;
mod verification;

pub use config::{
    AuthConfigError, AuthSettings, BASE_URL_ENV, SESSION_DAYS_ENV, VERIFICATION_MINUTES_ENV,
};
pub use verification::{
    PendingVerification, SessionGrant, Verification, VerificationError, VerificationType,
};

/// Maximum display-name length in UTF-16 code units.
pub const MAX_NAME_LENGTH: usize = 100;
/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;
/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60_000;
/// Path the magic link points at, relative to the application origin.
pub const MAGIC_LINK_CALLBACK_PATH: &str = "/auth/callback";

validation_codes! {
    /// Validation failures raised by the login and profile forms.
    pub enum AuthValidationError {
        /// Email was missing or blank once trimmed.
        EmailEmpty => ("EMAIL_EMPTY", "validation.emailRequired", "email must not be empty"),
        /// Email did not look like `local@domain.tld`.
        EmailInvalid => ("EMAIL_INVALID", "validation.emailInvalid", "email address is not valid"),
        /// Name was missing or blank once trimmed.
        NameEmpty => ("NAME_EMPTY", "validation.nameRequired", "name must not be empty"),
        /// Name exceeded [`MAX_NAME_LENGTH`] characters.
        NameTooLong => ("NAME_TOO_LONG", "validation.nameTooLong", "name must be at most 100 characters"),
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, no whitespace, and a dot somewhere after the `@`.
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Trim and lowercase an email address, then check its shape.
///
/// # Examples
/// ```
/// use backend::domain::auth::{AuthValidationError, validate_email};
///
/// assert_eq!(validate_email("  Alice@Example.COM ").as_deref(), Ok("alice@example.com"));
/// assert_eq!(validate_email("   "), Err(AuthValidationError::EmailEmpty));
/// assert_eq!(validate_email("alice@example"), Err(AuthValidationError::EmailInvalid));
/// ```
pub fn validate_email(raw: &str) -> Result<String, AuthValidationError> {
    let normalized = trim_input(raw).to_lowercase();
    if normalized.is_empty() {
        return Err(AuthValidationError::EmailEmpty);
    }
    if !email_regex().is_match(&normalized) {
        return Err(AuthValidationError::EmailInvalid);
    }
    Ok(normalized)
}

/// Trim a display name and enforce its length bounds. Case is preserved.
pub fn validate_name(raw: &str) -> Result<String, AuthValidationError> {
    let trimmed = trim_input(raw);
    if trimmed.is_empty() {
        return Err(AuthValidationError::NameEmpty);
    }
    if input_length(trimmed) > MAX_NAME_LENGTH {
        return Err(AuthValidationError::NameTooLong);
    }
    Ok(trimmed.to_owned())
}

/// Whether `expires_at` is at or before `now`.
///
/// An expiry equal to `now` already counts as expired.
#[must_use]
pub fn is_session_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at <= now
}

/// Session expiry `days_from_now` whole days after `now`.
///
/// Plain millisecond arithmetic: no calendar or daylight-saving adjustment.
#[must_use]
pub fn compute_session_expiry(days_from_now: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    offset_by_millis(now, days_from_now.saturating_mul(MS_PER_DAY))
}

/// Verification-code expiry `minutes_from_now` minutes after `now`.
#[must_use]
pub fn compute_verification_expiry(minutes_from_now: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    offset_by_millis(now, minutes_from_now.saturating_mul(MS_PER_MINUTE))
}

fn offset_by_millis(now: DateTime<Utc>, millis: i64) -> DateTime<Utc> {
    let saturated = if millis.is_negative() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(saturated)
}

/// Inputs for [`build_magic_link_url`].
#[derive(Debug, Clone, Copy)]
pub struct MagicLinkParams<'a> {
    /// Application origin; its path, query and fragment are replaced.
    pub base_url: &'a Url,
    /// Verification type, for example `login`.
    pub link_type: &'a str,
    /// Address the link was sent to.
    pub target: &'a str,
    /// One-time verification code.
    pub code: &'a str,
}

/// Build the callback URL embedded in a magic-link message.
///
/// Query parameters are always emitted in the order `type`, `target`, `code`
/// and are form-urlencoded.
///
/// # Examples
/// ```
/// use backend::domain::auth::{MagicLinkParams, build_magic_link_url};
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// let link = build_magic_link_url(&MagicLinkParams {
///     base_url: &base,
///     link_type: "login",
///     target: "alice@example.com",
///     code: "ABC123",
/// });
/// assert_eq!(
///     link,
///     "https://example.com/auth/callback?type=login&target=alice%40example.com&code=ABC123"
/// );
/// ```
#[must_use]
pub fn build_magic_link_url(params: &MagicLinkParams<'_>) -> String {
    let mut url = params.base_url.clone();
    url.set_path(MAGIC_LINK_CALLBACK_PATH);
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair("type", params.link_type)
        .append_pair("target", params.target)
        .append_pair("code", params.code);
    url.into()
}

/// Display-message key for an auth validation failure.
#[must_use]
pub fn auth_validation_error_to_i18n_key(error: AuthValidationError) -> &'static str {
    error.i18n_key()
}

/// Whether `value` is exactly one of the auth validation wire codes.
#[must_use]
pub fn is_auth_validation_error(value: &str) -> bool {
    AuthValidationError::is_known_code(value)
}
