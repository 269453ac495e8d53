//! Pending verifications and the session grants they turn into.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::validation::validation_codes;

/// Why a magic link or code was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationType {
    /// Sign in with an emailed link or code.
    #[default]
    Login,
}

impl VerificationType {
    /// Name carried in the `type` query parameter and hidden form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
        }
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

validation_codes! {
    /// Failures raised while redeeming a verification code.
    pub enum VerificationError {
        /// No pending verification matches the target and code.
        InvalidCode => ("INVALID_CODE", "validation.invalidCode", "verification code is not valid"),
        /// The pending verification was found but has expired.
        CodeExpired => ("CODE_EXPIRED", "validation.codeExpired", "verification code has expired"),
    }
}

/// A verification waiting to be redeemed.
///
/// At most one is pending per `(link_type, target)` pair; issuing a new one
/// replaces the previous code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Why the code was issued.
    pub link_type: VerificationType,
    /// Normalised email address the code was sent to.
    pub target: String,
    /// One-time code, uppercase.
    pub code: String,
    /// Instant after which the code is rejected.
    pub expires_at: DateTime<Utc>,
}

/// What the caller learns after a magic link has been sent.
///
/// The code itself is deliberately absent; it only travels in the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerification {
    /// Why the code was issued.
    pub link_type: VerificationType,
    /// Normalised email address the code was sent to.
    pub target: String,
    /// Instant after which the code is rejected.
    pub expires_at: DateTime<Utc>,
}

/// A successfully verified identity, ready for the session transport to
/// persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    /// Verified, normalised email address.
    pub email: String,
    /// When the session must be considered expired.
    pub expires_at: DateTime<Utc>,
}
