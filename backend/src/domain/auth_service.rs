//! Passwordless login service.
//!
//! Issues magic links and redeems the codes they carry. A successful
//! redemption yields a [`SessionGrant`]; persisting it as a cookie or session
//! row is the job of whatever transport sits in front of this service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::Error;
use crate::domain::auth::{
    AuthSettings, MagicLinkParams, PendingVerification, SessionGrant, Verification,
    VerificationError, VerificationType, build_magic_link_url, compute_session_expiry,
    compute_verification_expiry, is_session_expired, validate_email,
};
use crate::domain::ports::{
    MagicLinkDeliveryError, MagicLinkMessage, MagicLinkSender, VerificationCodeGenerator,
    VerificationRepository, VerificationRepositoryError,
};
use crate::domain::validation::trim_input;

/// Magic-link service over a verification store, a message sender and a code
/// source.
#[derive(Clone)]
pub struct AuthService<V, S, G> {
    verifications: Arc<V>,
    sender: Arc<S>,
    codes: Arc<G>,
    clock: Arc<dyn Clock>,
    settings: AuthSettings,
}

impl<V, S, G> AuthService<V, S, G> {
    /// Create a new service.
    #[must_use]
    pub const fn new(
        verifications: Arc<V>,
        sender: Arc<S>,
        codes: Arc<G>,
        clock: Arc<dyn Clock>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            verifications,
            sender,
            codes,
            clock,
            settings,
        }
    }

    /// Whether a session expiring at `expires_at` is still usable now.
    #[must_use]
    pub fn is_session_active(&self, expires_at: DateTime<Utc>) -> bool {
        !is_session_expired(expires_at, self.clock.utc())
    }
}

impl<V, S, G> AuthService<V, S, G>
where
    V: VerificationRepository,
    S: MagicLinkSender,
    G: VerificationCodeGenerator,
{
    fn map_repository_error(error: VerificationRepositoryError) -> Error {
        match error {
            VerificationRepositoryError::Connection { message } => Error::service_unavailable(
                format!("verification repository unavailable: {message}"),
            ),
            VerificationRepositoryError::Query { message } => {
                Error::internal(format!("verification repository error: {message}"))
            }
        }
    }

    fn map_delivery_error(error: MagicLinkDeliveryError) -> Error {
        match error {
            MagicLinkDeliveryError::Unavailable { message } => {
                Error::service_unavailable(format!("magic link delivery unavailable: {message}"))
            }
            MagicLinkDeliveryError::Rejected { message } => {
                Error::invalid_request(format!("magic link delivery rejected: {message}"))
            }
        }
    }

    /// Validate `raw_email`, send a magic link with a fresh login code and
    /// store that code once the link is on its way.
    ///
    /// Any code previously issued to the same address stops working. When
    /// delivery fails the previous code is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` error carrying the validation code when
    /// the address is rejected, and maps storage or delivery failures to
    /// `ServiceUnavailable` or `InternalError`.
    pub async fn send_magic_link(&self, raw_email: &str) -> Result<PendingVerification, Error> {
        let target = validate_email(raw_email).map_err(Error::validation)?;
        let now = self.clock.utc();
        let verification = Verification {
            link_type: VerificationType::Login,
            target,
            code: self.codes.generate(),
            expires_at: compute_verification_expiry(self.settings.verification_minutes(), now),
        };

        let url = build_magic_link_url(&MagicLinkParams {
            base_url: self.settings.base_url(),
            link_type: verification.link_type.as_str(),
            target: &verification.target,
            code: &verification.code,
        });
        let message = MagicLinkMessage {
            target: verification.target.clone(),
            code: verification.code.clone(),
            url,
        };
        self.sender
            .send(&message)
            .await
            .map_err(Self::map_delivery_error)?;

        self.verifications
            .upsert(&verification, now)
            .await
            .map_err(Self::map_repository_error)?;

        info!(
            email = %verification.target,
            expires_at = %verification.expires_at,
            "magic link sent"
        );
        Ok(PendingVerification {
            link_type: verification.link_type,
            target: verification.target,
            expires_at: verification.expires_at,
        })
    }

    /// Redeem a code sent to `target`.
    ///
    /// The code is compared case-insensitively after trimming. A redeemed or
    /// expired verification is removed; a wrong code leaves it in place. Of
    /// two concurrent redemptions of the same code, only one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::InvalidCode`] when nothing is pending for
    /// the target or the code does not match, and
    /// [`VerificationError::CodeExpired`] when the pending code has expired.
    pub async fn verify_code(
        &self,
        link_type: VerificationType,
        target: &str,
        code: &str,
    ) -> Result<SessionGrant, Error> {
        let target = trim_input(target).to_lowercase();
        let Some(pending) = self
            .verifications
            .find(link_type, &target)
            .await
            .map_err(Self::map_repository_error)?
        else {
            debug!(email = %target, "no pending verification");
            return Err(Error::validation(VerificationError::InvalidCode));
        };

        let now = self.clock.utc();
        if is_session_expired(pending.expires_at, now) {
            self.verifications
                .delete(link_type, &target)
                .await
                .map_err(Self::map_repository_error)?;
            warn!(email = %target, expired_at = %pending.expires_at, "verification code expired");
            return Err(Error::validation(VerificationError::CodeExpired));
        }

        if pending.code != trim_input(code).to_uppercase() {
            debug!(email = %target, "verification code mismatch");
            return Err(Error::validation(VerificationError::InvalidCode));
        }

        let consumed = self
            .verifications
            .consume(&pending)
            .await
            .map_err(Self::map_repository_error)?;
        if !consumed {
            debug!(email = %target, "verification already redeemed or replaced");
            return Err(Error::validation(VerificationError::InvalidCode));
        }

        let grant = SessionGrant {
            email: pending.target,
            expires_at: compute_session_expiry(self.settings.session_days(), now),
        };
        info!(email = %grant.email, expires_at = %grant.expires_at, "verification redeemed");
        Ok(grant)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
