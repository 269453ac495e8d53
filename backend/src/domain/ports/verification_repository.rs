//! Port for pending verification storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::auth::{Verification, VerificationType};

use super::define_port_error;

define_port_error! {
    /// Errors raised by verification repository adapters.
    pub enum VerificationRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied detail.
            message: String,
        } => "verification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied detail.
            message: String,
        } => "verification repository query failed: {message}",
    }
}

/// Port for pending verifications keyed by `(link_type, target)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Insert or replace the pending verification for its type and target.
    ///
    /// Adapters may drop other verifications that expired at or before `now`.
    async fn upsert(
        &self,
        verification: &Verification,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationRepositoryError>;

    /// Fetch the pending verification for a type and target, if any.
    async fn find(
        &self,
        link_type: VerificationType,
        target: &str,
    ) -> Result<Option<Verification>, VerificationRepositoryError>;

    /// Remove the pending verification for a type and target.
    async fn delete(
        &self,
        link_type: VerificationType,
        target: &str,
    ) -> Result<(), VerificationRepositoryError>;

    /// Remove the pending verification for its type and target, but only
    /// while it still carries `verification.code`.
    ///
    /// Returns `false` when the entry is gone or was replaced. The check and
    /// the removal must happen as one step so a code is redeemed at most once.
    async fn consume(
        &self,
        verification: &Verification,
    ) -> Result<bool, VerificationRepositoryError>;
}
