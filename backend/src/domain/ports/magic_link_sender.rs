//! Port for delivering magic-link messages.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by message delivery adapters.
    pub enum MagicLinkDeliveryError {
        /// The delivery backend could not be reached.
        Unavailable {
            /// Adapter-supplied detail.
            message: String,
        } => "magic link delivery unavailable: {message}",
        /// The backend refused the message.
        Rejected {
            /// Adapter-supplied detail.
            message: String,
        } => "magic link delivery rejected: {message}",
    }
}

/// Content of one magic-link message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicLinkMessage {
    /// Recipient address.
    pub target: String,
    /// Code the recipient may type instead of following the link.
    pub code: String,
    /// Callback URL carrying the same code.
    pub url: String,
}

/// Port for sending magic links to users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MagicLinkSender: Send + Sync {
    /// Deliver `message` to its target.
    async fn send(&self, message: &MagicLinkMessage) -> Result<(), MagicLinkDeliveryError>;
}
