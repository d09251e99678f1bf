//! Error types for notification delivery.

use thiserror::Error;

/// Result type for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors produced while composing or sending notification mail.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// An address could not be parsed.
    #[error("invalid mail address")]
    Address {
        /// Field holding the offending address.
        field: &'static str,
        /// Underlying parse error.
        source: lettre::address::AddressError,
    },
    /// The message could not be assembled.
    #[error("mail message build failed")]
    Build {
        /// Underlying build error.
        source: lettre::error::Error,
    },
    /// The SMTP transport rejected the message or connection.
    #[error("mail transport failed")]
    Transport {
        /// Underlying transport error.
        source: lettre::transport::smtp::Error,
    },
}

impl NotifyError {
    pub(crate) const fn address(
        field: &'static str,
        source: lettre::address::AddressError,
    ) -> Self {
        Self::Address { field, source }
    }
}
