//! Error types for the deregistration transaction
//!
//! Every failure above notice parsing is caught at the orchestrator boundary
//! and converted into a CONTINUE/ABANDON decision; nothing here propagates
//! past a transaction.

/// Main error type for offramp operations
#[derive(Debug, thiserror::Error)]
pub enum OfframpError {
    /// The inbound envelope could not be parsed into a termination notice.
    /// The single case where no lifecycle signal can be sent: without the
    /// action token there is nothing to signal.
    #[error("Malformed termination notice: {0}")]
    MalformedNotice(String),

    /// The secret store was unreachable or the stored payload was incomplete
    #[error("Credentials unavailable: {0}")]
    CredentialUnavailable(String),

    /// The app private key could not be used to sign the assertion
    #[error("Assertion signing failed: {0}")]
    Signing(String),

    /// Installation-token exchange returned something other than 201
    #[error("Installation token exchange failed (status {status}): {body}")]
    AuthExchange { status: u16, body: String },

    /// Removal-token issuance returned something other than 201
    #[error("Removal token request failed (status {status}): {body}")]
    RemovalToken { status: u16, body: String },

    /// Runner directory listing returned a non-success response
    #[error("Runner directory listing failed (status {status}): {body}")]
    Directory { status: u16, body: String },

    /// Runner deletion returned something other than 204.
    /// Reported but never retried, and never abandons the termination.
    #[error("Runner removal failed with status {status}")]
    RemovalFailed { status: u16 },

    /// Lifecycle completion call failed. Logged only; the transaction has
    /// already reached its terminal point.
    #[error("Lifecycle signal failed: {0}")]
    Signal(String),

    /// Transport-level HTTP failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for OfframpError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for offramp operations
pub type Result<T> = std::result::Result<T, OfframpError>;
