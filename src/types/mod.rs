//! Shared types for the deregistration transaction

mod error;

pub use error::{OfframpError, Result};

use serde::Serialize;

/// Structured result returned to the invoking platform once the transaction
/// is DONE. Operators diagnose failures through the audit stream and the
/// platform's invocation logs, not through this payload.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResult {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn bad_request(body: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            body: body.into(),
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: body.into(),
        }
    }
}
