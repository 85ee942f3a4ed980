//! Audit Sink
//!
//! Append-only status events for one instance's deregistration, keyed by
//! `{instance_id}/deregistration`, for post-hoc traceability. A side channel:
//! the orchestrator swallows every sink failure, so nothing here can change
//! the signaling outcome.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::types::{OfframpError, Result};

/// Status transitions within one deregistration transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Started,
    Success,
    Failed,
    NotFound,
    Completed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "STARTED",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::Completed => "COMPLETED",
        }
    }
}

/// One appended status event
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub instance_id: String,
    pub status: AuditStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(instance_id: impl Into<String>, status: AuditStatus, message: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            status,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Stream key for this instance's deregistration events
    pub fn stream_name(&self) -> String {
        format!("{}/deregistration", self.instance_id)
    }

    /// Rendered log line: `<rfc3339>: [LIFECYCLE_HOOK] [<STATUS>] <message>`
    pub fn render(&self) -> String {
        format!(
            "{}: [LIFECYCLE_HOOK] [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.status.as_str(),
            self.message
        )
    }
}

/// Capability interface for audit appends (allows test doubles)
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one event to the instance's stream
    async fn append(&self, event: &AuditEvent) -> Result<()>;
}

#[derive(Serialize)]
struct PutEventsBody<'a> {
    #[serde(rename = "logGroupName")]
    log_group_name: &'a str,
    #[serde(rename = "logStreamName")]
    log_stream_name: String,
    #[serde(rename = "logEvents")]
    log_events: Vec<LogEvent>,
}

#[derive(Serialize)]
struct LogEvent {
    timestamp: i64,
    message: String,
}

/// Audit sink posting one JSON body per event to a log ingestion endpoint.
/// Sequencing and idempotency are the destination's concern, not the core's.
pub struct HttpAuditSink {
    http: reqwest::Client,
    endpoint: String,
    log_group: String,
}

impl HttpAuditSink {
    pub fn new(http: reqwest::Client, endpoint: String, log_group: String) -> Self {
        Self {
            http,
            endpoint,
            log_group,
        }
    }
}

#[async_trait::async_trait]
impl AuditSink for HttpAuditSink {
    async fn append(&self, event: &AuditEvent) -> Result<()> {
        let body = PutEventsBody {
            log_group_name: &self.log_group,
            log_stream_name: event.stream_name(),
            log_events: vec![LogEvent {
                timestamp: event.timestamp.timestamp_millis(),
                message: event.render(),
            }],
        };

        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OfframpError::Http(format!(
                "audit destination returned status {}",
                status.as_u16()
            )));
        }

        debug!(stream = %event.stream_name(), status = event.status.as_str(), "audit event appended");
        Ok(())
    }
}

/// No-op sink used when no audit destination is configured
pub struct NullAuditSink;

#[async_trait::async_trait]
impl AuditSink for NullAuditSink {
    async fn append(&self, _event: &AuditEvent) -> Result<()> {
        Ok(())
    }
}
