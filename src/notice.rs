//! Inbound termination notice
//!
//! The fleet manager delivers lifecycle-hook notifications through a
//! pub/sub envelope: the outer document carries a `Records` array whose
//! first entry wraps the actual hook payload as a JSON string. The notice
//! is parsed exactly once per invocation; everything downstream works from
//! the immutable [`TerminationNotice`].

use serde::Deserialize;

use crate::types::{OfframpError, Result};

/// One instance's suspended termination, as announced by the lifecycle hook
#[derive(Debug, Clone, Deserialize)]
pub struct TerminationNotice {
    #[serde(rename = "EC2InstanceId")]
    pub instance_id: String,
    #[serde(rename = "LifecycleHookName")]
    pub lifecycle_hook_name: String,
    #[serde(rename = "AutoScalingGroupName")]
    pub auto_scaling_group_name: String,
    #[serde(rename = "LifecycleActionToken")]
    pub lifecycle_action_token: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Records")]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(rename = "Sns")]
    sns: SnsRecord,
}

#[derive(Debug, Deserialize)]
struct SnsRecord {
    #[serde(rename = "Message")]
    message: String,
}

/// Parse the raw notification envelope into a [`TerminationNotice`].
///
/// All four fields must be present and non-empty; anything less is a
/// malformed notice and the transaction cannot proceed (there is no action
/// token to signal against).
pub fn parse_notice(raw: &str) -> Result<TerminationNotice> {
    let envelope: Envelope = serde_json::from_str(raw)
        .map_err(|e| OfframpError::MalformedNotice(format!("invalid envelope: {}", e)))?;

    let record = envelope
        .records
        .first()
        .ok_or_else(|| OfframpError::MalformedNotice("envelope has no records".into()))?;

    let notice: TerminationNotice = serde_json::from_str(&record.sns.message)
        .map_err(|e| OfframpError::MalformedNotice(format!("invalid hook payload: {}", e)))?;

    for (field, value) in [
        ("EC2InstanceId", &notice.instance_id),
        ("LifecycleHookName", &notice.lifecycle_hook_name),
        ("AutoScalingGroupName", &notice.auto_scaling_group_name),
        ("LifecycleActionToken", &notice.lifecycle_action_token),
    ] {
        if value.is_empty() {
            return Err(OfframpError::MalformedNotice(format!(
                "missing or empty field: {}",
                field
            )));
        }
    }

    Ok(notice)
}
