//! Lifecycle Signal Client
//!
//! Tells the fleet manager whether to continue or abandon the suspended
//! termination. This is the one call attempted on every code path for a
//! parsed notice: a hook that never hears back hangs the whole scaling
//! operation until its heartbeat timeout.

use tracing::info;

use crate::notice::TerminationNotice;
use crate::types::{OfframpError, Result};

/// Terminal signal for one suspended termination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Continue,
    Abandon,
}

impl LifecycleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "CONTINUE",
            Self::Abandon => "ABANDON",
        }
    }
}

impl std::fmt::Display for LifecycleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability interface for lifecycle completion (allows test doubles)
#[async_trait::async_trait]
pub trait LifecycleSignaler: Send + Sync {
    /// Complete the suspended lifecycle action with the given outcome
    async fn complete(&self, notice: &TerminationNotice, outcome: LifecycleOutcome) -> Result<()>;
}

/// Build the Query-API form for a completion call
pub fn completion_params(
    notice: &TerminationNotice,
    outcome: LifecycleOutcome,
) -> Vec<(&'static str, String)> {
    vec![
        ("Action", "CompleteLifecycleAction".to_string()),
        ("Version", "2011-01-01".to_string()),
        ("LifecycleHookName", notice.lifecycle_hook_name.clone()),
        ("AutoScalingGroupName", notice.auto_scaling_group_name.clone()),
        ("InstanceId", notice.instance_id.clone()),
        ("LifecycleActionToken", notice.lifecycle_action_token.clone()),
        ("LifecycleActionResult", outcome.as_str().to_string()),
    ]
}

/// Signal client backed by the fleet manager's Query API endpoint
pub struct AutoScalingLifecycleClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AutoScalingLifecycleClient {
    pub fn new(http: reqwest::Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait::async_trait]
impl LifecycleSignaler for AutoScalingLifecycleClient {
    async fn complete(&self, notice: &TerminationNotice, outcome: LifecycleOutcome) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&completion_params(notice, outcome))
            .send()
            .await
            .map_err(|e| OfframpError::Signal(format!("completion call failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OfframpError::Signal(format!(
                "completion returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        info!(
            instance_id = %notice.instance_id,
            outcome = %outcome,
            "lifecycle action completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> TerminationNotice {
        TerminationNotice {
            instance_id: "i-0001".into(),
            lifecycle_hook_name: "runner-drain".into(),
            auto_scaling_group_name: "runners-asg".into(),
            lifecycle_action_token: "tok-123".into(),
        }
    }

    #[test]
    fn test_outcome_rendering() {
        assert_eq!(LifecycleOutcome::Continue.as_str(), "CONTINUE");
        assert_eq!(LifecycleOutcome::Abandon.as_str(), "ABANDON");
    }

    #[test]
    fn test_completion_params_carry_all_fields() {
        let params = completion_params(&notice(), LifecycleOutcome::Abandon);

        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };

        assert_eq!(get("Action"), "CompleteLifecycleAction");
        assert_eq!(get("LifecycleHookName"), "runner-drain");
        assert_eq!(get("AutoScalingGroupName"), "runners-asg");
        assert_eq!(get("InstanceId"), "i-0001");
        assert_eq!(get("LifecycleActionToken"), "tok-123");
        assert_eq!(get("LifecycleActionResult"), "ABANDON");
    }
}
