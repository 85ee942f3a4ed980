//! Deregistration Orchestrator
//!
//! Sequences one termination-completion transaction:
//!
//! ```text
//! RECEIVED -> AUTHENTICATING -> DIRECTORY_LOOKUP -> REMOVING -> SIGNALING -> DONE
//! ```
//!
//! with an error transition from any state directly to SIGNALING(ABANDON).
//! The terminal invariant: for every notice that parses, exactly one
//! lifecycle-completion call is attempted, even when every preceding step
//! failed. The only no-signal path is a malformed notice, which carries no
//! action token to signal against.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::audit::{AuditEvent, AuditSink, AuditStatus};
use crate::credentials::CredentialProvider;
use crate::github::{find_by_name, RunnerDirectory, RunnerRemoval, TokenMinter};
use crate::lifecycle::{LifecycleOutcome, LifecycleSignaler};
use crate::notice::{parse_notice, TerminationNotice};
use crate::types::{InvocationResult, OfframpError, Result};

/// Orchestrator timing configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Budget for the whole invocation
    pub deadline: Duration,
    /// Time held back from the deadline so the lifecycle signal can still be
    /// sent after the pre-signal phase is aborted
    pub signal_reserve: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_millis(840_000),
            signal_reserve: Duration::from_secs(10),
        }
    }
}

/// Sequences authentication, discovery, removal, and the lifecycle signal
/// for one termination notice
pub struct Orchestrator {
    config: OrchestratorConfig,
    credentials: Arc<dyn CredentialProvider>,
    minter: Arc<dyn TokenMinter>,
    directory: Arc<dyn RunnerDirectory>,
    removal: Arc<dyn RunnerRemoval>,
    signaler: Arc<dyn LifecycleSignaler>,
    audit: Arc<dyn AuditSink>,
}

impl Orchestrator {
    pub fn new(
        config: OrchestratorConfig,
        credentials: Arc<dyn CredentialProvider>,
        minter: Arc<dyn TokenMinter>,
        directory: Arc<dyn RunnerDirectory>,
        removal: Arc<dyn RunnerRemoval>,
        signaler: Arc<dyn LifecycleSignaler>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config,
            credentials,
            minter,
            directory,
            removal,
            signaler,
            audit,
        }
    }

    /// Run one transaction from raw envelope to terminal result
    pub async fn handle(&self, raw_event: &str) -> InvocationResult {
        let notice = match parse_notice(raw_event) {
            Ok(notice) => notice,
            Err(e) => {
                // No action token, so no signal is possible
                error!("rejecting envelope: {}", e);
                return InvocationResult::bad_request(format!("Error processing termination: {}", e));
            }
        };

        info!(instance_id = %notice.instance_id, "processing termination");
        self.record(&notice, AuditStatus::Started, format!(
            "Lifecycle hook triggered for instance {}",
            notice.instance_id
        ))
        .await;

        let budget = self
            .config
            .deadline
            .saturating_sub(self.config.signal_reserve)
            .max(Duration::from_millis(1));

        let phase = timeout(budget, self.deregister(&notice)).await;

        let (outcome, failure) = match phase {
            Ok(Ok(())) => (LifecycleOutcome::Continue, None),
            Ok(Err(e)) => {
                error!(instance_id = %notice.instance_id, "deregistration failed: {}", e);
                (LifecycleOutcome::Abandon, Some(e.to_string()))
            }
            Err(_) => {
                error!(instance_id = %notice.instance_id, "deregistration aborted: deadline exceeded");
                (LifecycleOutcome::Abandon, Some("invocation deadline exceeded".to_string()))
            }
        };

        // SIGNALING: exactly once per parsed notice, even after failure.
        // A signal failure is terminal regardless; there is no corrective
        // action left within this transaction.
        match self.signaler.complete(&notice, outcome).await {
            Ok(()) => {
                if outcome == LifecycleOutcome::Continue {
                    self.record(&notice, AuditStatus::Completed, format!(
                        "Lifecycle hook processing completed for instance {}",
                        notice.instance_id
                    ))
                    .await;
                }
            }
            Err(e) => warn!(instance_id = %notice.instance_id, "lifecycle signal failed: {}", e),
        }

        match failure {
            None => InvocationResult::ok(format!(
                "Successfully processed termination for {}",
                notice.instance_id
            )),
            Some(reason) => {
                InvocationResult::error(format!("Error processing termination: {}", reason))
            }
        }
    }

    /// AUTHENTICATING through REMOVING. Returns Ok for every CONTINUE path
    /// (removed, not found, or removal failed); an Err here abandons the
    /// termination.
    async fn deregister(&self, notice: &TerminationNotice) -> Result<()> {
        let identity = self.credentials.fetch().await?;
        let installation = self.minter.installation_token(&identity).await?;
        let removal_token = self.minter.removal_token(&installation).await?;

        let runners = self.directory.list_runners(&installation).await?;

        let runner = match find_by_name(&runners, &notice.instance_id) {
            Some(runner) => runner,
            None => {
                // Already absent from the registry: the instance is gone from
                // the CI system's perspective, nothing left to remove.
                info!(instance_id = %notice.instance_id, "runner not registered");
                self.record(notice, AuditStatus::NotFound, format!(
                    "Runner {} not found in GitHub",
                    notice.instance_id
                ))
                .await;
                return Ok(());
            }
        };

        match self.removal.remove(&removal_token, runner.id).await {
            Ok(()) => {
                info!(instance_id = %notice.instance_id, runner_id = runner.id, "runner deregistered");
                self.record(notice, AuditStatus::Success, format!(
                    "Runner {} successfully deregistered",
                    notice.instance_id
                ))
                .await;
            }
            Err(e) => {
                // The instance is being destroyed regardless; leaving a stale
                // registration beats blocking termination. A reconciliation
                // pass outside this transaction cleans up leftovers.
                warn!(instance_id = %notice.instance_id, runner_id = runner.id, "removal failed: {}", e);
                self.record(notice, AuditStatus::Failed, format!(
                    "Failed to deregister runner: {}",
                    removal_status(&e)
                ))
                .await;
            }
        }

        Ok(())
    }

    /// Fire-and-forget audit append; sink failures never reach the caller
    async fn record(&self, notice: &TerminationNotice, status: AuditStatus, message: String) {
        let event = AuditEvent::new(&notice.instance_id, status, message);
        if let Err(e) = self.audit.append(&event).await {
            warn!(instance_id = %notice.instance_id, "audit append failed: {}", e);
        }
    }
}

fn removal_status(err: &OfframpError) -> String {
    match err {
        OfframpError::RemovalFailed { status } => status.to_string(),
        other => other.to_string(),
    }
}
