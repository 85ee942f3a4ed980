//! Runner Directory and Removal clients
//!
//! The directory lists the organization's registered runners and maps a host
//! identifier to a registration id; runner names equal instance ids by the
//! registration convention enforced at install time. Removal deletes one
//! registration by id using the single-use removal token.

use serde::Deserialize;
use tracing::debug;

use super::tokens::{InstallationToken, RemovalToken};
use super::{ACCEPT_GITHUB_V3, USER_AGENT};
use crate::types::{OfframpError, Result};

/// One registered runner, read-only snapshot, never cached across invocations
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerRecord {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RunnersPage {
    runners: Vec<RunnerRecord>,
}

/// First exact match on `name == instance_id`; no match is a valid outcome,
/// not an error.
pub fn find_by_name<'a>(records: &'a [RunnerRecord], instance_id: &str) -> Option<&'a RunnerRecord> {
    records.iter().find(|r| r.name == instance_id)
}

/// Capability interface for directory listing (allows test doubles)
#[async_trait::async_trait]
pub trait RunnerDirectory: Send + Sync {
    /// List the organization's registered runners. An empty list is not an
    /// error; the organization may legitimately have zero runners.
    async fn list_runners(&self, installation: &InstallationToken) -> Result<Vec<RunnerRecord>>;
}

/// Capability interface for runner removal (allows test doubles)
#[async_trait::async_trait]
pub trait RunnerRemoval: Send + Sync {
    /// Delete one runner registration. Only the service's "no content"
    /// response counts as success.
    async fn remove(&self, removal: &RemovalToken, runner_id: u64) -> Result<()>;
}

/// Directory + removal client backed by the GitHub REST API
pub struct GithubRunnerClient {
    http: reqwest::Client,
    api_url: String,
    organization: String,
}

impl GithubRunnerClient {
    pub fn new(http: reqwest::Client, api_url: String, organization: String) -> Self {
        Self {
            http,
            api_url,
            organization,
        }
    }
}

#[async_trait::async_trait]
impl RunnerDirectory for GithubRunnerClient {
    async fn list_runners(&self, installation: &InstallationToken) -> Result<Vec<RunnerRecord>> {
        let url = format!("{}/orgs/{}/actions/runners", self.api_url, self.organization);

        let response = self
            .http
            .get(&url)
            .query(&[("per_page", "100")])
            .header("Authorization", format!("token {}", installation.value))
            .header("Accept", ACCEPT_GITHUB_V3)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OfframpError::Directory {
                status: status.as_u16(),
                body,
            });
        }

        let page: RunnersPage = response.json().await?;
        debug!(count = page.runners.len(), "listed registered runners");
        Ok(page.runners)
    }
}

#[async_trait::async_trait]
impl RunnerRemoval for GithubRunnerClient {
    async fn remove(&self, removal: &RemovalToken, runner_id: u64) -> Result<()> {
        let url = format!(
            "{}/orgs/{}/actions/runners/{}",
            self.api_url, self.organization, runner_id
        );

        let response = self
            .http
            .delete(&url)
            .header("Authorization", format!("token {}", removal.value))
            .header("Accept", ACCEPT_GITHUB_V3)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 204 {
            return Err(OfframpError::RemovalFailed {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
