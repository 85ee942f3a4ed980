//! Configuration for offramp
//!
//! All configuration is environment-supplied; invocation is event-driven and
//! there is no interactive CLI surface. Pattern follows clap's derive + env
//! handling.

use clap::Parser;
use std::time::Duration;

/// Offramp - lifecycle-hook deregistration for autoscaled GitHub Actions runners
#[derive(Parser, Debug, Clone)]
#[command(name = "offramp")]
#[command(about = "Deregisters terminating GitHub Actions runners and completes the lifecycle hook")]
pub struct Args {
    /// Fleet-manager region, used to derive the lifecycle endpoint
    #[arg(long, env = "REGION", default_value = "us-east-1")]
    pub region: String,

    /// Name of the stored GitHub App identity in the secret store
    #[arg(long, env = "SECRET_NAME")]
    pub secret_name: String,

    /// GitHub organization the runners are registered under
    #[arg(long, env = "GITHUB_ORGANIZATION")]
    pub github_organization: String,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// Secret-store endpoint (localhost secrets extension)
    #[arg(long, env = "SECRETS_ENDPOINT", default_value = "http://localhost:2773")]
    pub secrets_endpoint: String,

    /// Fleet-manager lifecycle endpoint override.
    /// Defaults to the regional autoscaling endpoint when unset.
    #[arg(long, env = "LIFECYCLE_ENDPOINT")]
    pub lifecycle_endpoint: Option<String>,

    /// Audit log group for deregistration status events
    #[arg(long, env = "LIFECYCLE_LOG_GROUP", default_value = "/runners/lifecycle")]
    pub audit_log_group: String,

    /// Audit log ingestion endpoint. Audit is disabled when unset.
    #[arg(long, env = "AUDIT_ENDPOINT")]
    pub audit_endpoint: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Invocation deadline in milliseconds. The pre-signal phase must finish
    /// within this budget; the lifecycle signal is attempted regardless.
    #[arg(long, env = "DEADLINE_MS", default_value = "840000")]
    pub deadline_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Effective lifecycle endpoint (regional default unless overridden)
    pub fn lifecycle_endpoint(&self) -> String {
        self.lifecycle_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://autoscaling.{}.amazonaws.com", self.region))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.secret_name.is_empty() {
            return Err("SECRET_NAME must not be empty".to_string());
        }

        if self.github_organization.is_empty() {
            return Err("GITHUB_ORGANIZATION must not be empty".to_string());
        }

        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.deadline_ms == 0 {
            return Err("DEADLINE_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args::parse_from([
            "offramp",
            "--secret-name",
            "github-app",
            "--github-organization",
            "acme",
        ])
    }

    #[test]
    fn test_lifecycle_endpoint_derived_from_region() {
        let mut a = args();
        a.region = "eu-west-1".to_string();
        assert_eq!(
            a.lifecycle_endpoint(),
            "https://autoscaling.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn test_lifecycle_endpoint_override_wins() {
        let mut a = args();
        a.lifecycle_endpoint = Some("http://localhost:9999".to_string());
        assert_eq!(a.lifecycle_endpoint(), "http://localhost:9999");
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let mut a = args();
        a.github_organization = String::new();
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(args().validate().is_ok());
    }
}
