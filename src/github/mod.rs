//! GitHub API clients
//!
//! Two narrow clients over the organization's Actions surface: token minting
//! (app assertion, installation token, removal token) and the runner
//! directory/removal operations. All calls carry the v3 Accept header and a
//! fixed request timeout; retries, if any, are the orchestrator's decision.

pub mod runners;
pub mod tokens;

pub use runners::{find_by_name, GithubRunnerClient, RunnerDirectory, RunnerRecord, RunnerRemoval};
pub use tokens::{GithubTokenMinter, InstallationToken, RemovalToken, TokenMinter};

/// Accept header value for the GitHub v3 REST API
pub(crate) const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";

/// User agent sent on every GitHub call (the API rejects anonymous clients)
pub(crate) const USER_AGENT: &str = concat!("offramp/", env!("CARGO_PKG_VERSION"));
