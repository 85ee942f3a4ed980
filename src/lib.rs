//! Offramp - lifecycle-hook deregistration for autoscaled GitHub Actions runners
//!
//! When the fleet manager terminates an instance, a lifecycle hook suspends
//! the termination and notifies this workflow. Offramp authenticates to
//! GitHub as an App, finds the runner registered under the instance id,
//! removes it so no job lands on a dead host, and always tells the fleet
//! manager to continue or abandon the suspended termination.
//!
//! ## Components
//!
//! - **credentials**: stored GitHub App identity from the secret store
//! - **github::tokens**: assertion signing and token exchange
//! - **github::runners**: runner directory lookup and removal
//! - **lifecycle**: fleet-manager completion signal
//! - **audit**: append-only status events per instance
//! - **orchestrator**: the transaction state machine tying it together

pub mod audit;
pub mod config;
pub mod credentials;
pub mod github;
pub mod lifecycle;
pub mod notice;
pub mod orchestrator;
pub mod types;

pub use config::Args;
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use types::{InvocationResult, OfframpError, Result};
