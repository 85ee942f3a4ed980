//! Offramp - lifecycle-hook deregistration for autoscaled GitHub Actions runners
//!
//! One invocation processes one notification envelope: the platform hands the
//! event on stdin, the orchestrator runs the transaction, and the structured
//! result goes to stdout.

use clap::Parser;
use std::io::Read;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offramp::{
    audit::{AuditSink, HttpAuditSink, NullAuditSink},
    config::Args,
    credentials::SecretsExtensionProvider,
    github::{GithubRunnerClient, GithubTokenMinter},
    lifecycle::AutoScalingLifecycleClient,
    orchestrator::{Orchestrator, OrchestratorConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("offramp={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("Organization: {}", args.github_organization);
    info!("GitHub API: {}", args.github_api_url);
    info!("Lifecycle endpoint: {}", args.lifecycle_endpoint());
    info!("Audit log group: {}", args.audit_log_group);

    let http = reqwest::Client::builder()
        .timeout(args.request_timeout())
        .build()?;

    let credentials = Arc::new(SecretsExtensionProvider::new(
        http.clone(),
        args.secrets_endpoint.clone(),
        args.secret_name.clone(),
    ));
    let minter = Arc::new(GithubTokenMinter::new(
        http.clone(),
        args.github_api_url.clone(),
        args.github_organization.clone(),
    ));
    let runners = Arc::new(GithubRunnerClient::new(
        http.clone(),
        args.github_api_url.clone(),
        args.github_organization.clone(),
    ));
    let signaler = Arc::new(AutoScalingLifecycleClient::new(
        http.clone(),
        args.lifecycle_endpoint(),
    ));
    let audit: Arc<dyn AuditSink> = match &args.audit_endpoint {
        Some(endpoint) => Arc::new(HttpAuditSink::new(
            http,
            endpoint.clone(),
            args.audit_log_group.clone(),
        )),
        None => Arc::new(NullAuditSink),
    };

    let orchestrator = Orchestrator::new(
        OrchestratorConfig {
            deadline: args.deadline(),
            ..Default::default()
        },
        credentials,
        minter,
        runners.clone(),
        runners,
        signaler,
        audit,
    );

    let mut raw_event = String::new();
    std::io::stdin().read_to_string(&mut raw_event)?;

    let result = orchestrator.handle(&raw_event).await;

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
