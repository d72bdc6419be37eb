//! Session Gate CLI
//!
//! Drives the auth client from a terminal: the session record lives in a
//! JSON file and the "address bar" is the `--url` argument.
//! Uses `anyhow` for startup errors, but auth failures surface as the
//! gate's own states.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use auth::application::dev_login::DevLoginUseCase;
use auth::guard::{RouteDecision, RouteGuard, RouteTable};
use auth::presentation::view::{AccessPrompt, GateView};
use auth::{AuthConfig, HttpAuthorityGateway, IdentityContext, SessionGate, StorageCredentialStore};
use clap::{Parser, Subcommand};
use platform::location::{AddressBar, MemoryAddressBar};
use platform::storage::FileStorage;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kernel::error::app_error::AppError;

/// Session gate CLI
#[derive(Parser)]
#[command(name = "gate")]
#[command(about = "Magic-link session gate for Mandate Wizard", long_about = None)]
#[command(version)]
struct Cli {
    /// Session storage file
    #[arg(short, long, env = "GATE_STORAGE", default_value = ".gate/session.json")]
    storage: PathBuf,

    /// Current application URL (may carry `?token=...`)
    #[arg(short, long, env = "GATE_URL", default_value = "http://localhost:3000/")]
    url: String,

    /// Enable JSON logging
    #[arg(long, env = "GATE_LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the session as the application does at startup
    Boot,
    /// Ask the authority to email a magic link
    RequestLink {
        email: String,
        /// Verify the inline development token right away (dev bypass only)
        #[arg(long)]
        complete: bool,
    },
    /// Verify a magic-link token
    Verify { token: String },
    /// Decide what a navigation to PATH renders
    Route { path: String },
    /// Show the stored identity without contacting the authority
    Whoami,
    /// Sign in with the development identity
    DevLogin,
    /// Sign out
    Logout,
}

#[derive(Serialize)]
struct GateReport {
    url: String,
    view: GateView,
}

#[derive(Serialize)]
struct RouteReport {
    path: String,
    decision: &'static str,
    prompt: Option<AccessPrompt>,
}

fn decision_label(decision: &RouteDecision) -> &'static str {
    match decision {
        RouteDecision::Render => "render",
        RouteDecision::AuthenticationRequired { .. } => "authentication_required",
        RouteDecision::UpgradeRequired { .. } => "upgrade_required",
        RouteDecision::NotFound => "not_found",
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gate=info,auth=info,platform=info".into());

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = Arc::new(AuthConfig::from_env().map_err(AppError::from)?);
    if config.dev_bypass_enabled() {
        tracing::warn!("Development bypass is ENABLED; do not use in production");
    }

    let storage = FileStorage::new(cli.storage.clone());
    let store = Arc::new(StorageCredentialStore::new(
        storage,
        config.storage_keys.clone(),
    ));
    let context = IdentityContext::new(store);
    let address_bar = Arc::new(
        MemoryAddressBar::parse(&cli.url).with_context(|| format!("invalid --url {}", cli.url))?,
    );
    let gateway = Arc::new(HttpAuthorityGateway::new(&config.http_config()).map_err(AppError::from)?);
    let gate = SessionGate::new(gateway, context.clone(), address_bar.clone(), config.clone());

    tracing::debug!(
        authority = %config.api_base_url,
        storage = %cli.storage.display(),
        "Session gate ready"
    );

    match cli.command {
        Command::Boot => {
            gate.boot().await;
        }
        Command::RequestLink { email, complete } => {
            if !gate.boot().await.is_authenticated() {
                gate.request_magic_link(&email).await;
                if complete {
                    gate.complete_dev_login().await.map_err(AppError::from)?;
                }
            }
        }
        Command::Verify { token } => {
            gate.verify_token(&token).await;
        }
        Command::Route { path } => {
            gate.boot().await;
            let decision = RouteTable::standard(&config).resolve(
                &RouteGuard::new(&config),
                context.current().as_ref(),
                &path,
            );
            return print_json(&RouteReport {
                path,
                decision: decision_label(&decision),
                prompt: decision.prompt(),
            });
        }
        Command::Whoami => {
            let record = context.store().read().map_err(AppError::from)?;
            return print_json(&record.map(|r| r.identity));
        }
        Command::DevLogin => {
            DevLoginUseCase::new(context.clone(), config.clone())
                .execute()
                .map_err(AppError::from)?;
            gate.boot().await;
        }
        Command::Logout => {
            let remote = gate.logout();
            // Let the authority hear about it before the process exits
            if let Err(e) = remote.await {
                tracing::warn!(error = %e, "Remote logout task failed");
            }
        }
    }

    print_json(&GateReport {
        url: address_bar.current().to_string(),
        view: gate.view(),
    })
}
