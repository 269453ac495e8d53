//! Issue a login magic link for an email address and print it.
//!
//! Uses the in-memory adapters, so the link only demonstrates the flow; it
//! cannot be redeemed after the process exits.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::sync::Arc;

use backend::domain::AuthService;
use backend::domain::auth::AuthSettings;
use backend::domain::ports::RandomVerificationCodeGenerator;
use backend::outbound::memory::{InMemoryVerificationRepository, OutboxMagicLinkSender};
use clap::Parser;
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `issue-magic-link` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "issue-magic-link",
    about = "Issue a passwordless login link using APP_BASE_URL and friends",
    version
)]
struct CliArgs {
    /// Address to issue the link for.
    #[arg(long, value_name = "addr")]
    email: String,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = AuthSettings::from_env()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    let outbox = Arc::new(OutboxMagicLinkSender::new());
    let service = AuthService::new(
        Arc::new(InMemoryVerificationRepository::new()),
        Arc::clone(&outbox),
        Arc::new(RandomVerificationCodeGenerator),
        Arc::new(DefaultClock),
        settings,
    );

    let pending = service
        .send_magic_link(&args.email)
        .await
        .map_err(|error| io::Error::other(format!("send magic link: {error}")))?;
    let message = outbox
        .latest_for(&pending.target)
        .ok_or_else(|| io::Error::other("magic link missing from outbox"))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "target={}", pending.target)?;
    writeln!(stdout, "expires_at={}", pending.expires_at.to_rfc3339())?;
    writeln!(stdout, "url={}", message.url)?;
    Ok(())
}
