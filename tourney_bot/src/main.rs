//! Tournament bot server.
//!
//! Routes chat events received over HTTP to the tournament core and keeps
//! the replies in per-user mailboxes for the chat gateway to collect.

use std::net::SocketAddr;

use anyhow::Error;
use log::info;
use pico_args::Arguments;
use tourney_bot::{api, build_state, config::BotConfig, logging, metrics};

const HELP: &str = "\
Run the tournament bot

USAGE:
  tourney_bot [OPTIONS]

OPTIONS:
  --bind       IP:PORT     HTTP bind address             [default: env SERVER_BIND or 127.0.0.1:6969]
  --admins     IDS         Comma-separated operator ids  [default: env ADMIN_IDS]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              HTTP bind address (e.g., 0.0.0.0:8080)
  ADMIN_IDS                Operator user ids (required)
  COMMISSION_PERCENT       Operator cut of every fund [default: 30]
  PAYMENT_DETAILS          Default payment and payout instructions
  SUPPORT_TEXT             Support and rules text
  METRICS_BIND             Prometheus endpoint address (optional)
  MAILBOX_CAPACITY         Undrained messages kept per user [default: 256]
  RUST_LOG                 Log filter [default: info]
";

struct Args {
    bind: Option<SocketAddr>,
    admins: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        admins: pargs.opt_value_from_str("--admins")?,
    };

    logging::init();

    let config = BotConfig::from_env(args.bind, args.admins)?;
    config.validate()?;
    info!(
        "Starting tournament bot at {} with {} operator(s), commission {}%",
        config.bind,
        config.operators.len(),
        config.commission_percent
    );

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(anyhow::Error::msg)?;
        info!("Metrics available at http://{}/metrics", metrics_bind);
    }

    let app = api::create_router(build_state(&config));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Bot is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down bot...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
