//! codegram entry point.
//!
//! Binary name: `codegram`
//!
//! Parses CLI arguments, sets up tracing, then either runs the webhook
//! server or dispatches to an admin command over the local store.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use codegram_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use secrecy::SecretString;

use cli::{Cli, Commands};
use state::{AdminState, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&TracingOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        json: cli.log_json,
        otel: cli.otel,
    }) {
        eprintln!("failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "codegram", &mut std::io::stdout());
        }

        Commands::Serve(args) => {
            let whitelist = args.whitelist.unwrap_or_default().0;
            if !args.allow_all_users && whitelist.is_empty() {
                tracing::warn!("no whitelist configured and ALLOW_ALL_USERS is off; only stored whitelist flags admit users");
            }

            let state = AppState::init(Settings {
                telegram_token: SecretString::from(args.telegram_token),
                backend_url: args.backend_url,
                allow_all_users: args.allow_all_users,
                whitelist,
                data_dir: cli.data_dir,
            })
            .await?;

            let router = http::router::build_router(state);
            let addr = format!("{}:{}", args.host, args.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} codegram webhook listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
            }
            tracing::info!(%addr, "webhook server started");

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("webhook server stopped");
        }

        Commands::Whitelist { action } => {
            let state = AdminState::init(&cli.data_dir).await?;
            cli::whitelist::run(&state, action, cli.json).await?;
        }

        Commands::Project { action } => {
            let state = AdminState::init(&cli.data_dir).await?;
            cli::project::run(&state, action, cli.json).await?;
        }

        Commands::Session { action } => {
            let state = AdminState::init(&cli.data_dir).await?;
            cli::session::run(&state, action, cli.json).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
