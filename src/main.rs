//! API orchestrator CLI.
//!
//! Runs one orchestrated call against the configured API and prints the
//! decoded envelope body.
//!
//! ```text
//! api-orchestrator --config client.toml get /users/me
//! api-orchestrator --attempts 5 post /orders --json '{"item":1}'
//! api-orchestrator codes
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use api_orchestrator::config::{load_config, ClientConfig};
use api_orchestrator::observability::{logging, metrics};
use api_orchestrator::{ApiClient, CallOptions, LogNotifier, RequestTarget};

#[derive(Parser)]
#[command(name = "api-orchestrator")]
#[command(about = "Run orchestrated calls against an envelope-style JSON API", long_about = None)]
struct Cli {
    /// Client configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not drive the loading signal or show notifications.
    #[arg(short, long)]
    quiet: bool,

    /// Attempts for this call, overriding `retries.max_attempts`.
    #[arg(short, long)]
    attempts: Option<u32>,

    /// Use the long resource timeout.
    #[arg(long)]
    large_payload: bool,

    /// Print the metrics snapshot after the call.
    #[arg(long)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a path and print the decoded body
    Get {
        path: String,
        /// Query parameters as key=value
        #[arg(short = 'Q', long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
    /// POST a JSON body to a path and print the decoded body
    Post {
        path: String,
        #[arg(short, long, default_value = "{}")]
        json: String,
    },
    /// List the response code table
    Codes,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!(
        environment = ?config.environment,
        base_url = %config.base_url_string(),
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    let client = ApiClient::from_config(&config, Arc::new(LogNotifier))?;

    let mut loading = client.loading().subscribe();
    tokio::spawn(async move {
        while loading.changed().await.is_ok() {
            let active = *loading.borrow_and_update();
            tracing::info!(active, "Loading signal changed");
        }
    });

    let mut options = CallOptions {
        show_loading: !cli.quiet,
        ..CallOptions::default()
    };
    if let Some(attempts) = cli.attempts {
        options = options.with_attempts(attempts);
    }

    let target = match cli.command {
        Commands::Get { path, query } => query
            .into_iter()
            .fold(RequestTarget::get("Cli", "get", path), |target, (k, v)| target.with_query(k, v)),
        Commands::Post { path, json } => {
            let body: Value = serde_json::from_str(&json)?;
            RequestTarget::post("Cli", "post", path).with_json(body)
        }
        Commands::Codes => {
            for code in client.response_codes().entries() {
                println!("{}\t{:<24}\t{:?}", code.code, code.name, code.meaning);
            }
            return Ok(());
        }
    };
    let target = if cli.large_payload { target.large_payload() } else { target };

    let result = client.request::<Value>(&target, options).await;

    if cli.print_metrics {
        match &metrics_handle {
            Some(handle) => eprintln!("{}", handle.render()),
            None => eprintln!("Metrics are disabled (observability.metrics_enabled = false)"),
        }
    }

    match result {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(failure) => {
            eprintln!("Error ({}): {}", failure.kind(), failure);
            std::process::exit(1);
        }
    }
}
