//! Latency Metrics - per-region latency and uptime summaries
//!
//! An HTTP service that accepts a batch of latency/uptime samples and
//! returns average, minimum and maximum latency, average uptime and the
//! record count for every region in the batch.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, bind failure, bad input file)

mod analysis;
mod api;
mod cli;
mod config;
mod models;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let (config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("Latency Metrics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    info!("Configuration: {}", config_source);

    let outcome = match args.input {
        Some(ref input) => run_file(input, args.output.as_deref()),
        None => run_server(&config).await,
    };

    if let Err(e) = outcome {
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .latency-metrics.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize host, port, CORS and body limits.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before logging is initialized, so it reports where the
/// configuration came from instead of logging it.
fn load_config(args: &Args) -> Result<(Config, String)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        (config, format!("loaded from {}", config_path.display()))
    } else {
        match Config::load_default() {
            Ok(Some(config)) => (config, format!("loaded from {}", CONFIG_FILE_NAME)),
            Ok(None) => (Config::default(), "defaults".to_string()),
            Err(e) => {
                eprintln!("Warning: failed to load {}: {:#}", CONFIG_FILE_NAME, e);
                (Config::default(), "defaults".to_string())
            }
        }
    };

    config.merge_with_args(args);
    Ok((config, source))
}

/// Handle --input: aggregate a request file and print or save the result.
fn run_file(input: &Path, output: Option<&Path>) -> Result<()> {
    info!("Aggregating request file: {}", input.display());

    let body = std::fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let request = api::validation::validate_request(&body)?;
    let report = analysis::aggregate(&request.data)?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize metrics")?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
            println!(
                "✅ {} regions from {} records saved to: {}",
                report.len(),
                request.data.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Bind the listener and serve until a shutdown signal arrives.
async fn run_server(config: &Config) -> Result<()> {
    let state = api::AppState::default();
    let app = api::create_router(state, &config.server);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    let local_addr = listener.local_addr().context("Failed to read local address")?;
    info!("Listening on http://{}", local_addr);
    if !config.server.cors {
        warn!("CORS disabled; browsers on other origins will be rejected");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
