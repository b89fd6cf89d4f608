// # dyndnsd - dynamic DNS update daemon
//
// The dyndnsd daemon is responsible for:
// 1. Reading process settings from environment variables
// 2. Loading the service configuration file
// 3. Initializing logging and the runtime
// 4. Serving update requests over HTTP until SIGTERM/SIGINT
//
// All update logic lives in dyndns-core; this binary only wires it to HTTP.
//
// ## Configuration
//
// - `DYNDNS_CONFIG`: path of the YAML service configuration (default `config.yaml`)
// - `DYNDNS_LISTEN`: HTTP listen address (default `127.0.0.1:5000`)
// - `DYNDNS_LOG_LEVEL`: trace, debug, info, warn or error (default `info`)
//
// ## Example
//
// ```bash
// export DYNDNS_CONFIG=/etc/dyndns/config.yaml
// export DYNDNS_LISTEN=[::]:8053
//
// dyndnsd
//
// curl -u alice:wonderland 'http://localhost:8053/?domain=home.example.com&ip4=203.0.113.7'
// ```

mod http;

use anyhow::{Context, Result};
use dyndns_core::{ServiceConfig, UpdateService};
use hyper::Server;
use hyper::service::{make_service_fn, service_fn};
use std::convert::Infallible;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// How long in-flight requests may run after a shutdown signal
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DyndnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Process settings
struct Config {
    config_path: PathBuf,
    listen: SocketAddr,
    log_level: String,
}

impl Config {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        let listen = env::var("DYNDNS_LISTEN").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        Ok(Self {
            config_path: env::var("DYNDNS_CONFIG")
                .unwrap_or_else(|_| "config.yaml".to_string())
                .into(),
            listen: listen
                .parse()
                .with_context(|| format!("DYNDNS_LISTEN '{listen}' is not a socket address"))?,
            log_level: env::var("DYNDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DYNDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        if self.config_path.as_os_str().is_empty() {
            anyhow::bail!("DYNDNS_CONFIG cannot be empty");
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    info!("Starting dyndnsd daemon");

    let service = match load_service(&config) {
        Ok(service) => service,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DyndnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config.listen, service).await {
            error!("Daemon error: {:#}", e);
            DyndnsExitCode::RuntimeError
        } else {
            DyndnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Load the service configuration and build the update service
fn load_service(config: &Config) -> Result<Arc<UpdateService>> {
    let service_config = ServiceConfig::load(&config.config_path)
        .with_context(|| format!("cannot load {}", config.config_path.display()))?;

    info!(
        "Configuration loaded: {} domain(s), DNS server {}",
        service_config.domains.len(),
        service_config.server_addr()
    );
    if !service_config.require_public_addresses {
        warn!("Non-public addresses are accepted");
    }

    Ok(Arc::new(UpdateService::from_config(&service_config)?))
}

/// Serve HTTP until a shutdown signal, then drain in-flight requests
async fn run_daemon(listen: SocketAddr, service: Arc<UpdateService>) -> Result<()> {
    let make_service = make_service_fn(move |_conn| {
        let service = Arc::clone(&service);
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                http::handle(Arc::clone(&service), request)
            }))
        }
    });

    let server = Server::try_bind(&listen)
        .with_context(|| format!("cannot listen on {listen}"))?
        .serve(make_service);
    info!("Listening on http://{}", server.local_addr());

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = server.with_graceful_shutdown(async {
        let _ = stop_rx.await;
    });
    tokio::pin!(server);

    let signal = tokio::select! {
        result = &mut server => {
            result?;
            return Ok(());
        }
        signal = wait_for_shutdown() => signal?,
    };

    info!("Received shutdown signal: {}", signal);
    info!("Shutting down daemon");
    let _ = stop_tx.send(());

    match tokio::time::timeout(DRAIN_TIMEOUT, server).await {
        Ok(result) => result?,
        Err(_) => warn!(
            "In-flight requests still running after {:?}, exiting anyway",
            DRAIN_TIMEOUT
        ),
    }

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
