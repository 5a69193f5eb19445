// Standard library
use std::error::Error;
use std::sync::Arc;

// 3rd party crates
use tokio::signal::ctrl_c;
use tracing::{error, info};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

// Project imports
use namedotcom_provider::providers::NameDotCom;
use namedotcom_provider::settings::types::ConfigManager;
use namedotcom_provider::utility::context::RequestContext;
use namedotcom_provider::utility::rate_limiter::types::SharedRateLimiter;

/// Crates whose own logging is only interesting when it fails.
const QUIET_TARGETS: [&str; 4] = [
    "hyper_util=error",
    "hyper=error",
    "reqwest=error",
    "rustls=error",
];

/// Entry point for the Name.com provider runtime.
///
/// Loads the configuration, configures the shared rate limiter from it and
/// checks the credentials against the API. Ctrl+C cancels any request that
/// is still waiting on the rate limiter or the network.
#[tokio::main]
async fn main() {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    let config: Arc<ConfigManager> = match ConfigManager::new().await {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to initialize configuration: {}", e);
            std::process::exit(1);
        }
    };

    // setup logging.
    let log_level: String = config.get_log_level().await;

    let filter: EnvFilter = QUIET_TARGETS
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::ERROR.into())
                .parse_lossy(log_level),
            |filter, directive| filter.add_directive(directive),
        );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .init();

    info!("Settings have been loaded.");

    // Cancelling the root context cancels every request derived from it.
    let root = RequestContext::new();
    let shutdown = root.clone();

    tokio::spawn(async move {
        if let Err(e) = ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received shutdown signal, cancelling in-flight requests...");
        shutdown.cancel();
    });

    if let Err(e) = run(config, root).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }

    info!("Shutdown complete.");
}

async fn run(
    config: Arc<ConfigManager>,
    root: RequestContext,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let settings = config.get_settings().await;
    let (per_second, per_hour) = settings.get_rate_limits();

    let limiter = SharedRateLimiter::new();
    limiter.configure(per_second, per_hour).await;

    let namedotcom = NameDotCom::new(&settings.provider, limiter)?;
    let timeout = settings.provider.get_timeout();

    // Drop the settings lock
    drop(settings);

    let hello = namedotcom.hello(&root.child(Some(timeout))).await?;
    info!(
        server = %hello.server_name,
        server_time = %hello.server_time,
        "{}",
        hello.motd
    );

    Ok(())
}
