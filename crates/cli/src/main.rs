use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use unbound_exporter_api::AppState;
use unbound_exporter_domain::config::LogFormat;
use unbound_exporter_domain::CliOverrides;
use unbound_exporter_jobs::{JobRunner, StatsPollJob};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "unbound-exporter")]
#[command(version)]
#[command(about = "Prometheus exporter for OPNsense Unbound DNS statistics")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", env = "UNBOUND_EXPORTER_CONFIG")]
    config: Option<String>,

    /// OPNsense host
    #[arg(long, env = "OPNSENSE_HOST")]
    host: Option<String>,

    /// OPNsense API port
    #[arg(long, env = "OPNSENSE_PORT")]
    port: Option<u16>,

    /// Path of the Unbound overview endpoint
    #[arg(long, env = "OPNSENSE_STATS_PATH")]
    stats_path: Option<String>,

    /// API key
    #[arg(long, env = "OPNSENSE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API secret
    #[arg(long, env = "OPNSENSE_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "OPNSENSE_TIMEOUT")]
    timeout: Option<u64>,

    /// Verify the upstream TLS certificate
    #[arg(long, env = "OPNSENSE_VERIFY_TLS", value_parser = BoolishValueParser::new())]
    verify_tls: bool,

    /// Seconds between polls
    #[arg(short = 'i', long, env = "SCRAPE_INTERVAL")]
    interval: Option<u64>,

    /// Bind address for the metrics listener
    #[arg(short = 'b', long, env = "EXPORT_BIND")]
    bind: Option<String>,

    /// Port for the metrics listener
    #[arg(short = 'w', long, env = "EXPORT_PORT")]
    web_port: Option<u16>,

    /// Shortcut for --log-level debug
    #[arg(long, env = "UNBOUND_EXPORTER_DEBUG", value_parser = BoolishValueParser::new())]
    debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "UNBOUND_EXPORTER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Append logs to this file instead of stdout
    #[arg(long, value_name = "FILE", env = "UNBOUND_EXPORTER_LOG_FILE")]
    log_file: Option<String>,

    /// Log output format (text, json)
    #[arg(long, env = "UNBOUND_EXPORTER_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            host: self.host.clone(),
            port: self.port,
            stats_path: self.stats_path.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            timeout_secs: self.timeout,
            verify_tls: self.verify_tls,
            interval_secs: self.interval,
            bind_address: self.bind.clone(),
            web_port: self.web_port,
            debug: self.debug,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
            log_format: self.log_format,
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value).ok_or_else(|| format!("unknown log format '{value}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config.logging)?;

    info!("Starting Unbound exporter v{}", env!("CARGO_PKG_VERSION"));
    info!(
        upstream = %config.upstream.stats_url(),
        interval_secs = config.polling.interval_secs,
        timeout_secs = config.upstream.timeout_secs,
        log_format = config.logging.format.as_str(),
        "Configuration loaded"
    );

    let services = di::Services::new(&config)?;

    let shutdown = CancellationToken::new();
    let poll_job =
        StatsPollJob::new(services.poll_stats.clone()).with_interval(config.polling.interval_secs);
    let job_handles = JobRunner::new()
        .with_stats_poll(poll_job)
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    let app_state = AppState {
        render_metrics: services.render_metrics.clone(),
    };

    let web_addr = config
        .server
        .listen_address()
        .with_context(|| format!("invalid bind address '{}'", config.server.bind_address))?;

    let served = server::start_web_server(web_addr, app_state, shutdown.clone()).await;

    shutdown.cancel();
    for handle in job_handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Background job ended abnormally");
        }
    }

    served?;
    info!("Exporter shutdown complete");
    Ok(())
}
