use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetmon::config::MonitorConfig;
use fleetmon::monitor::StalenessEvaluator;
use fleetmon::server::MonitorServer;
use fleetmon::store::{RecordStore, SqliteRecordStore};

#[derive(Parser)]
#[command(
    name = "fleetmon",
    version,
    about = "Distributor fleet liveness collector",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP collector
    Serve {
        /// Bind address (overrides config/env)
        #[arg(short, long)]
        bind: Option<String>,

        /// SQLite database path
        #[arg(long)]
        db: Option<String>,

        /// Staleness threshold in seconds
        #[arg(long)]
        stale_secs: Option<u64>,

        /// Minimum interval between staleness sweeps, in seconds
        #[arg(long)]
        window_secs: Option<u64>,

        /// TOML config file (env vars still apply when absent)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Run one staleness sweep and exit
    Sweep {
        /// SQLite database path
        #[arg(long)]
        db: Option<String>,

        /// Staleness threshold in seconds
        #[arg(long)]
        stale_secs: Option<u64>,
    },

    /// Print all distributor records
    List {
        /// SQLite database path
        #[arg(long)]
        db: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Serve {
            bind,
            db,
            stale_secs,
            window_secs,
            config,
        } => {
            serve(bind, db, stale_secs, window_secs, config).await?;
        }

        Commands::Sweep { db, stale_secs } => {
            sweep(db, stale_secs).await?;
        }

        Commands::List { db } => {
            list(db).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("fleetmon=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("fleetmon=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn load_config(
    bind: Option<String>,
    db: Option<String>,
    stale_secs: Option<u64>,
    window_secs: Option<u64>,
    config_file: Option<String>,
) -> Result<MonitorConfig> {
    let mut config = match config_file {
        Some(path) => MonitorConfig::from_file(path)?,
        None => MonitorConfig::from_env()?,
    };

    if let Some(bind) = bind {
        config.bind_address = bind.parse()?;
    }
    if let Some(db) = db {
        config.db_path = db.into();
    }
    if let Some(secs) = stale_secs {
        config.stale_threshold_secs = secs;
    }
    if let Some(secs) = window_secs {
        config.recompute_window_secs = secs;
    }

    config.validate()?;
    Ok(config)
}

async fn serve(
    bind: Option<String>,
    db: Option<String>,
    stale_secs: Option<u64>,
    window_secs: Option<u64>,
    config_file: Option<String>,
) -> Result<()> {
    let config = load_config(bind, db, stale_secs, window_secs, config_file)?;
    let server = MonitorServer::new(config)?;

    server
        .start_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn sweep(db: Option<String>, stale_secs: Option<u64>) -> Result<()> {
    let config = load_config(None, db, stale_secs, None, None)?;
    let store = std::sync::Arc::new(SqliteRecordStore::new(&config.db_path)?);

    let evaluator = StalenessEvaluator::new(store, config.stale_threshold_secs);
    let marked = evaluator.mark_fault_if_stale().await?;

    println!(
        "{marked} distributor(s) marked fault (threshold {}s)",
        evaluator.threshold_secs()
    );
    Ok(())
}

async fn list(db: Option<String>) -> Result<()> {
    let config = load_config(None, db, None, None, None)?;
    let store = SqliteRecordStore::new(&config.db_path)?;

    for record in store.list_all().await? {
        println!(
            "{:<50} {:<12} {:<24} {}",
            record.code,
            record.status,
            record
                .last_seen
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
            record.location_name.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
