//! LRU Cache - replay scripted operations against a fixed-capacity cache

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod script;
mod telemetry;

use config::{Config, LogFormat, LoggingConfig};
use lru_core::{CacheConfig, LruCache};

/// LRU Cache - replay cache operations from a script
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    /// Cache capacity, overriding the configuration file
    #[arg(
        long,
        global = true,
        env = "LRU_CACHE_CAPACITY",
        allow_hyphen_values = true
    )]
    capacity: Option<i64>,

    /// Print final cache statistics as JSON
    #[arg(long, global = true)]
    stats: bool,

    /// Print Prometheus metrics after the run
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a script from a file, or stdin when omitted or `-`
    Replay { file: Option<PathBuf> },
    /// Replay the built-in two-entry eviction scenario (capacity 2 unless overridden)
    Demo,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(args, &mut out)
}

/// Execute one invocation, writing command output to `out`
fn run<W: Write>(args: Args, out: &mut W) -> Result<()> {
    // Init never reads the existing file, so it can replace a broken one
    let script_path = match &args.command {
        Commands::Init { force } => {
            init_logging(&LoggingConfig::default());
            return init_config(&args.config, *force);
        }
        Commands::Replay { file } => Some(file.as_deref()),
        Commands::Demo => None,
    };

    // Load configuration
    let config_found = Path::new(&args.config).exists();
    let mut config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting LRU Cache v{}", env!("CARGO_PKG_VERSION"));
    if config_found {
        info!("Loaded configuration from {}", args.config);
    } else {
        info!("Config file not found at {}, using defaults", args.config);
    }

    let source = match script_path {
        Some(path) => read_script(path)?,
        None => {
            config.cache = CacheConfig { capacity: 2 };
            script::DEMO_SCRIPT.to_string()
        }
    };

    // Command line wins over the file
    if let Some(capacity) = args.capacity {
        config.cache.capacity = capacity;
    }

    let metrics_handle = if args.metrics {
        Some(telemetry::install_recorder()?)
    } else {
        None
    };

    // Parse the whole script before touching the cache
    let commands = script::parse_script(&source)?;
    let mut cache = LruCache::from_config(&config.cache)?;

    script::run(&mut cache, &commands, out)?;

    let stats = cache.stats();
    info!(
        "Replay complete: {} entries, {} hits, {} misses, {} evictions",
        cache.len(),
        stats.hit_count,
        stats.miss_count,
        stats.eviction_count
    );

    if args.stats {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
    }

    if let Some(handle) = metrics_handle {
        telemetry::publish(&cache);
        write!(out, "{}", handle.render())?;
    }

    Ok(())
}

/// Initialize logging
///
/// A subscriber that is already installed is kept.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(io::stderr))
            .try_init(),
    };
}

/// Read a script from `path`, or stdin for `None` and `-`
fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read script: {}", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            Ok(buf)
        }
    }
}

fn init_config(path: &str, force: bool) -> Result<()> {
    if Path::new(path).exists() && !force {
        bail!("Config file {} already exists (use --force to overwrite)", path);
    }
    Config::default().save(path)
}
