/// Version injected at compile time via TFGRAPH_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TFGRAPH_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tfgraph::commands;
use tfgraph::config::Config;
use tfgraph::provider::get_provider;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Classify infrastructure resources into graph nodes and edges
#[derive(Parser, Debug)]
#[command(name = "tfgraph", version, about, long_about = None)]
struct Args {
    /// Cloud provider whose rules apply
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print whether a resource type is a node, an edge or neither
    Classify {
        /// Resource type name
        resource: String,
    },
    /// Print the inbound and outbound references of a resource config
    Refs {
        /// Resource type name
        resource: String,
        /// JSON or YAML file holding the resource configuration
        file: PathBuf,
        /// Fail on malformed values instead of skipping them
        #[arg(long)]
        strict: bool,
        /// Prune the config to the used attributes first
        #[arg(long)]
        prune: bool,
    },
    /// Print the documented schema of a resource type
    Describe {
        /// Resource type name
        resource: String,
        /// Look the type up as a data source
        #[arg(long)]
        data_source: bool,
    },
    /// List the configuration fields the provider reads
    Attributes,
    /// Print a resource config reduced to the fields the provider reads
    Prune {
        /// JSON or YAML file holding the resource configuration
        file: PathBuf,
    },
    /// Show or change the saved defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the saved configuration
    Show,
    /// Change saved defaults
    Set {
        /// Default provider
        #[arg(long)]
        provider: Option<String>,
        /// Fail on malformed values by default
        #[arg(long)]
        strict: Option<bool>,
        /// Prune configs before extraction by default
        #[arg(long)]
        prune: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = Config::log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tfgraph {} logging {:?} to {:?}", VERSION, level, log_path);

    Ok(Some(guard))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();
    let provider_type = config.effective_provider(args.provider.as_deref())?;
    let provider = get_provider(provider_type);

    tracing::info!(
        "provider={} strict={} prune={} config={:?}",
        provider_type,
        config.strict,
        config.prune,
        Config::config_path()
    );

    match args.command {
        Command::Classify { resource } => {
            println!("{}", commands::classify(provider.as_ref(), &resource).as_str());
        }
        Command::Refs {
            resource,
            file,
            strict,
            prune,
        } => {
            let resource_config = commands::read_resource_config(&file)?;
            let (refs, skipped) = commands::references(
                provider.as_ref(),
                &resource,
                &resource_config,
                config.effective_mode(strict),
                prune || config.prune,
            )?;
            for err in &skipped {
                eprintln!("warning: skipped {}", err);
            }
            println!("{}", serde_json::to_string_pretty(&refs)?);
        }
        Command::Describe {
            resource,
            data_source,
        } => {
            println!(
                "{}",
                commands::describe(provider.as_ref(), &resource, data_source)?
            );
        }
        Command::Attributes => {
            println!("{}", commands::attributes(provider.as_ref()));
        }
        Command::Prune { file } => {
            let resource_config = commands::read_resource_config(&file)?;
            println!("{}", commands::prune(provider.as_ref(), &resource_config)?);
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Set {
                provider,
                strict,
                prune,
            } => {
                config.update(provider.as_deref(), strict, prune)?;
                config.save()?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        },
    }

    Ok(())
}
