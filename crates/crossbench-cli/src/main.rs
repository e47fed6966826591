//! crossbench CLI application
//!
//! Runs deterministic micro-benchmark kernels on every available engine
//! and reports each engine's best per-call time side by side.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use tracing::{debug, error};

use crossbench_cli::commands::{EnginesCommand, ListCommand, RunCommand, VerifyCommand};
use crossbench_cli::config::{CliConfig, ConfigBuilder};
use crossbench_cli::exit::{EXIT_GENERIC_FAIL, EXIT_SUCCESS};

/// crossbench - cross-engine micro-benchmark harness
#[derive(Parser)]
#[command(name = "crossbench")]
#[command(about = "Cross-engine micro-benchmark harness")]
#[command(long_about = r#"
crossbench times the same deterministic kernels (Fibonacci, prime sieve,
integer arithmetic loop, matrix multiply checksum) on every available engine
and reports each engine's best per-call time next to the reference engine.

Examples:
  # List the benchmark cases
  crossbench list

  # Show which engines are available
  crossbench engines

  # Benchmark one case with its default parameter
  crossbench run --case fib

  # Custom parameter and rounds, JSON to a file
  crossbench run --case matmul --param 200 --rounds 10 --format json --output matmul.json

  # Check that every engine returns the reference checksum
  crossbench verify --case prime_sieve --param 1000000
"#)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark one case on every engine
    #[command(alias = "bench")]
    Run(RunCommand),

    /// List benchmark cases
    #[command(alias = "cases")]
    List(ListCommand),

    /// Show engine availability
    Engines(EnginesCommand),

    /// Compare every engine's checksum with the reference kernels
    Verify(VerifyCommand),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Show configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate_completions(shell);
        return Ok(());
    }

    let path = config_path(&cli);
    let config = load_configuration(&cli, &path)?;
    setup_logging(&config)?;

    let result = match cli.command {
        Some(Commands::Run(cmd)) => cmd.execute(&config).await,
        Some(Commands::List(cmd)) => cmd.execute(),
        Some(Commands::Engines(cmd)) => cmd.execute(&config).await,
        Some(Commands::Verify(cmd)) => cmd.execute(&config).await,
        Some(Commands::Config { action }) => handle_config_command(action, &path, &config),
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(EXIT_SUCCESS)
        }
    };

    match result {
        Ok(EXIT_SUCCESS) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Command failed: {}", e);

            let mut source = e.source();
            while let Some(err) = source {
                error!("  Caused by: {}", err);
                source = err.source();
            }

            std::process::exit(EXIT_GENERIC_FAIL);
        }
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(|| {
        CliConfig::default_config_path().unwrap_or_else(|_| PathBuf::from("crossbench.toml"))
    })
}

/// Load configuration from file and merge with environment and CLI arguments
fn load_configuration(cli: &Cli, path: &Path) -> Result<CliConfig> {
    // An explicitly requested file must parse; the default location may be broken
    let builder = match ConfigBuilder::from_file(path) {
        Ok(builder) => builder,
        Err(e) if cli.config.is_some() => return Err(e),
        Err(e) => {
            eprintln!("warning: ignoring {}: {e:#}", path.display());
            ConfigBuilder::new()
        }
    };

    builder.log_level(cli.log_level.clone()).build().context("Failed to build configuration")
}

/// Setup logging based on configuration. `RUST_LOG` wins over the configured level.
fn setup_logging(config: &CliConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    let installed = match (config.logging.format.as_str(), config.logging.timestamps) {
        ("json", _) => subscriber.json().with_timer(tracing_subscriber::fmt::time::uptime()).try_init(),
        ("compact", true) => subscriber.compact().try_init(),
        ("compact", false) => subscriber.compact().without_time().try_init(),
        (_, true) => subscriber.pretty().try_init(),
        (_, false) => subscriber.pretty().without_time().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    debug!(level = %config.logging.level, format = %config.logging.format, "logging initialised");
    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn handle_config_command(action: ConfigAction, path: &Path, config: &CliConfig) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            let text = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
            println!("{text}");
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(EXIT_SUCCESS)
}
