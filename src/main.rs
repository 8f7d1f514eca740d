//! albumsweep - Main entry point
//!
//! Parses the command line, loads configuration, sets up logging and signal
//! handling, then runs either the interactive menu or a single action.

use albumsweep::actuator;
use albumsweep::app::App;
use albumsweep::cli::{Cli, Commands};
use albumsweep::config::{LoggingConfig, SweepConfig};
use albumsweep::menu::{self, Action};
use albumsweep::signals::{StopSignal, init_signal_handlers};
use albumsweep::types::ActuatorBackend;
use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize tracing. `RUST_LOG` overrides the configured level.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &config.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse_args();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init { force }) => {
            init_logging(&LoggingConfig::default())?;
            return write_default_config(&cli.config, force);
        }
        Some(Commands::Validate { file }) => {
            init_logging(&LoggingConfig::default())?;
            let path = file.unwrap_or(cli.config);
            return validate_config(&path);
        }
        _ => {}
    }

    let config = SweepConfig::load_from_file(&cli.config).with_context(|| {
        format!(
            "Failed to load configuration {:?} (create one with `albumsweep init`)",
            cli.config
        )
    })?;
    config.validate().context("Configuration validation failed")?;
    init_logging(&config.logging)?;
    info!(config = ?cli.config, dry_run = cli.dry_run, "albumsweep starting up");

    let stop = StopSignal::new();
    if let Err(e) = init_signal_handlers(&stop) {
        warn!("Failed to initialize signal handlers: {}", e);
    }

    let dry_run = cli.dry_run || config.actuator.backend == ActuatorBackend::DryRun;
    let actuator = actuator::from_config(&config.actuator, dry_run);
    let mut app = App::new(config, &cli.config, actuator, dry_run).with_stop_signal(stop);

    // All operator input, including hover confirmations while recording.
    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    let action = match cli.command {
        None | Some(Commands::Menu) => {
            debug!("Launching interactive menu");
            return menu::run_menu(&mut app, &mut input, &mut output);
        }
        Some(Commands::Refresh) => Action::Refresh,
        Some(Commands::MarkRename) => Action::MarkRename,
        Some(Commands::MarkDelete) => Action::MarkDelete,
        Some(Commands::Record { kind }) => Action::Record(kind),
        Some(Commands::Rename) => Action::Rename,
        Some(Commands::Delete) => Action::Delete,
        Some(Commands::Init { .. } | Commands::Validate { .. }) => return Ok(()),
    };
    menu::perform(&mut app, action, &mut input, &mut output)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }
    SweepConfig::default().save_to_file(path)?;
    info!("Wrote default configuration to {:?}", path);
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", path);
    let config = SweepConfig::load_from_file(path)
        .with_context(|| format!("Failed to load configuration file {:?}", path))?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration validation successful");
    println!("✓ Configuration file is valid: {}", path.display());
    Ok(())
}
