//! crewbook interactive entry point.
//!
//! # Responsibility
//! - Resolve configuration from an optional TOML file plus CLI flags.
//! - Start file logging when a log directory is configured.
//! - Open the configured worker store and hand it to the menu loop.

mod menu;

use clap::Parser;
use crewbook_core::{
    core_version, default_log_level, init_logging, AppConfig, StoreBackend, StoreConfig,
    WorkerService,
};
use log::info;
use menu::Menu;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "crewbook", version, about = "Personnel records manager")]
struct Cli {
    /// TOML settings file.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Storage backend: sqlite, json or memory.
    #[arg(long, value_parser = parse_backend)]
    backend: Option<StoreBackend>,

    /// Database or document file path.
    #[arg(long)]
    path: Option<PathBuf>,

    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,
}

fn parse_backend(value: &str) -> Result<StoreBackend, String> {
    StoreBackend::parse(value)
        .ok_or_else(|| format!("unknown backend `{value}`; expected sqlite|json|memory"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("crewbook: {message}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        // Logging is diagnostics only; the menu still works without it.
        if let Err(err) = init_logging(level, &absolute(log_dir)) {
            eprintln!("crewbook: logging disabled: {err}");
        }
    }

    info!(
        "event=cli_start module=cli status=ok version={} backend={}",
        core_version(),
        config.store.backend.as_str()
    );

    let service = match WorkerService::from_config(&config.store) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("crewbook: cannot open worker store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match Menu::new(&service, stdin.lock(), stdout.lock()).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("crewbook: terminal i/o failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, String> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path).map_err(|err| err.to_string())?,
        None => AppConfig::default(),
    };

    if let Some(backend) = cli.backend {
        let path = if backend == config.store.backend {
            config.store.path.clone()
        } else {
            PathBuf::new()
        };
        config.store = StoreConfig::new(backend, path);
    }
    if let Some(path) = &cli.path {
        config.store.path = path.clone();
    }
    config.store = config.store.with_default_path();

    if cli.log_dir.is_some() {
        config.log_dir = cli.log_dir.clone();
    }
    if cli.log_level.is_some() {
        config.log_level = cli.log_level.clone();
    }
    Ok(config)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
