use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use clap::Parser;
use tourpanel::cli::commands::{Cli, Commands};
use tourpanel::cli::handlers;

const LOG_ENV: &str = "TOURPANEL_LOG";
const LOG_FILE: &str = "tourpanel.log";

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "warn".into())
}

/// The panel owns the terminal, so its events go to a file
fn init_file_tracing(log_path: &Path) -> std::io::Result<()> {
    let log_file = OpenOptions::new().create(true).append(true).open(log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(())
}

fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn log_file_path(workbook: &Path) -> PathBuf {
    workbook
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(LOG_FILE)
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", e);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch the panel
            let path = match handlers::resolve_workbook_path(cli.workbook.as_deref()) {
                Ok(p) => p,
                Err(e) => fail(e),
            };
            if let Err(e) = init_file_tracing(&log_file_path(&path)) {
                eprintln!("warning: logging disabled: {}", e);
            }
            if let Err(e) = tourpanel::tui::run(&path) {
                fail(e);
            }
        }
        Some(Commands::Demo) => {
            let _ = init_file_tracing(&std::env::temp_dir().join(LOG_FILE));
            if let Err(e) = tourpanel::tui::run_demo() {
                fail(e);
            }
        }
        Some(_) => {
            init_stderr_tracing();
            if let Err(e) = handlers::dispatch(cli) {
                fail(e);
            }
        }
    }
}
