//! CLI entry point.
//!
//! # Responsibility
//! - Load the default config, or a JSON config given as the first argument.
//! - Start file logging in the configured log directory.
//! - Bootstrap `life_manager_core`, run one habit reminder check and print
//!   the published reminders.
//! - Exit non-zero when startup fails.

use life_manager_core::{default_log_level, init_logging, AppConfig, LifeManager};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("life_manager_core version={}", life_manager_core::core_version());

    let config = match std::env::args().nth(1) {
        Some(path) => match AppConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("config error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    match std::env::current_dir() {
        Ok(cwd) => {
            if let Err(err) = init_logging(default_log_level(), &config.resolved_log_dir(&cwd)) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    let mut manager = match LifeManager::bootstrap(config) {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("startup failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("database={}", manager.config.db_path.display());

    match manager.habits.check_reminders() {
        Ok(published) => {
            for message in manager.habits.notifications().history() {
                println!("{message}");
            }
            println!("reminders={published}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("reminder check failed: {err}");
            ExitCode::FAILURE
        }
    }
}
