//! Logger setup: terminal output plus `publisher.log` in the logs location.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use publisher_engine::ensure_output_dir;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_FILENAME: &str = "publisher.log";

/// Installs the global logger. A log file that cannot be created only costs
/// the file output; terminal logging still works.
pub fn initialize(logs_dir: &Path) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(file_logger) = create_file_logger(logs_dir, level, config) {
        loggers.push(file_logger);
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // fantoccini and hyper are chatty at info.
        .add_filter_allow_str("publisher")
        .build()
}

fn create_file_logger(
    logs_dir: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    if let Err(err) = ensure_output_dir(logs_dir) {
        eprintln!("Warning: Could not create logs directory {logs_dir:?}: {err}");
        return None;
    }
    let log_path = logs_dir.join(LOG_FILENAME);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {log_path:?}: {err}");
            None
        }
    }
}
