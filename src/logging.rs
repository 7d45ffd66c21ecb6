// File: ./src/logging.rs
//! Logger setup for the binary: terminal plus a log file in the data dir.
use crate::context::AppContext;
use anyhow::Result;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;

pub fn init(ctx: &dyn AppContext, verbose: bool) -> Result<()> {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("prayer_notes")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    // The log file is the diagnostic record for failed syncs; a missing data
    // dir only costs us that file.
    match ctx.get_log_path() {
        Some(path) => match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
            Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
        },
        None => eprintln!("No data directory; logging to the terminal only"),
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
