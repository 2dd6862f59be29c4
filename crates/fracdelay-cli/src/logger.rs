// SPDX-License-Identifier: LGPL-3.0-or-later

//! Colored stderr logger so stdout stays free for table output.

use std::io::{self, Write};

use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

#[derive(Debug, Clone, Copy)]
pub struct ColorLogger {
    max_level: LevelFilter,
}

impl ColorLogger {
    /// `quiet` wins over `verbose`.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let max_level = if quiet {
            LevelFilter::Off
        } else if verbose {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        };
        Self { max_level }
    }

    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Install as the global logger.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl log::Log for ColorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => eprintln!(
                "{} {}",
                "[ERROR]".red().bold(),
                record.args().to_string().red().bold()
            ),
            Level::Warn => eprintln!(
                "{} {}",
                "[WARN]".yellow().bold(),
                record.args().to_string().yellow()
            ),
            level => eprintln!("[{}] {}", level.to_string().blue(), record.args()),
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn level_selection() {
        assert_eq!(ColorLogger::new(false, false).max_level(), LevelFilter::Info);
        assert_eq!(ColorLogger::new(false, true).max_level(), LevelFilter::Trace);
        assert_eq!(ColorLogger::new(true, true).max_level(), LevelFilter::Off);
    }

    #[test]
    fn debug_hidden_by_default() {
        let logger = ColorLogger::new(false, false);
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn init_installs_global_logger() {
        // The only test in this binary that installs the process logger
        ColorLogger::new(true, false).init().unwrap();
        assert_eq!(log::max_level(), LevelFilter::Off);
        assert!(ColorLogger::new(false, false).init().is_err());
    }
}
