use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;

/// Lines kept in memory before the oldest are dropped
pub const MAX_RECENT_LINES: usize = 500;

/// Log sink wiring the `log` facade to stderr, an optional file, and an
/// in-memory buffer of recent lines.
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<String>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_RECENT_LINES))),
        }
    }

    /// Build the dispatch for `config` without installing it.
    pub fn dispatch(&self, config: &LoggingConfig) -> Result<fern::Dispatch> {
        let level = config.level_filter()?;
        let logs = Arc::clone(&self.logs);

        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} - {} - {} - {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.target(),
                    record.level(),
                    message
                ))
            })
            .level(level)
            // Driver chatter drowns out our own lines at info.
            .level_for("sqlx", LevelFilter::Warn)
            .level_for("sea_orm", LevelFilter::Warn)
            .chain(std::io::stderr())
            .chain(fern::Output::call(move |record| {
                if let Ok(mut logs) = logs.lock() {
                    if logs.len() >= MAX_RECENT_LINES {
                        logs.pop_front();
                    }
                    logs.push_back(record.args().to_string());
                }
            }));

        if let Some(path) = &config.file {
            let file = fern::log_file(path).with_context(|| format!("Failed to open log file {:?}", path))?;
            dispatch = dispatch.chain(file);
        }

        Ok(dispatch)
    }

    /// Install as the global logger. Fails if one is already installed.
    pub fn init(&self, config: &LoggingConfig) -> Result<()> {
        self.dispatch(config)?
            .apply()
            .context("A global logger is already installed")
    }

    /// Get all buffered lines (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Clear all buffered lines
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
