//! Tracing setup for hosts without their own subscriber.
//!
//! - level filtering per module, rendered as an `EnvFilter` string
//! - `RUST_LOG` wins over the configured filter when set
//! - initialization is idempotent; the first call wins
//!
//! Spawn and loot decisions log at `debug`, so they only show up when the
//! server config has `EnableDebugLogging` set (see [`TracingConfig::for_server`]).
//! [`SpookyNightsPlugin`](crate::plugin::SpookyNightsPlugin) adds
//! [`LoggingPlugin`] with those filters unless the host added one first.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Installs the global subscriber when the app is built.
#[derive(Debug, Clone, Default)]
pub struct LoggingPlugin {
    pub config: TracingConfig,
}

impl LoggingPlugin {
    pub fn for_server(config: &ServerConfig) -> Self {
        Self {
            config: TracingConfig::for_server(config),
        }
    }
}

impl Plugin for LoggingPlugin {
    fn build(&self, _app: &mut App) {
        init_tracing(&self.config);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_thread_ids: bool,
    pub show_targets: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("spooky_core::config".to_string(), LogLevel::Info),
                ("spooky_core::spawn".to_string(), LogLevel::Info),
                ("spooky_core::loot".to_string(), LogLevel::Info),
            ],
            show_thread_ids: false,
            show_targets: true,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// Default filters, with decision logging raised to `debug` when the
    /// server config asks for it.
    pub fn for_server(config: &ServerConfig) -> Self {
        let mut tracing = Self::default();
        if config.enable_debug_logging {
            tracing.set_module_level("spooky_core::spawn", LogLevel::Debug);
            tracing.set_module_level("spooky_core::loot", LogLevel::Debug);
        }
        tracing
    }

    pub fn set_module_level(&mut self, module: &str, level: LogLevel) {
        match self.module_filters.iter_mut().find(|(m, _)| m == module) {
            Some((_, existing)) => *existing = level,
            None => self.module_filters.push((module.to_string(), level)),
        }
    }

    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a global `fmt` subscriber. A subscriber installed earlier by the
/// host is left alone.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let (thread_ids, targets, file_line) =
        (config.show_thread_ids, config.show_targets, config.show_file_line);
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(targets)
            .with_thread_ids(thread_ids)
            .with_file(file_line)
            .with_line_number(file_line)
            .compact();

        let _ = subscriber.try_init();
    });
}
