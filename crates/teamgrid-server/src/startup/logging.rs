//! Multi-file logging setup.
//!
//! Events are routed to per-component rolling files by their `tracing`
//! target, alongside a root file that records everything:
//!
//! | Log File        | Component                    | Target Prefix        |
//! |-----------------|------------------------------|----------------------|
//! | teamgrid.log    | Root logger (all components) | (all)                |
//! | timeline.log    | Timeline engine              | teamgrid_timeline    |
//! | persistence.log | Storage backends             | teamgrid_persistence |
//! | server.log      | HTTP handlers and startup    | teamgrid_server      |
//!
//! The default log directory is `~/teamgrid/logs`; the `teamgrid.logs.path`
//! config key overrides it. `RUST_LOG` tightens or relaxes the console and
//! root-file levels, while component files always record their targets in
//! full.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// File that receives every event regardless of target.
const ROOT_LOG_FILE: &str = "teamgrid.log";

/// Per-component files, each paired with the target prefixes routed to it.
const COMPONENT_LOGS: &[(&str, &[&str])] = &[
    ("timeline.log", &["teamgrid_timeline"]),
    ("persistence.log", &["teamgrid_persistence"]),
    ("server.log", &["teamgrid_server"]),
];

/// `~/teamgrid/logs`, falling back under `/tmp` when `HOME` is unset.
pub fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{}/teamgrid/logs", home))
}

/// Runtime logging options, resolved from the application configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory holding all rolling log files
    pub log_dir: PathBuf,
    /// Mirror events to the console
    pub console_output: bool,
    /// Fallback console level when `RUST_LOG` is unset
    pub console_level: Level,
    /// Write rolling log files
    pub file_logging: bool,
    /// Fallback file level when `RUST_LOG` is unset
    pub file_level: Level,
    /// Rotation applied to every file
    pub rotation: Rotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: true,
            file_level: Level::INFO,
            rotation: Rotation::DAILY,
        }
    }
}

/// Keeps the non-blocking file writers alive.
///
/// Dropping the guard flushes and stops the background writer threads, so
/// hold it until the process exits.
pub struct LoggingGuard(Vec<WorkerGuard>);

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global `tracing` subscriber.
///
/// Builds an optional console layer, a rolling file layer for
/// [`ROOT_LOG_FILE`], and one rolling file layer per [`COMPONENT_LOGS`]
/// entry, then registers them as a single layered subscriber. Component
/// layers filter by target prefix at TRACE so they capture everything their
/// component emits; the console and root file take their level from
/// `RUST_LOG` or the configured fallbacks.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console_output {
        layers.push(Box::new(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter(config.console_level)),
        ));
    }

    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;

        let (writer, guard) = rolling_writer(config, ROOT_LOG_FILE);
        guards.push(guard);
        layers.push(file_layer(writer, env_filter(config.file_level)));

        for &(file_name, prefixes) in COMPONENT_LOGS {
            let (writer, guard) = rolling_writer(config, file_name);
            guards.push(guard);
            layers.push(file_layer(writer, target_filter(prefixes)));
        }
    }

    Registry::default().with(layers).try_init()?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            files = COMPONENT_LOGS.len() + 1,
            "Rolling log files initialized"
        );
    }

    Ok(LoggingGuard(guards))
}

/// Non-blocking rolling appender for one file under the configured log dir.
fn rolling_writer(config: &LoggingConfig, file_name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(config.rotation.clone(), &config.log_dir, file_name);
    tracing_appender::non_blocking(appender)
}

/// Plain-text fmt layer writing to `writer`, gated by `filter`.
fn file_layer<F>(writer: NonBlocking, filter: F) -> BoxedLayer
where
    F: tracing_subscriber::layer::Filter<Registry> + Send + Sync + 'static,
{
    Box::new(
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(filter),
    )
}

/// `RUST_LOG` when set, otherwise the given fallback level.
fn env_filter(fallback: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback.to_string()))
}

/// Matches every target under any of `prefixes`, at all levels.
fn target_filter(prefixes: &[&str]) -> Targets {
    prefixes.iter().fold(Targets::new(), |targets, prefix| {
        targets.with_target(*prefix, LevelFilter::TRACE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_console_and_files() {
        let config = LoggingConfig::default();
        assert!(config.console_output);
        assert!(config.file_logging);
        assert_eq!(config.console_level, Level::INFO);
        assert_eq!(config.file_level, Level::INFO);
        assert!(config.log_dir.ends_with("teamgrid/logs"));
    }

    #[test]
    fn component_log_table_is_well_formed() {
        for &(file_name, prefixes) in COMPONENT_LOGS {
            assert!(file_name.ends_with(".log"), "bad file name: {file_name}");
            assert_ne!(file_name, ROOT_LOG_FILE);
            assert!(!prefixes.is_empty(), "{file_name} routes no targets");
        }
    }

    #[test]
    fn target_filter_routes_by_module_prefix() {
        let filter = target_filter(&["teamgrid_timeline"]);
        assert!(filter.would_enable("teamgrid_timeline::plan", &Level::TRACE));
        assert!(!filter.would_enable("teamgrid_client::drag", &Level::ERROR));
    }

    #[test]
    fn init_logging_writes_the_root_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            log_dir: dir.path().to_path_buf(),
            console_output: false,
            ..LoggingConfig::default()
        };

        let guard = init_logging(&config).unwrap();
        tracing::info!("logging smoke test");
        drop(guard);

        let has_root_file = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .any(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(ROOT_LOG_FILE)
            });
        assert!(has_root_file);
    }
}
