//! Server configuration.
//!
//! Settings are merged from `conf/application.yml`, environment variables
//! with the `teamgrid` prefix, and a handful of command line overrides,
//! then exposed through typed accessors.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::Level;

use teamgrid_persistence::StorageMode;

use crate::startup::{LoggingConfig, default_log_dir};

// Property names
const STANDALONE_MODE_PROPERTY: &str = "teamgrid.standalone";
const STORAGE_MODE_PROPERTY: &str = "teamgrid.storage.mode";
const SERVER_PORT_PROPERTY: &str = "server.port";
const SERVER_CONTEXT_PATH_PROPERTY: &str = "teamgrid.server.contextPath";
const EVENT_QUEUE_SIZE_PROPERTY: &str = "teamgrid.events.queueSize";

const DEFAULT_SERVER_PORT: u16 = 8460;
const DEFAULT_EVENT_QUEUE_SIZE: usize = 1024;

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command()]
struct Cli {
    #[arg(short = 'm', long = "mode")]
    mode: Option<String>,
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> Self {
        let args = Cli::parse();

        let env_source = Environment::with_prefix("teamgrid")
            .separator(".")
            .try_parsing(true);
        let mut builder = Config::builder()
            .add_source(env_source)
            .add_source(config::File::with_name("conf/application.yml"));

        if let Some(mode) = args.mode {
            builder = builder
                .set_override(STANDALONE_MODE_PROPERTY, mode == "standalone")
                .expect("standalone mode override");
        }
        if let Some(port) = args.port {
            builder = builder
                .set_override(SERVER_PORT_PROPERTY, i64::from(port))
                .expect("server port override");
        }
        if let Some(url) = args.database_url {
            builder = builder
                .set_override("db.url", url)
                .expect("database URL override");
        }

        let config = builder
            .build()
            .expect("cannot load configuration, check conf/application.yml");

        Configuration { config }
    }

    // ----------------------------------------------------------------------
    // Run mode
    // ----------------------------------------------------------------------

    pub fn is_standalone(&self) -> bool {
        self.config
            .get_bool(STANDALONE_MODE_PROPERTY)
            .unwrap_or(false)
    }

    pub fn startup_mode(&self) -> &'static str {
        if self.is_standalone() {
            "standalone"
        } else {
            "cluster"
        }
    }

    pub fn version(&self) -> String {
        self.config
            .get_string("teamgrid.version")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string())
    }

    /// Storage backend selected by configuration
    ///
    /// Standalone mode always runs on the in-memory store.
    pub fn storage_mode(&self) -> StorageMode {
        if self.is_standalone() {
            return StorageMode::Memory;
        }
        self.config
            .get_string(STORAGE_MODE_PROPERTY)
            .unwrap_or_else(|_| "external_db".to_string())
            .parse()
            .unwrap_or(StorageMode::ExternalDb)
    }

    pub fn event_queue_size(&self) -> usize {
        self.config
            .get_int(EVENT_QUEUE_SIZE_PROPERTY)
            .unwrap_or(DEFAULT_EVENT_QUEUE_SIZE as i64) as usize
    }

    // ----------------------------------------------------------------------
    // HTTP server
    // ----------------------------------------------------------------------

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or_else(|_| "0.0.0.0".into())
    }

    pub fn server_main_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT_PROPERTY)
            .unwrap_or(DEFAULT_SERVER_PORT.into()) as u16
    }

    pub fn server_context_path(&self) -> String {
        self.config
            .get_string(SERVER_CONTEXT_PATH_PROPERTY)
            .unwrap_or_default()
    }

    // ----------------------------------------------------------------------
    // Logging
    // ----------------------------------------------------------------------

    pub fn log_dir(&self) -> Option<String> {
        self.config.get_string("teamgrid.logs.path").ok()
    }

    pub fn log_console_enabled(&self) -> bool {
        self.config.get_bool("teamgrid.logs.console").unwrap_or(true)
    }

    pub fn log_file_enabled(&self) -> bool {
        self.config.get_bool("teamgrid.logs.file").unwrap_or(true)
    }

    pub fn log_level(&self) -> String {
        self.config
            .get_string("teamgrid.logs.level")
            .unwrap_or_else(|_| "info".into())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        let level = self.log_level().parse().unwrap_or(Level::INFO);
        LoggingConfig {
            log_dir: self
                .log_dir()
                .map(PathBuf::from)
                .unwrap_or_else(default_log_dir),
            console_output: self.log_console_enabled(),
            console_level: level,
            file_logging: self.log_file_enabled(),
            file_level: level,
            ..LoggingConfig::default()
        }
    }

    // ----------------------------------------------------------------------
    // Database
    // ----------------------------------------------------------------------

    pub async fn database_connection(
        &self,
    ) -> std::result::Result<DatabaseConnection, Box<dyn std::error::Error>> {
        let pool = |key: &str, default: i64| {
            self.config
                .get_int(&format!("db.pool.config.{key}"))
                .unwrap_or(default)
        };

        let max_conns = pool("maximumPoolSize", 100) as u32;
        let min_conns = pool("minimumPoolSize", 1) as u32;
        let connect_secs = pool("connectionTimeout", 30) as u64;
        let acquire_secs = pool("initializationFailTimeout", 8) as u64;
        let idle_secs = pool("idleTimeout", 10) as u64;
        let lifetime_secs = pool("maxLifetime", 1800) as u64;
        let sqlx_logging = self
            .config
            .get_bool("db.pool.config.sqlxLogging")
            .unwrap_or(false);

        let mut options = ConnectOptions::new(self.config.get_string("db.url")?);
        options
            .max_connections(max_conns)
            .min_connections(min_conns)
            .connect_timeout(Duration::from_secs(connect_secs))
            .acquire_timeout(Duration::from_secs(acquire_secs))
            .idle_timeout(Duration::from_secs(idle_secs))
            .max_lifetime(Duration::from_secs(lifetime_secs))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_conns,
            min_conns,
            connect_secs,
            idle_secs,
            lifetime_secs,
            sqlx_logging,
            "Connecting to external database"
        );

        Ok(Database::connect(options).await?)
    }
}

impl Configuration {
    /// A configuration backed only by built-in defaults, for tests
    pub fn empty() -> Self {
        Configuration {
            config: Config::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_configuration_defaults() {
        let configuration = Configuration::empty();
        assert!(!configuration.is_standalone());
        assert_eq!(configuration.startup_mode(), "cluster");
        assert_eq!(configuration.server_address(), "0.0.0.0");
        assert_eq!(configuration.server_main_port(), 8460);
        assert_eq!(configuration.server_context_path(), "");
        assert_eq!(configuration.event_queue_size(), 1024);
    }

    #[test]
    fn test_standalone_forces_memory_storage() {
        let config = Config::builder()
            .set_override(STANDALONE_MODE_PROPERTY, true)
            .unwrap()
            .set_override(STORAGE_MODE_PROPERTY, "external_db")
            .unwrap()
            .build()
            .unwrap();
        let configuration = Configuration { config };
        assert_eq!(configuration.storage_mode(), StorageMode::Memory);
    }

    #[test]
    fn test_storage_mode_parsing() {
        let config = Config::builder()
            .set_override(STORAGE_MODE_PROPERTY, "memory")
            .unwrap()
            .build()
            .unwrap();
        let configuration = Configuration { config };
        assert_eq!(configuration.storage_mode(), StorageMode::Memory);

        assert_eq!(
            Configuration::empty().storage_mode(),
            StorageMode::ExternalDb
        );
    }

    #[test]
    fn test_logging_config_from_configuration() {
        let config = Config::builder()
            .set_override("teamgrid.logs.path", "/tmp/teamgrid-logs")
            .unwrap()
            .set_override("teamgrid.logs.console", false)
            .unwrap()
            .set_override("teamgrid.logs.level", "debug")
            .unwrap()
            .build()
            .unwrap();
        let configuration = Configuration { config };
        let logging = configuration.logging_config();
        assert_eq!(logging.log_dir, PathBuf::from("/tmp/teamgrid-logs"));
        assert!(!logging.console_output);
        assert!(logging.file_logging);
        assert_eq!(logging.console_level, Level::DEBUG);
    }
}
