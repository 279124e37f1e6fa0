//! Handles settings for the application.
//!
//! Sources are layered, later ones winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`settings.toml`, or `--config`)
//! 3. `EXPENSES__*` environment variables (e.g. `EXPENSES__SERVER__PORT`)
//! 4. command-line flags, which also read the plain `PORT`, `DATABASE_URL`
//!    and `CORS_ORIGIN` variables
use chrono_tz::Tz;
use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the workspace crates.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// IANA zone used to decide which calendar month an expense falls in.
    pub timezone: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            timezone: "UTC".to_string(),
        }
    }
}

impl Server {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Database {
    /// sea-orm connection string.
    pub url: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite:./expenses.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

/// The expense tracker REST server.
#[derive(Debug, Default, Parser)]
#[command(name = "expense-tracker", version, about)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Port to listen on.
    #[arg(long, env = "PORT")]
    port: Option<u16>,
    /// Database connection string (e.g. sqlite:./expenses.db?mode=rwc).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Comma-separated list of origins allowed to call the API.
    #[arg(long, env = "CORS_ORIGIN", value_delimiter = ',')]
    cors_origin: Option<Vec<String>>,
    /// Override the log level.
    #[arg(long)]
    log_level: Option<String>,
}

impl Settings {
    fn build(file: File<config::FileSourceFile, FileFormat>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("EXPENSES")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn apply(mut self, args: Args) -> Self {
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(url) = &args.database_url {
            self.database.url = url.clone();
        }
        if let Some(origins) = args.cors_origins() {
            self.server.cors_origins = origins;
        }
        if let Some(level) = args.log_level {
            self.app.level = level;
        }
        self
    }
}

impl Args {
    fn cors_origins(&self) -> Option<Vec<String>> {
        self.cors_origin.as_ref().map(|origins| {
            origins
                .iter()
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        })
    }
}

/// Load settings from every source.
pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let file = match args.config.as_deref() {
        Some(path) => File::with_name(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
    };

    Ok(Settings::build(file)?.apply(args))
}
