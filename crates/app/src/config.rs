use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgGroup, Args, Parser, Subcommand};
use literacy_core::model::{IdError, UserId};
use storage::sqlite::DEFAULT_IO_TIMEOUT;
use thiserror::Error;

pub const DEFAULT_DB_URL: &str = "sqlite://literacy.sqlite3";

#[derive(Debug, Parser)]
#[command(
    name = "literacy",
    version,
    about = "Practise Chinese characters and track learning progress"
)]
pub struct Cli {
    /// `SQLite` database URL or file path.
    #[arg(long = "db", env = "LITERACY_DB_URL", default_value = DEFAULT_DB_URL, global = true)]
    pub db: String,

    /// Learner whose progress is read and written.
    #[arg(long, env = "LITERACY_USER", default_value = UserId::DEFAULT_LEARNER, global = true)]
    pub user: String,

    /// JSON word list to use instead of the built-in catalog.
    #[arg(long, env = "LITERACY_CATALOG", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Upper bound on a single storage operation, in seconds.
    #[arg(
        long = "io-timeout-secs",
        env = "LITERACY_IO_TIMEOUT_SECS",
        default_value_t = DEFAULT_IO_TIMEOUT.as_secs(),
        global = true
    )]
    pub io_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the words in the catalog.
    Words,
    /// Show one word with the learner's progress and read it aloud.
    Show { word: String },
    /// Record one practice attempt.
    Practice(PracticeArgs),
    /// Print the progress summary.
    Progress {
        #[arg(long)]
        json: bool,
    },
    /// Forget the learner's progress on one word.
    Reset { word: String },
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("outcome").required(true).args(["correct", "wrong"])))]
pub struct PracticeArgs {
    pub word: String,
    #[arg(long)]
    pub correct: bool,
    #[arg(long)]
    pub wrong: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("invalid --user value: {0}")]
    InvalidUser(#[from] IdError),
    #[error("--io-timeout-secs must be at least 1")]
    ZeroTimeout,
    #[error("cannot prepare database file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    pub user: UserId,
    pub catalog_path: Option<PathBuf>,
    pub io_timeout: Duration,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for a blank database URL or learner id, or a zero timeout.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.db.trim().is_empty() {
            return Err(ConfigError::InvalidDbUrl {
                raw: cli.db.clone(),
            });
        }
        if cli.io_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            db_url: normalize_sqlite_url(&cli.db),
            user: UserId::new(&cli.user)?,
            catalog_path: cli.catalog.clone(),
            io_timeout: Duration::from_secs(cli.io_timeout_secs),
        })
    }
}

fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains("mode=memory")
}

/// Turn a bare or relative path into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_memory_url(trimmed) || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directory when missing.
///
/// # Errors
///
/// Returns `ConfigError` if the URL has no file path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let invalid = || ConfigError::InvalidDbUrl {
        raw: db_url.to_owned(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(io_err)?;
    }
    Ok(())
}
