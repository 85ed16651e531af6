//! # Connection configuration
//!
//! [`OpenOptions`] describes how to reach a database and builds the
//! dialect-specific connection string.

use std::fmt;
use std::str::FromStr;

use fromenv::FromEnv;

use crate::error::Error;

/// Supported database dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `MySQL` / `MariaDB`.
    MySql,
    /// `PostgreSQL`.
    Postgres,
    /// `SQLite`.
    #[default]
    Sqlite,
    /// Gremlin graph server.
    Gremlin,
}

impl Dialect {
    /// Canonical driver name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite3",
            Self::Gremlin => "gremlin",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite3" | "sqlite" => Ok(Self::Sqlite),
            "gremlin" => Ok(Self::Gremlin),
            _ => Err(Error::Config(format!("unsupported dialect `{s}`"))),
        }
    }
}

/// Options used to open a database connection.
///
/// Loaded from `ROWSCAN_*` environment variables with [`OpenOptions::load`],
/// or built directly.
#[derive(Debug, Clone, FromEnv)]
pub struct OpenOptions {
    /// User name.
    #[env(from = "ROWSCAN_USER", default = "")]
    pub user: String,

    /// Password.
    #[env(from = "ROWSCAN_PASSWORD", default = "")]
    pub password: String,

    /// Server host.
    #[env(from = "ROWSCAN_HOST", default = "localhost")]
    pub host: String,

    /// Server port.
    #[env(from = "ROWSCAN_PORT", default = "")]
    pub port: String,

    /// Database name.
    #[env(from = "ROWSCAN_DATABASE", default = "")]
    pub database: String,

    /// Log every statement.
    #[env(from = "ROWSCAN_DEBUG", default = "false")]
    pub debug: bool,

    /// Database dialect.
    #[env(from = "ROWSCAN_DIALECT", default = "sqlite3")]
    pub dialect: Dialect,

    /// Database file, `SQLite` only.
    #[env(from = "ROWSCAN_SQLITE_FILE", default = "file::memory:")]
    pub file_for_sqlite: String,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            host: "localhost".to_string(),
            port: String::new(),
            database: String::new(),
            debug: false,
            dialect: Dialect::Sqlite,
            file_for_sqlite: "file::memory:".to_string(),
        }
    }
}

impl OpenOptions {
    /// Options for the given dialect, everything else defaulted.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Load options from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is present but invalid.
    pub fn load() -> crate::Result<Self> {
        Self::from_env()
            .finalize()
            .map_err(|e| Error::Config(format!("issue loading open options: {e}")))
    }

    /// The dialect-specific connection string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the host (network dialects) or the
    /// database file (`SQLite`) is empty.
    pub fn dsn(&self) -> crate::Result<String> {
        let dsn = match self.dialect {
            Dialect::MySql => {
                self.require_host()?;
                format!(
                    "{}:{}@({}:{})/{}?interpolateParams=true&loc=Local&parseTime=True&timeTruncate=1s",
                    self.user, self.password, self.host, self.port, self.database
                )
            }
            Dialect::Postgres => {
                self.require_host()?;
                format!(
                    "host={} port={} user={} dbname={} password={}",
                    self.host, self.port, self.user, self.database, self.password
                )
            }
            Dialect::Sqlite => {
                if self.file_for_sqlite.is_empty() {
                    return Err(Error::Config("sqlite requires a database file".to_string()));
                }
                format!("{}?mode=memory&cache=shared", self.file_for_sqlite)
            }
            Dialect::Gremlin => {
                self.require_host()?;
                format!("{}:{}", self.host, self.port)
            }
        };
        Ok(dsn)
    }

    fn require_host(&self) -> crate::Result<()> {
        if self.host.is_empty() {
            return Err(Error::Config(format!("{} requires a host", self.dialect)));
        }
        Ok(())
    }
}
