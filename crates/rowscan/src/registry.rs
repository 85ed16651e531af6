//! # Driver registry
//!
//! Drivers are registered on an explicit [`DriverRegistry`] built at process
//! start with only the drivers the deployment needs.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::config::{Dialect, OpenOptions};
use crate::db::Db;
use crate::error::{Error, Result};
use crate::rows::Rows;
use crate::value::Value;

/// Database drivers implement [`Driver`] to open connections for a dialect.
pub trait Driver: Debug + Send + Sync {
    /// The dialect served by the driver.
    fn dialect(&self) -> Dialect;

    /// Open a connection using a dialect-specific connection string.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    fn open(&self, dsn: &str) -> anyhow::Result<Box<dyn Connection>>;
}

/// An open database connection.
pub trait Connection: Debug + Send {
    /// Execute a query and return the resulting rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails to prepare or execute.
    fn query(&self, sql: &str, params: &[Value]) -> anyhow::Result<Rows>;

    /// Execute a statement that does not return rows (e.g., an `INSERT`,
    /// `UPDATE`, or `DELETE`), returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails to prepare or execute.
    fn exec(&self, sql: &str, params: &[Value]) -> anyhow::Result<u64>;
}

/// Registered drivers, keyed by dialect.
#[derive(Debug, Clone, Default)]
pub struct DriverRegistry {
    drivers: HashMap<Dialect, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver, replacing any earlier driver for its dialect.
    pub fn register(&mut self, driver: impl Driver + 'static) -> &mut Self {
        tracing::debug!(dialect = %driver.dialect(), "registering driver");
        self.drivers.insert(driver.dialect(), Arc::new(driver));
        self
    }

    /// Register a driver, builder style.
    #[must_use]
    pub fn with(mut self, driver: impl Driver + 'static) -> Self {
        self.register(driver);
        self
    }

    /// The driver registered for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDriver`] if none is registered.
    pub fn get(&self, dialect: Dialect) -> Result<Arc<dyn Driver>> {
        self.drivers.get(&dialect).map(Arc::clone).ok_or(Error::UnknownDriver(dialect))
    }

    /// Whether a driver is registered for `dialect`.
    #[must_use]
    pub fn contains(&self, dialect: Dialect) -> bool {
        self.drivers.contains_key(&dialect)
    }

    /// Open a database described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid options,
    /// [`Error::UnknownDriver`] for an unregistered dialect, or
    /// [`Error::Connect`] if the driver fails to connect.
    pub fn open(&self, options: &OpenOptions) -> Result<Db> {
        let dsn = options.dsn()?;
        self.open_dsn(options.dialect, &dsn, options.debug)
    }

    /// Open a database from an explicit connection string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDriver`] for an unregistered dialect, or
    /// [`Error::Connect`] if the driver fails to connect.
    pub fn open_dsn(&self, dialect: Dialect, dsn: &str, debug: bool) -> Result<Db> {
        let driver = self.get(dialect)?;
        tracing::debug!(%dialect, "opening connection");
        let conn = driver.open(dsn).map_err(Error::Connect)?;
        Ok(Db::new(conn, dialect, debug))
    }
}
