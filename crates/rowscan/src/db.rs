//! # Database handle
//!
//! [`Db`] pairs an open [`Connection`] with the row driver, so a query and its
//! materialization are a single call.

use crate::config::Dialect;
use crate::error::Result;
use crate::registry::Connection;
use crate::scan::{scan_all, scan_one};
use crate::shape::Scan;
use crate::value::Value;

/// An open database, as returned by
/// [`DriverRegistry::open`](crate::DriverRegistry::open).
#[derive(Debug)]
pub struct Db {
    conn: Box<dyn Connection>,
    dialect: Dialect,
    debug: bool,
}

impl Db {
    /// Wrap an open connection.
    #[must_use]
    pub fn new(conn: Box<dyn Connection>, dialect: Dialect, debug: bool) -> Self {
        Self {
            conn,
            dialect,
            debug,
        }
    }

    /// The connection's dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The underlying connection.
    #[must_use]
    pub fn connection(&self) -> &dyn Connection {
        &*self.conn
    }

    /// Run a query and materialize every row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or `T` cannot receive rows.
    pub fn query_all<T: Scan>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>> {
        self.log(sql, params);
        let mut rows = self.conn.query(sql, params)?;
        let mut out = Vec::new();
        scan_all(&mut rows, &mut out)?;
        Ok(out)
    }

    /// Run a query and materialize the first row into `dest`, which is left
    /// unmodified when there are no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or `T` cannot receive rows.
    pub fn query_one<T: Scan>(&self, sql: &str, params: &[Value], dest: &mut T) -> Result<()> {
        self.log(sql, params);
        let mut rows = self.conn.query(sql, params)?;
        scan_one(&mut rows, dest)
    }

    /// Execute a statement, returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn exec(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.log(sql, params);
        Ok(self.conn.exec(sql, params)?)
    }

    fn log(&self, sql: &str, params: &[Value]) {
        if self.debug {
            tracing::info!(dialect = %self.dialect, sql, params = ?params, "executing statement");
        }
    }
}
