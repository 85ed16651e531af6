#![doc = include_str!("../README.md")]

//! # `SQLite` driver
//!
//! A single `rusqlite` connection shared behind a mutex. Queries are fetched
//! eagerly into [`Rows`].

#![forbid(unsafe_code)]
#![allow(clippy::significant_drop_tightening)]

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rowscan::{Column, Connection, Dialect, Driver, Kind, Rows, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::params_from_iter;

/// Opens `SQLite` connections for [`Dialect::Sqlite`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn open(&self, dsn: &str) -> Result<Box<dyn Connection>> {
        Ok(Box::new(SqliteConnection::open(dsn)?))
    }
}

/// An open `SQLite` database.
#[derive(Debug, Clone)]
pub struct SqliteConnection {
    // rusqlite::Connection isn't `Sync`
    conn: Arc<parking_lot::Mutex<rusqlite::Connection>>,
}

impl SqliteConnection {
    /// Open a database file, `:memory:`, or `file:` URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(dsn: &str) -> Result<Self> {
        tracing::debug!(dsn, "opening SQLite connection");
        let conn = rusqlite::Connection::open(dsn)
            .with_context(|| format!("failed to open SQLite database `{dsn}`"))?;
        Ok(Self {
            conn: Arc::new(parking_lot::Mutex::new(conn)),
        })
    }
}

impl Connection for SqliteConnection {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Rows> {
        tracing::debug!(sql, "executing query");
        let params = params.iter().map(to_sqlite).collect::<Result<Vec<_>>>()?;

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).context("failed to prepare statement")?;

        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .enumerate()
            .map(|(ordinal, column)| {
                let described = Column::new(ordinal, column.name());
                match column.decl_type() {
                    Some(decl) => {
                        described.with_scan_type(natural_kind(decl)).with_decl_type(decl)
                    }
                    None => described,
                }
            })
            .collect();
        let width = columns.len();

        let mut result = Rows::new(columns);
        let mut rows =
            stmt.query(params_from_iter(params.iter())).context("failed to execute query")?;

        while let Some(row) = rows.next().context("failed to fetch row")? {
            let values = (0..width)
                .map(|i| from_sqlite(row.get_ref(i).context("failed to get column value")?))
                .collect::<Result<Vec<_>>>()?;
            result.push(values)?;
        }

        tracing::debug!(rows = result.remaining(), "fetched rows");
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64> {
        tracing::debug!(sql, "executing statement");
        let params = params.iter().map(to_sqlite).collect::<Result<Vec<_>>>()?;

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).context("failed to prepare statement")?;
        let affected =
            stmt.execute(params_from_iter(params.iter())).context("failed to execute statement")?;

        Ok(u64::try_from(affected)?)
    }
}

/// The kind a column naturally scans into, from its declared type.
///
/// Follows `SQLite`'s affinity rules, recognizing a few common declarations
/// (`BOOLEAN`, `DATE`, `DATETIME`, `JSON`, ...) that have no affinity of
/// their own. `BIT` columns are left untyped; their byte strings are read
/// through [`rowscan::Bits`].
#[must_use]
pub fn natural_kind(decl_type: &str) -> Kind {
    let decl = decl_type.to_ascii_uppercase();
    let has = |needle: &str| decl.contains(needle);

    if decl.starts_with("BIT") && !has("INT") {
        Kind::Any
    } else if has("BOOL") {
        Kind::Bool
    } else if has("DATETIME") || has("TIMESTAMP") {
        Kind::Timestamp
    } else if has("DATE") {
        Kind::Date
    } else if has("TIME") {
        Kind::Time
    } else if has("JSON") {
        Kind::Json
    } else if has("INT") {
        Kind::Int
    } else if has("CHAR") || has("CLOB") || has("TEXT") {
        Kind::Text
    } else if has("BLOB") {
        Kind::Bytes
    } else if has("REAL") || has("FLOA") || has("DOUB") {
        Kind::Float
    } else {
        Kind::Any
    }
}

fn to_sqlite(value: &Value) -> Result<SqlValue> {
    let converted = match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::UInt(u) => match i64::try_from(*u) {
            Ok(i) => SqlValue::Integer(i),
            Err(_) => bail!("unsigned value {u} does not fit an SQLite integer"),
        },
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Bytes(b) => SqlValue::Blob(b.clone()),
        Value::Date(d) => SqlValue::Text(d.to_string()),
        Value::Time(t) => SqlValue::Text(t.to_string()),
        Value::Timestamp(ts) => SqlValue::Text(ts.naive_utc().to_string()),
        Value::Json(v) => SqlValue::Text(v.to_string()),
    };
    Ok(converted)
}

fn from_sqlite(value: ValueRef<'_>) -> Result<Value> {
    let converted = match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => {
            Value::Text(std::str::from_utf8(t).context("invalid UTF-8 in text value")?.to_string())
        }
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    };
    Ok(converted)
}
