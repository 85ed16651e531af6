//! Common test helpers shared across integration tests.
#![allow(dead_code)]

use anyhow::{Result, bail};
use rowscan::{Column, Cursor, Holder, Record, Rows, Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Route engine logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = Registry::default()
        .with(EnvFilter::new("rowscan=trace"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct User {
    #[tags(db = "id")]
    pub id: i64,
    #[tags(json = "name,omitempty")]
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Base {
    #[tags(db = "id")]
    pub id: i64,
    #[tags(json = "created_at,omitempty")]
    pub created: String,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Post {
    #[embed]
    pub base: Base,
    #[tags(gorm = "type:varchar(64);column:post_title")]
    pub title: String,
    pub score: Option<f64>,
    secret: String,
}

impl Post {
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

/// Build an in-memory result from column names and rows.
pub fn rows(names: &[&str], data: Vec<Vec<Value>>) -> Rows {
    let mut rows = Rows::with_names(names);
    for row in data {
        rows.push(row).expect("row width matches");
    }
    rows
}

/// A cursor yielding the rows of `inner`, then failing.
#[derive(Debug)]
pub struct FailingCursor {
    pub inner: Rows,
}

impl Cursor for FailingCursor {
    fn columns(&self) -> Result<Vec<Column>> {
        self.inner.columns()
    }

    fn next(&mut self) -> Result<bool> {
        if self.inner.next()? {
            return Ok(true);
        }
        bail!("connection reset")
    }

    fn scan(&mut self, holders: &mut [Holder]) -> Result<()> {
        self.inner.scan(holders)
    }
}

/// A cursor that cannot describe its columns.
#[derive(Debug)]
pub struct BrokenCursor;

impl Cursor for BrokenCursor {
    fn columns(&self) -> Result<Vec<Column>> {
        bail!("result already closed")
    }

    fn next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn scan(&mut self, _holders: &mut [Holder]) -> Result<()> {
        Ok(())
    }
}
