//! # Cursors
//!
//! The [`Cursor`] trait is the engine's view of a streaming query result:
//! column metadata plus a row-by-row fetch interface. Drivers implement it;
//! [`Rows`](crate::Rows) is an in-memory implementation.

use anyhow::Result;

use crate::column::Column;
use crate::holder::Holder;

/// A query result consumed one row at a time.
///
/// The caller owns the cursor and is responsible for releasing it. The engine
/// only borrows it, draining it to exhaustion or the first error.
pub trait Cursor {
    /// Column descriptors, in result order.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot describe the result.
    fn columns(&self) -> Result<Vec<Column>>;

    /// Advance to the next row. Returns `false` once the result is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the data source's error (connection failure, malformed row,
    /// etc.). An error is terminal.
    fn next(&mut self) -> Result<bool>;

    /// Populate `holders` (one per column) from the current row.
    ///
    /// # Errors
    ///
    /// Returns an error if the holder count does not match the column count or
    /// a value cannot be converted to a holder's kind.
    fn scan(&mut self, holders: &mut [Holder]) -> Result<()>;
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn columns(&self) -> Result<Vec<Column>> {
        (**self).columns()
    }

    fn next(&mut self) -> Result<bool> {
        (**self).next()
    }

    fn scan(&mut self, holders: &mut [Holder]) -> Result<()> {
        (**self).scan(holders)
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn columns(&self) -> Result<Vec<Column>> {
        (**self).columns()
    }

    fn next(&mut self) -> Result<bool> {
        (**self).next()
    }

    fn scan(&mut self, holders: &mut [Holder]) -> Result<()> {
        (**self).scan(holders)
    }
}
