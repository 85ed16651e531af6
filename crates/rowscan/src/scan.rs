//! # Row driver
//!
//! Entry points that drain a [`Cursor`] into typed destinations.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::plan::select_plan;
use crate::shape::{Scan, Shape, type_name};

/// Materialize every row of `cursor`, appending to `dest`.
///
/// The column descriptors are read and the scan plan built once; each row is
/// then scanned into fresh holders and materialized. The cursor is drained
/// but not closed.
///
/// # Errors
///
/// Returns [`Error::UnsupportedDestinationKind`] if `T` cannot receive rows,
/// or [`Error::Cursor`] for the first error reported by the cursor. Rows
/// appended before the error remain in `dest`.
pub fn scan_all<C, T>(cursor: &mut C, dest: &mut Vec<T>) -> Result<()>
where
    C: Cursor + ?Sized,
    T: Scan,
{
    let columns = cursor.columns()?;
    let plan = select_plan::<T>(&columns)?;

    let mut count = 0_usize;
    while cursor.next()? {
        let mut holders = plan.holders();
        cursor.scan(&mut holders)?;
        dest.push(plan.materialize(holders));
        count += 1;
    }

    tracing::debug!(destination = type_name::<T>(), rows = count, "scanned rows");
    Ok(())
}

/// Materialize the first row of `cursor` into `dest`.
///
/// `dest` is left unmodified when the cursor yields no rows; that is not an
/// error. The whole cursor is drained.
///
/// # Errors
///
/// Returns [`Error::InvalidDestination`] if `T` is a container (use
/// [`scan_all`]), otherwise the same errors as [`scan_all`].
pub fn scan_one<C, T>(cursor: &mut C, dest: &mut T) -> Result<()>
where
    C: Cursor + ?Sized,
    T: Scan,
{
    if matches!(T::shape(), Shape::Sequence) {
        return Err(Error::InvalidDestination(format!(
            "`{}` is a container, use `scan_all`",
            type_name::<T>()
        )));
    }

    let mut rows = Vec::with_capacity(1);
    scan_all(cursor, &mut rows)?;

    if let Some(first) = rows.into_iter().next() {
        *dest = first;
    }
    Ok(())
}
