//! # Intermediate holders
//!
//! A [`Holder`] is the typed slot a cursor scans one cell into. Its [`Kind`]
//! is chosen by the scan plan: the destination field's own kind when the
//! column maps to a field, the driver's natural scan type otherwise.

use std::fmt::Debug;

use anyhow::Result;

use crate::convert::convert;
use crate::value::{Kind, Value};

/// A driver value able to yield its own canonical representation.
///
/// Drivers deposit valuers into holders for column types the [`Value`] model
/// has no direct variant for. The engine always prefers the canonical value
/// over the raw one.
pub trait Valuer: Debug {
    /// The canonical value, or [`Value::Null`] for an explicit null.
    fn value(&self) -> Value;
}

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Value(Value),
    Valuer(Box<dyn Valuer>),
}

/// Typed storage for one scanned cell.
#[derive(Debug, Default)]
pub struct Holder {
    kind: Kind,
    slot: Slot,
}

impl Holder {
    /// Create an empty holder of the given kind.
    #[must_use]
    pub const fn new(kind: Kind) -> Self {
        Self {
            kind,
            slot: Slot::Empty,
        }
    }

    /// The kind values are converted into.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Store a raw driver value, converting it to the holder's kind.
    ///
    /// `NULL` leaves the holder empty.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be represented in the holder's
    /// kind.
    pub fn put(&mut self, value: Value) -> Result<()> {
        self.slot = match convert(value, self.kind)? {
            Value::Null => Slot::Empty,
            value => Slot::Value(value),
        };
        Ok(())
    }

    /// Store a driver valuer. It is resolved when the row is materialized.
    pub fn put_valuer(&mut self, valuer: impl Valuer + 'static) {
        self.slot = Slot::Valuer(Box::new(valuer));
    }

    /// Returns `true` when nothing (or `NULL`) has been stored.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.slot, Slot::Empty)
    }

    /// Consume the holder, yielding its value.
    ///
    /// Valuers are resolved first; absent and `NULL` values yield `None`.
    #[must_use]
    pub fn take(self) -> Option<Value> {
        let value = match self.slot {
            Slot::Empty => return None,
            Slot::Value(value) => value,
            Slot::Valuer(valuer) => valuer.value(),
        };
        (!value.is_null()).then_some(value)
    }
}
