//! # Buffered rows
//!
//! [`Rows`] is a [`Cursor`] over a fully fetched result. Drivers that collect
//! their results eagerly return it from [`Connection::query`](crate::Connection::query).
//!
//! Byte values in columns declared `BIT` are read as integers by untyped and
//! numeric holders (untyped holders receive a [`Bits`] valuer) and as raw
//! bytes by every other holder.

use std::collections::VecDeque;

use anyhow::{Result, bail};

use crate::column::Column;
use crate::cursor::Cursor;
use crate::helpers::Bits;
use crate::holder::{Holder, Valuer};
use crate::value::{Kind, Value};

/// An in-memory result set.
#[derive(Debug, Clone, Default)]
pub struct Rows {
    columns: Vec<Column>,
    pending: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl Rows {
    /// Create an empty result with the given columns.
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            pending: VecDeque::new(),
            current: None,
        }
    }

    /// Create an empty result with untyped columns of the given names.
    #[must_use]
    pub fn with_names<S: AsRef<str>>(names: &[S]) -> Self {
        let columns =
            names.iter().enumerate().map(|(i, name)| Column::new(i, name.as_ref())).collect();
        Self::new(columns)
    }

    /// Append a row of values in column order.
    ///
    /// # Errors
    ///
    /// Returns an error if the row's width differs from the column count.
    pub fn push(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            bail!("row has {} values, result has {} columns", values.len(), self.columns.len());
        }
        self.pending.push_back(values);
        Ok(())
    }

    /// Append a row, builder style.
    ///
    /// # Errors
    ///
    /// Returns an error if the row's width differs from the column count.
    pub fn with_row(mut self, values: Vec<Value>) -> Result<Self> {
        self.push(values)?;
        Ok(self)
    }

    /// Rows not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Column descriptors.
    #[must_use]
    pub fn column_descriptors(&self) -> &[Column] {
        &self.columns
    }
}

impl Cursor for Rows {
    fn columns(&self) -> Result<Vec<Column>> {
        Ok(self.columns.clone())
    }

    fn next(&mut self) -> Result<bool> {
        self.current = self.pending.pop_front();
        Ok(self.current.is_some())
    }

    fn scan(&mut self, holders: &mut [Holder]) -> Result<()> {
        let Some(current) = self.current.as_mut() else {
            bail!("scan called without a current row");
        };
        if holders.len() != current.len() {
            bail!("expected {} destination arguments in scan, not {}", current.len(), holders.len());
        }

        for ((holder, value), column) in holders.iter_mut().zip(current).zip(&self.columns) {
            let value = match std::mem::take(value) {
                Value::Bytes(bytes) if column.is_bit() => match holder.kind() {
                    Kind::Any => {
                        holder.put_valuer(Bits(bytes));
                        continue;
                    }
                    Kind::Bool | Kind::Int | Kind::UInt | Kind::Float => Bits(bytes).value(),
                    _ => Value::Bytes(bytes),
                },
                value => value,
            };
            holder.put(value).map_err(|e| {
                e.context(format!("scanning column {} ({})", column.ordinal, column.name))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_rows() {
        let mut rows = Rows::with_names(&["a"])
            .with_row(vec![Value::Int(1)])
            .unwrap()
            .with_row(vec![Value::Int(2)])
            .unwrap();
        assert_eq!(rows.remaining(), 2);

        let mut seen = Vec::new();
        while rows.next().unwrap() {
            let mut holders = vec![Holder::new(Kind::Any)];
            rows.scan(&mut holders).unwrap();
            seen.extend(holders.into_iter().filter_map(Holder::take));
        }
        assert_eq!(seen, vec![Value::Int(1), Value::Int(2)]);
        assert!(!rows.next().unwrap());
    }

    #[test]
    fn width_checked() {
        let mut rows = Rows::with_names(&["a", "b"]);
        rows.push(vec![Value::Int(1)]).unwrap_err();

        rows.push(vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert!(rows.next().unwrap());
        let err = rows.scan(&mut [Holder::new(Kind::Any)]).unwrap_err();
        assert!(err.to_string().contains("expected 2 destination arguments"));
    }

    #[test]
    fn scan_errors_name_the_column() {
        let mut rows = Rows::new(vec![Column::new(0, "age")]).with_row(vec!["old".into()]).unwrap();
        assert!(rows.next().unwrap());
        let err = rows.scan(&mut [Holder::new(Kind::Int)]).unwrap_err();
        assert!(err.to_string().contains("scanning column 0 (age)"));
    }

    #[test]
    fn bit_columns_yield_integers() {
        let mut rows = Rows::new(vec![Column::new(0, "flags").with_decl_type("BIT(16)")])
            .with_row(vec![Value::Bytes(vec![1, 5])])
            .unwrap();
        assert!(rows.next().unwrap());
        let mut holders = vec![Holder::new(Kind::Any)];
        rows.scan(&mut holders).unwrap();
        assert_eq!(holders.pop().and_then(Holder::take), Some(Value::UInt(261)));
    }

    #[test]
    fn bit_columns_follow_holder_kind() {
        let column = |ordinal, name: &str| Column::new(ordinal, name).with_decl_type("BIT(16)");
        let mut rows = Rows::new(vec![column(0, "raw"), column(1, "text"), column(2, "n")])
            .with_row(vec![
                Value::Bytes(vec![1, 2]),
                Value::Bytes(vec![0x31]),
                Value::Bytes(vec![1, 2]),
            ])
            .unwrap();
        assert!(rows.next().unwrap());

        let mut holders =
            vec![Holder::new(Kind::Bytes), Holder::new(Kind::Text), Holder::new(Kind::Int)];
        rows.scan(&mut holders).unwrap();
        let values: Vec<_> = holders.into_iter().map(Holder::take).collect();
        assert_eq!(values, vec![
            Some(Value::Bytes(vec![1, 2])),
            Some(Value::from("1")),
            Some(Value::Int(258)),
        ]);
    }
}
