#![doc = include_str!("../README.md")]

//! # Result materialization
//!
//! Converts query results into typed values without per-type scanning code.
//!
//! For each query the engine inspects the destination's [`Shape`] once,
//! resolves column names to record fields once ([`NameTable`]), and builds a
//! [`ScanPlan`]: one intermediate [`Holder`] kind per column plus a
//! materializer. Each row is scanned into fresh holders and materialized.
//!
//! Unknown columns, `NULL` values, and values a field cannot hold are skipped,
//! never reported. The only errors are an unsupported destination and errors
//! raised by the [`Cursor`] itself.

#![forbid(unsafe_code)]

mod column;
mod config;
mod convert;
mod cursor;
mod db;
mod error;
mod helpers;
mod holder;
mod plan;
mod record;
mod registry;
mod resolve;
mod rows;
mod scan;
mod shape;
mod value;

pub use rowscan_derive::Record;

pub use self::column::{Column, identity};
pub use self::config::{Dialect, OpenOptions};
pub use self::convert::convert;
pub use self::cursor::Cursor;
pub use self::db::Db;
pub use self::error::{Error, Result};
pub use self::helpers::{Bits, bit_to_uint, key, pick};
pub use self::holder::{Holder, Valuer};
pub use self::plan::{ScanPlan, select_plan};
pub use self::record::{FieldDef, FieldType, FromValue, Record, assign};
pub use self::registry::{Connection, Driver, DriverRegistry};
pub use self::resolve::{FieldPath, MAX_EMBED_DEPTH, NameTable, TAGS, column_name, field_kind};
pub use self::rows::Rows;
pub use self::scan::{scan_all, scan_one};
pub use self::shape::{MapShape, RecordShape, Scan, Shape};
pub use self::value::{Kind, Value};
