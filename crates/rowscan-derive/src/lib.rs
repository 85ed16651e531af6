#![doc = include_str!("../README.md")]

//! Derive macro for `rowscan` record destinations.

#![forbid(unsafe_code)]

mod record;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Implements `rowscan::Record` and `rowscan::Scan` for a struct with named
/// fields.
///
/// Field attributes:
///
/// - `#[tags(db = "id", json = "name,omitempty", ...)]` structural tags used to
///   derive the field's column name.
/// - `#[embed]` promotes the fields of an embedded record into this one. The
///   field's type must itself derive `Record`.
///
/// Only `pub` fields are matched against columns.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Default, Record)]
/// pub struct Post {
///     #[embed]
///     pub base: Base,
///     #[tags(gorm = "column:post_title;type:varchar")]
///     pub title: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(tags, embed))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(&input).unwrap_or_else(syn::Error::into_compile_error).into()
}
