//! Data-engineering core for annotated tabular omics data.
//!
//! The pieces every analysis in the surrounding application depends on:
//!
//! 1. An annotated table ([`extended::ExtendedTable`]) layering row and
//!    column metadata kinds over a primary data matrix.
//! 2. A table-transform library ([`transform`]): transpose with
//!    header-promotion options, axis flips, positional column insertion,
//!    and the bridge to the dense arrays handed to the external
//!    statistics engine.
//! 3. Counter and range codecs ([`codec`]) for spreadsheet-style column
//!    labels and compact index-range strings.
//! 4. Dendrogram reconstruction ([`dendrogram`]) from the merge matrix +
//!    height vector contract of hierarchical-clustering engines.
//!
//! Rendering, statistical computation and engine invocation live outside
//! this crate; [`import`] and [`engine`] are the boundaries to them.

pub mod cli;
pub mod codec;
pub mod dendrogram;
pub mod engine;
pub mod error;
pub mod extended;
pub mod import;
pub mod normalization;
pub mod transform;
pub mod value;

pub use error::{Result, TableError};
pub use extended::ExtendedTable;
pub use value::{Column, ColumnData, ColumnKind, Table, Value};
