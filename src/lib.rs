//! `collimate` converts a table of raw, untyped field values (as produced by
//! parsing delimited text) into a columnar, typed, optionally dictionary-encoded
//! representation suitable for compact storage and fast loading.
//!
//! The core is the two-pass inference engine in [`engine`]:
//!
//! - a first pass over a planned sample prefix infers the narrowest safe scalar
//!   type per column (`Int32 < Float32 < Text`, widening only), tracks distinct
//!   values up to an adaptive threshold, and narrows date-format candidates;
//! - a dictionary planner decides which columns are categorical and at what code
//!   width (8/16-bit), seeding encoder/decoder tables in first-encounter order;
//! - a second pass over all rows materializes typed column buffers, assigning new
//!   codes for values the sample missed and promoting code width in place when an
//!   8-bit estimate overflows.
//!
//! ## Quick example
//!
//! ```rust
//! use collimate::engine::{collimate, ColumnBuffer, CollimateOptions};
//! use collimate::types::{RawValue, RowSet};
//!
//! let colors = ["red", "green", "blue"];
//! let rows = RowSet::new(
//!     vec!["color".to_string()],
//!     (0..12).map(|i| vec![RawValue::from(colors[i % 3])]).collect(),
//! );
//!
//! let result = collimate(&rows, &CollimateOptions::default());
//! let color = &result.columns[0];
//! assert!(color.profile.is_encoded);
//! assert_eq!(color.buffer, ColumnBuffer::Codes8(vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2]));
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: the two-pass inference and encoding core
//! - [`types`]: row-set and column model types
//! - [`ingestion`]: CSV → [`types::RowSet`] boundary
//! - [`output`]: projection of finalized columns onto file payloads, plus the
//!   file-writing boundary
//! - [`error`]: error types used by the boundaries

pub mod engine;
pub mod error;
pub mod ingestion;
pub mod output;
pub mod types;

pub use error::{CollimateError, CollimateResult};
