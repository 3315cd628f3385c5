//! Ingestion boundary: delimited text → [`crate::types::RowSet`].
//!
//! The engine does not re-validate row structure; the reader here guarantees the
//! row-set invariant (every row has the header's arity) by construction.

pub mod csv;

pub use self::csv::{read_rows_from_path, read_rows_from_reader};
