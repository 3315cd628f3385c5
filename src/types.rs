//! Core data model types.
//!
//! This crate converts a [`RowSet`] of raw, untyped cells into typed, optionally
//! dictionary-encoded columns. The types here are the shared vocabulary between the
//! [`crate::ingestion`] boundary, the [`crate::engine`] core, and the
//! [`crate::output`] projection.

/// A raw cell value as produced by delimited-text parsing.
///
/// Raw values are either text or an already-numeric scalar, never a container.
/// Whether a value denotes "no data" is decided by [`is_null_token`], not by the
/// variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Unparsed text.
    Text(String),
    /// A value that arrived already parsed as an integer.
    Int(i64),
    /// A value that arrived already parsed as a float.
    Float(f64),
}

impl RawValue {
    /// Canonical dictionary key for this cell: `None` for null sentinels, otherwise
    /// the textual rendering of the value.
    pub fn as_key(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => {
                if is_null_token(s) {
                    None
                } else {
                    Some(s.clone())
                }
            }
            RawValue::Int(n) => Some(n.to_string()),
            RawValue::Float(f) => Some(f.to_string()),
        }
    }

    /// Returns `true` if this cell denotes "no value".
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Text(s) if is_null_token(s))
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// Fixed set of tokens treated as "no value", matched case-insensitively.
const NULL_TOKENS: [&str; 6] = ["null", "na", "n/a", "none", "", "-"];

/// Returns `true` if `token` is a null sentinel (case-insensitive membership in the
/// fixed set).
pub fn is_null_token(token: &str) -> bool {
    NULL_TOKENS
        .iter()
        .any(|t| token.eq_ignore_ascii_case(t))
}

/// An ordered sequence of rows sharing one set of column names.
///
/// Rows are stored row-major; every row has the same arity as `names`, in the same
/// order. The engine treats an empty or arity-inconsistent row set as "no data"
/// rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    /// Column names, in the order defined by the input's first row/header.
    pub names: Vec<String>,
    /// Row-major raw cell storage.
    pub rows: Vec<Vec<RawValue>>,
}

impl RowSet {
    /// Create a row set from column names and rows.
    pub fn new(names: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self { names, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` when there is nothing to collimate, or when some row does not
    /// match the column arity (a structural contract violation by the producer).
    pub fn is_structurally_empty(&self) -> bool {
        if self.names.is_empty() || self.rows.is_empty() {
            return true;
        }
        let arity = self.names.len();
        self.rows.iter().any(|row| row.len() != arity)
    }
}

/// Scalar column type, ordered as a widening-only lattice: `Int32 < Float32 < Text`.
///
/// Inference starts at the bottom and only ever moves up; a column's type never
/// narrows once widened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColumnType {
    /// 32-bit signed integer.
    Int32,
    /// 32-bit floating point number.
    Float32,
    /// UTF-8 text.
    Text,
}

impl ColumnType {
    /// Widen `self` to accommodate `other`. Widening is monotonic in the lattice order.
    pub fn widen_to(self, other: ColumnType) -> ColumnType {
        self.max(other)
    }
}

/// Bit width of a dictionary code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWidth {
    /// Codes stored as `u8` (up to 256 distinct values).
    Eight,
    /// Codes stored as `u16` (up to 65536 distinct values).
    Sixteen,
}

impl CodeWidth {
    /// Number of distinct codes representable at this width.
    pub fn capacity(self) -> usize {
        match self {
            CodeWidth::Eight => 256,
            CodeWidth::Sixteen => 65536,
        }
    }
}

/// Finalized inference result for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    /// Column name as it appeared in the input.
    pub name: String,
    /// Narrowest scalar type that accommodates every scanned value.
    pub inferred_type: ColumnType,
    /// The single surviving date format, if exactly one candidate remained after
    /// scanning a Text column. Normalization additionally requires the
    /// normalize-dates option.
    pub date_format: Option<crate::engine::DateFormat>,
    /// Distinct values seen during scanning. Capped at the adaptive categorical
    /// threshold; undercounting past the cap is intentional.
    pub distinct_count: usize,
    /// Whether the column is dictionary-encoded.
    pub is_encoded: bool,
    /// Code width of the encoded column, `None` when not encoded. Reflects the final
    /// width after any mid-materialization promotion.
    pub code_width: Option<CodeWidth>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_tokens_match_case_insensitively() {
        for tok in ["null", "na", "n/a", "none", "", "-", "NULL", "NA", "None"] {
            assert!(is_null_token(tok), "expected '{tok}' to be a null token");
        }
        assert!(!is_null_token("--"));
        assert!(!is_null_token("nan"));
        assert!(!is_null_token("0"));
    }

    #[test]
    fn lattice_only_widens() {
        assert_eq!(ColumnType::Int32.widen_to(ColumnType::Float32), ColumnType::Float32);
        assert_eq!(ColumnType::Float32.widen_to(ColumnType::Int32), ColumnType::Float32);
        assert_eq!(ColumnType::Text.widen_to(ColumnType::Int32), ColumnType::Text);
        assert_eq!(ColumnType::Int32.widen_to(ColumnType::Int32), ColumnType::Int32);
    }

    #[test]
    fn raw_value_keys_normalize_nulls() {
        assert_eq!(RawValue::from("NA").as_key(), None);
        assert_eq!(RawValue::from("na").as_key(), None);
        assert_eq!(RawValue::from("red").as_key(), Some("red".to_string()));
        assert_eq!(RawValue::Int(7).as_key(), Some("7".to_string()));
    }

    #[test]
    fn structurally_empty_rowsets() {
        assert!(RowSet::new(vec![], vec![]).is_structurally_empty());
        assert!(RowSet::new(vec!["a".into()], vec![]).is_structurally_empty());

        let ragged = RowSet::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![RawValue::from("1"), RawValue::from("2")],
                vec![RawValue::from("3")],
            ],
        );
        assert!(ragged.is_structurally_empty());

        let ok = RowSet::new(vec!["a".into()], vec![vec![RawValue::from("1")]]);
        assert!(!ok.is_structurally_empty());
    }
}
