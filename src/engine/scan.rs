//! First pass: type refinement and capped cardinality tracking over the scan window.

use std::collections::HashMap;

use crate::types::{ColumnType, RawValue, RowSet};

use super::dates::{has_date_like_length, DateCandidates};
use super::lattice;
use super::sample::ScanPlan;

/// Accumulated scan state for one column.
#[derive(Debug, Clone)]
pub struct ColumnScan {
    /// Current (widening-only) type.
    pub ty: ColumnType,
    /// Surviving date-format candidates.
    pub dates: DateCandidates,
    /// Distinct canonical keys seen so far, mapped to their first-encounter order.
    /// `None` is the null key. Tracking stops at the categorical threshold; true
    /// cardinality past the cap is deliberately undercounted.
    pub distinct: HashMap<Option<String>, u32>,
}

impl ColumnScan {
    fn new() -> Self {
        Self {
            ty: ColumnType::Int32,
            dates: DateCandidates::Untested,
            distinct: HashMap::new(),
        }
    }

    fn observe(&mut self, value: &RawValue, threshold: f64) {
        self.ty = lattice::widen(self.ty, value);

        // Date candidates are only meaningful once the column is Text; numeric and
        // null tokens never qualify.
        if self.ty == ColumnType::Text {
            if let RawValue::Text(s) = value {
                if !value.is_null() && has_date_like_length(s) {
                    self.dates.observe(s);
                }
            }
        }

        if (self.distinct.len() as f64) <= threshold {
            let next_code = self.distinct.len() as u32;
            self.distinct.entry(value.as_key()).or_insert(next_code);
        }
    }
}

/// Scan the prefix of `rows` chosen by `plan`, producing per-column state.
///
/// The window is a prefix, not a random sample: code assignment order must be
/// deterministic across runs.
pub fn scan_columns(rows: &RowSet, plan: &ScanPlan) -> Vec<ColumnScan> {
    let mut columns: Vec<ColumnScan> = (0..rows.column_count()).map(|_| ColumnScan::new()).collect();

    for row in rows.rows.iter().take(plan.scan_rows) {
        for (scan, value) in columns.iter_mut().zip(row.iter()) {
            scan.observe(value, plan.categorical_threshold);
        }
    }

    columns
}
