//! Second pass: fill typed column storage for every row.
//!
//! The scan window is only a prefix, so cardinality and dictionary membership
//! discovered during scanning are a lower bound: the materializer assigns fresh
//! codes for unseen values and promotes code width when its own capacity estimate
//! turns out to be wrong.

use std::sync::Arc;

use rayon::prelude::*;

use crate::types::{CodeWidth, ColumnType, RawValue, RowSet};

use super::dictionary::{decode_entry, ColumnPlan, Dictionary};
use super::lattice::{classify_number, NumberClass};
use super::observe::{CollimateObserver, EngineEvent};
use super::CollimatedColumn;

/// Materialized storage for one column: a fixed-width numeric/code buffer or a
/// text sequence, always of length N.
///
/// `Codes8` is the only variant that can change representation mid-run: on code
/// overflow it is reallocated as `Codes16` with every previously written code
/// preserved. There is no transition backward.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnBuffer {
    /// Non-encoded Int32 column.
    Int32(Vec<i32>),
    /// Non-encoded Float32 column.
    Float32(Vec<f32>),
    /// Dictionary codes at 8-bit width.
    Codes8(Vec<u8>),
    /// Dictionary codes at 16-bit width.
    Codes16(Vec<u16>),
    /// Non-encoded text column; `None` is the null representation.
    Text(Vec<Option<String>>),
}

impl ColumnBuffer {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            ColumnBuffer::Int32(v) => v.len(),
            ColumnBuffer::Float32(v) => v.len(),
            ColumnBuffer::Codes8(v) => v.len(),
            ColumnBuffer::Codes16(v) => v.len(),
            ColumnBuffer::Text(v) => v.len(),
        }
    }

    /// Returns `true` if the buffer has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current code width, for code buffers.
    pub fn code_width(&self) -> Option<CodeWidth> {
        match self {
            ColumnBuffer::Codes8(_) => Some(CodeWidth::Eight),
            ColumnBuffer::Codes16(_) => Some(CodeWidth::Sixteen),
            _ => None,
        }
    }

    /// Reallocate an 8-bit code buffer as 16-bit, copying every element. No-op for
    /// other variants.
    fn promote(&mut self) {
        if let ColumnBuffer::Codes8(narrow) = self {
            let wide: Vec<u16> = narrow.iter().map(|&c| u16::from(c)).collect();
            *self = ColumnBuffer::Codes16(wide);
        }
    }
}

/// Materialize every planned column over all rows, column-parallel.
///
/// Each column owns its buffer and dictionary, so cross-column execution shares no
/// mutable state; within a column, encode-or-insert runs sequentially to keep code
/// assignment in deterministic first-encounter order.
pub fn materialize_columns(
    rows: &RowSet,
    plans: Vec<ColumnPlan>,
    normalize_dates: bool,
    observer: Option<Arc<dyn CollimateObserver>>,
) -> Vec<CollimatedColumn> {
    plans
        .into_par_iter()
        .enumerate()
        .map(|(col_idx, plan)| materialize_column(rows, col_idx, plan, normalize_dates, observer.clone()))
        .collect()
}

fn materialize_column(
    rows: &RowSet,
    col_idx: usize,
    plan: ColumnPlan,
    normalize_dates: bool,
    observer: Option<Arc<dyn CollimateObserver>>,
) -> CollimatedColumn {
    let mut profile = plan.profile;
    let normalizing_format = if normalize_dates { profile.date_format } else { None };

    let (buffer, dictionary) = match plan.dictionary {
        Some(dict) => {
            let initial_width = profile.code_width.unwrap_or(CodeWidth::Eight);
            let (buf, dict) = fill_encoded(
                rows,
                col_idx,
                &profile.name,
                profile.inferred_type,
                dict,
                initial_width,
                normalizing_format,
                observer,
            );
            (buf, Some(dict))
        }
        None => (
            fill_scalar(rows, col_idx, profile.inferred_type, normalizing_format),
            None,
        ),
    };

    // The profile reports the width actually materialized, after any promotion.
    profile.code_width = buffer.code_width();

    CollimatedColumn {
        profile,
        buffer,
        dictionary,
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_encoded(
    rows: &RowSet,
    col_idx: usize,
    name: &str,
    ty: ColumnType,
    mut dict: Dictionary,
    initial_width: CodeWidth,
    normalizing_format: Option<super::DateFormat>,
    observer: Option<Arc<dyn CollimateObserver>>,
) -> (ColumnBuffer, Dictionary) {
    let n = rows.row_count();
    let mut buf = match initial_width {
        CodeWidth::Eight => ColumnBuffer::Codes8(vec![0u8; n]),
        CodeWidth::Sixteen => ColumnBuffer::Codes16(vec![0u16; n]),
    };
    let mut degraded = false;

    for (i, row) in rows.rows.iter().enumerate() {
        let key = row[col_idx].as_key();
        let code = match dict.code_of(&key) {
            Some(code) => code,
            None => {
                let next = dict.len();
                if next == CodeWidth::Eight.capacity() && matches!(buf, ColumnBuffer::Codes8(_)) {
                    buf.promote();
                    emit(&observer, EngineEvent::WidthPromoted { column: name.to_string() });
                } else if next == CodeWidth::Sixteen.capacity() && !degraded {
                    // Out of code space at the maximum width: keep going, with new
                    // distinct values aliasing onto already-used codes.
                    degraded = true;
                    emit(&observer, EngineEvent::CapacityExhausted { column: name.to_string() });
                }
                let entry = decode_entry(&key, ty, normalizing_format);
                dict.insert(key, entry)
            }
        };

        match &mut buf {
            ColumnBuffer::Codes8(v) => v[i] = code as u8,
            ColumnBuffer::Codes16(v) => v[i] = code as u16,
            _ => unreachable!("encoded columns use code buffers"),
        }
    }

    (buf, dict)
}

fn fill_scalar(
    rows: &RowSet,
    col_idx: usize,
    ty: ColumnType,
    normalizing_format: Option<super::DateFormat>,
) -> ColumnBuffer {
    let n = rows.row_count();
    match ty {
        ColumnType::Int32 => {
            let mut out = vec![0i32; n];
            for (i, row) in rows.rows.iter().enumerate() {
                out[i] = int32_cell(&row[col_idx]);
            }
            ColumnBuffer::Int32(out)
        }
        ColumnType::Float32 => {
            let mut out = vec![0f32; n];
            for (i, row) in rows.rows.iter().enumerate() {
                out[i] = float32_cell(&row[col_idx]);
            }
            ColumnBuffer::Float32(out)
        }
        ColumnType::Text => {
            let mut out: Vec<Option<String>> = Vec::with_capacity(n);
            for row in &rows.rows {
                out.push(text_cell(&row[col_idx], normalizing_format));
            }
            ColumnBuffer::Text(out)
        }
    }
}

/// Int32 cell with the local, silent fallback: null sentinels and unparseable
/// values become 0. Fractional values that slipped past the scan window truncate.
fn int32_cell(value: &RawValue) -> i32 {
    if value.is_null() {
        return 0;
    }
    match classify_number(value) {
        NumberClass::Integer(n) | NumberClass::Float(n) => n as i32,
        NumberClass::NotANumber => 0,
    }
}

/// Float32 cell: null sentinels and unparseable values become NaN.
fn float32_cell(value: &RawValue) -> f32 {
    if value.is_null() {
        return f32::NAN;
    }
    match classify_number(value) {
        NumberClass::Integer(n) | NumberClass::Float(n) => n as f32,
        NumberClass::NotANumber => f32::NAN,
    }
}

fn text_cell(value: &RawValue, normalizing_format: Option<super::DateFormat>) -> Option<String> {
    let text = match value {
        RawValue::Text(s) => {
            if value.is_null() {
                return None;
            }
            s.clone()
        }
        RawValue::Int(n) => n.to_string(),
        RawValue::Float(f) => f.to_string(),
    };
    match normalizing_format {
        Some(fmt) => Some(fmt.normalize(&text)),
        None => Some(text),
    }
}

fn emit(observer: &Option<Arc<dyn CollimateObserver>>, event: EngineEvent) {
    if let Some(obs) = observer {
        obs.on_event(&event);
    }
}
