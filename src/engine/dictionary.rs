//! Dictionary planning: categorical-vs-scalar storage decisions and the
//! encoder/decoder pair for encoded columns.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{CodeWidth, ColumnProfile, ColumnType};

use super::dates::DateFormat;
use super::sample::ScanPlan;
use super::scan::ColumnScan;

/// A decoded dictionary entry, serialized into the `.key` sidecar.
///
/// Text entries serialize as quoted strings, numeric entries as bare numbers, the
/// null entry as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DictValue {
    /// The null sentinel's decoder entry.
    Null,
    /// Decoded value of an encoded Int32 column.
    Int(i32),
    /// Decoded value of an encoded Float32 column.
    Float(f32),
    /// Decoded value of an encoded Text column (date-normalized when applicable).
    Text(String),
}

/// Encoder/decoder pair for one dictionary-encoded column.
///
/// Codes are assigned in strict first-encounter order starting at 0. The pair is
/// append-only: existing codes are never reassigned, so
/// `decoder[encoder[key]]` always round-trips.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    encoder: HashMap<Option<String>, u32>,
    decoder: Vec<DictValue>,
}

impl Dictionary {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            encoder: HashMap::with_capacity(capacity),
            decoder: Vec::with_capacity(capacity),
        }
    }

    /// Number of assigned codes.
    pub fn len(&self) -> usize {
        self.decoder.len()
    }

    /// Returns `true` if no codes have been assigned.
    pub fn is_empty(&self) -> bool {
        self.decoder.is_empty()
    }

    /// Look up the code for a canonical cell key.
    pub fn code_of(&self, key: &Option<String>) -> Option<u32> {
        self.encoder.get(key).copied()
    }

    /// Assign the next sequential code to `key` and append its decoded entry.
    ///
    /// The caller is responsible for not inserting a key twice.
    pub fn insert(&mut self, key: Option<String>, entry: DictValue) -> u32 {
        let code = self.decoder.len() as u32;
        self.decoder.push(entry);
        self.encoder.insert(key, code);
        code
    }

    /// The ordered decode table (index = code).
    pub fn decoder(&self) -> &[DictValue] {
        &self.decoder
    }
}

/// Build the decoded entry for a canonical key under the column's final type.
///
/// `date_format` is the locked format when normalization applies, already gated by
/// the caller on the normalize-dates option.
pub fn decode_entry(
    key: &Option<String>,
    ty: ColumnType,
    date_format: Option<DateFormat>,
) -> DictValue {
    let Some(raw) = key else {
        return DictValue::Null;
    };
    match ty {
        ColumnType::Text => match date_format {
            Some(fmt) => DictValue::Text(fmt.normalize(raw)),
            None => DictValue::Text(raw.clone()),
        },
        ColumnType::Int32 => match raw.parse::<f64>() {
            Ok(n) => DictValue::Int(n as i32),
            Err(_) => DictValue::Null,
        },
        ColumnType::Float32 => match raw.parse::<f64>() {
            Ok(n) => DictValue::Float(n as f32),
            Err(_) => DictValue::Null,
        },
    }
}

/// A finalized per-column plan: profile plus the initial dictionary scaffolding for
/// encoded columns.
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    /// The column's finalized profile. `code_width` here is the initial width; the
    /// materializer may promote it.
    pub profile: ColumnProfile,
    /// Initial encoder/decoder, seeded from the scan-phase distinct set in
    /// first-encounter order. `None` for non-encoded columns.
    pub dictionary: Option<Dictionary>,
}

/// Decide categorical-vs-scalar storage for one scanned column and build its
/// initial dictionary.
pub fn plan_column(
    name: &str,
    scan: &ColumnScan,
    plan: &ScanPlan,
    normalize_dates: bool,
) -> ColumnPlan {
    let distinct_count = scan.distinct.len();
    let is_encoded = (distinct_count as f64) <= plan.categorical_threshold;

    let date_format = if scan.ty == ColumnType::Text {
        scan.dates.locked()
    } else {
        None
    };
    let normalizing_format = if normalize_dates { date_format } else { None };

    let (code_width, dictionary) = if is_encoded {
        let width = if (distinct_count as f64) <= plan.eight_bit_threshold() {
            CodeWidth::Eight
        } else {
            CodeWidth::Sixteen
        };

        let mut dict = Dictionary::with_capacity(distinct_count);
        // Re-materialize the scan set in first-encounter order.
        let mut ordered: Vec<(&Option<String>, u32)> =
            scan.distinct.iter().map(|(k, c)| (k, *c)).collect();
        ordered.sort_unstable_by_key(|(_, code)| *code);
        for (key, _) in ordered {
            let entry = decode_entry(key, scan.ty, normalizing_format);
            dict.insert(key.clone(), entry);
        }

        (Some(width), Some(dict))
    } else {
        (None, None)
    };

    ColumnPlan {
        profile: ColumnProfile {
            name: name.to_string(),
            inferred_type: scan.ty,
            date_format,
            distinct_count,
            is_encoded,
            code_width,
        },
        dictionary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sample::plan_scan;
    use crate::engine::scan::scan_columns;
    use crate::types::{RawValue, RowSet};

    fn scanned(values: &[&str]) -> (ColumnScan, ScanPlan) {
        let rows = RowSet::new(
            vec!["v".to_string()],
            values.iter().map(|v| vec![RawValue::from(*v)]).collect(),
        );
        let plan = plan_scan(rows.row_count());
        let mut cols = scan_columns(&rows, &plan);
        (cols.remove(0), plan)
    }

    #[test]
    fn low_cardinality_text_is_encoded_eight_bit() {
        let values: Vec<&str> = ["red", "green", "blue"].iter().cycle().take(100).copied().collect();
        let (scan, plan) = scanned(&values);
        let col = plan_column("color", &scan, &plan, false);

        assert!(col.profile.is_encoded);
        assert_eq!(col.profile.code_width, Some(CodeWidth::Eight));
        let dict = col.dictionary.unwrap();
        assert_eq!(
            dict.decoder(),
            &[
                DictValue::Text("red".to_string()),
                DictValue::Text("green".to_string()),
                DictValue::Text("blue".to_string()),
            ]
        );
        assert_eq!(dict.code_of(&Some("red".to_string())), Some(0));
        assert_eq!(dict.code_of(&Some("blue".to_string())), Some(2));
    }

    #[test]
    fn high_cardinality_is_rejected() {
        let values: Vec<String> = (0..100).map(|i| format!("v{i}")).collect();
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let (scan, plan) = scanned(&refs);
        let col = plan_column("v", &scan, &plan, false);
        assert!(!col.profile.is_encoded);
        assert!(col.dictionary.is_none());
        assert_eq!(col.profile.code_width, None);
    }

    #[test]
    fn numeric_dictionary_decodes_to_numbers() {
        let values: Vec<&str> = ["1", "2", "na"].iter().cycle().take(50).copied().collect();
        let (scan, plan) = scanned(&values);
        let col = plan_column("n", &scan, &plan, false);

        assert_eq!(col.profile.inferred_type, ColumnType::Int32);
        assert!(col.profile.is_encoded);
        let dict = col.dictionary.unwrap();
        assert_eq!(
            dict.decoder(),
            &[DictValue::Int(1), DictValue::Int(2), DictValue::Null]
        );
        assert_eq!(dict.code_of(&None), Some(2));
    }

    #[test]
    fn locked_date_formats_normalize_decoder_entries() {
        let values: Vec<&str> = ["2020-1-15", "2020-2-20"]
            .iter()
            .cycle()
            .take(40)
            .copied()
            .collect();
        let (scan, plan) = scanned(&values);

        let col = plan_column("d", &scan, &plan, true);
        let dict = col.dictionary.unwrap();
        assert_eq!(
            dict.decoder(),
            &[
                DictValue::Text("2020-01-15".to_string()),
                DictValue::Text("2020-02-20".to_string()),
            ]
        );

        // Without the option, raw text is kept even though the format is locked.
        let col = plan_column("d", &scan, &plan, false);
        assert!(col.profile.date_format.is_some());
        let dict = col.dictionary.unwrap();
        assert_eq!(dict.decoder()[0], DictValue::Text("2020-1-15".to_string()));
    }

    #[test]
    fn dict_values_serialize_for_the_sidecar() {
        let entries = vec![
            DictValue::Text("red".to_string()),
            DictValue::Int(3),
            DictValue::Float(1.5),
            DictValue::Null,
        ];
        let json = serde_json::to_string(&entries).unwrap();
        assert_eq!(json, r#"["red",3,1.5,null]"#);
    }
}
