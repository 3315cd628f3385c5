//! The type-inference and adaptive dictionary-encoding engine.
//!
//! [`collimate`] runs the batch two-pass computation over a [`RowSet`]:
//!
//! 1. [`sample`] plans the scan window and the encounter-fraction scaling,
//! 2. [`scan`] refines per-column types, date-format candidates, and capped
//!    distinct sets over that prefix,
//! 3. [`dictionary`] decides categorical-vs-scalar storage and seeds the
//!    encoder/decoder tables,
//! 4. [`materialize`] fills typed storage for every row, assigning new codes and
//!    promoting code width when its capacity estimates overflow.
//!
//! The computation runs to completion; there is no cancellation and partial
//! results are never exposed. Capacity conditions are reported through an
//! optional [`CollimateObserver`].

pub mod dates;
pub mod dictionary;
pub mod lattice;
pub mod materialize;
pub mod observe;
pub mod sample;
pub mod scan;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::types::{ColumnProfile, RowSet};

pub use dates::{DateCandidates, DateFormat, DATE_FORMATS};
pub use dictionary::{DictValue, Dictionary};
pub use lattice::NumberClass;
pub use materialize::ColumnBuffer;
pub use observe::{CollimateObserver, CompositeObserver, EngineEvent, StdErrObserver};
pub use sample::{plan_scan, ScanPlan};

/// Options controlling a collimation run.
///
/// Use [`Default`] for common cases.
#[derive(Clone, Default)]
pub struct CollimateOptions {
    /// Detect date-like Text columns and rewrite values to canonical `YYYY-MM-DD`.
    pub normalize_dates: bool,
    /// Optional observer for progress and capacity diagnostics. Has no behavioral
    /// effect on the computation.
    pub observer: Option<Arc<dyn CollimateObserver>>,
}

impl fmt::Debug for CollimateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollimateOptions")
            .field("normalize_dates", &self.normalize_dates)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// One finalized column: profile, materialized storage, and (for encoded columns)
/// the decode table.
#[derive(Debug, Clone)]
pub struct CollimatedColumn {
    /// Finalized inference result.
    pub profile: ColumnProfile,
    /// Materialized storage of length N.
    pub buffer: ColumnBuffer,
    /// Encoder/decoder pair; `Some` iff the column is dictionary-encoded.
    pub dictionary: Option<Dictionary>,
}

/// Result of a collimation run, one entry per input column in input order.
#[derive(Debug, Clone, Default)]
pub struct Collimation {
    /// Finalized columns.
    pub columns: Vec<CollimatedColumn>,
}

impl Collimation {
    /// The "no data" result for structurally empty input.
    fn empty() -> Self {
        Self::default()
    }

    /// Finalized per-column profiles, in input order.
    pub fn profiles(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().map(|c| &c.profile)
    }
}

/// Convert a row set into typed, optionally dictionary-encoded columns.
///
/// An empty row set, or one whose rows do not all share the column arity, yields
/// the empty [`Collimation`] rather than an error; genuinely malformed input
/// structure is the parsing collaborator's responsibility.
pub fn collimate(rows: &RowSet, options: &CollimateOptions) -> Collimation {
    if rows.is_structurally_empty() {
        return Collimation::empty();
    }

    let plan = sample::plan_scan(rows.row_count());
    emit(
        options,
        EngineEvent::ScanStarted {
            rows_total: rows.row_count(),
            rows_scanned: plan.scan_rows,
        },
    );

    let t0 = Instant::now();
    let scans = scan::scan_columns(rows, &plan);
    emit(options, EngineEvent::ScanFinished { elapsed: t0.elapsed() });

    let plans: Vec<dictionary::ColumnPlan> = rows
        .names
        .iter()
        .zip(scans.iter())
        .map(|(name, scan)| dictionary::plan_column(name, scan, &plan, options.normalize_dates))
        .collect();
    emit(
        options,
        EngineEvent::PlanFinished {
            encoded_columns: plans.iter().filter(|p| p.profile.is_encoded).count(),
        },
    );

    emit(options, EngineEvent::MaterializeStarted);
    let t0 = Instant::now();
    let columns = materialize::materialize_columns(
        rows,
        plans,
        options.normalize_dates,
        options.observer.clone(),
    );
    emit(options, EngineEvent::MaterializeFinished { elapsed: t0.elapsed() });

    Collimation { columns }
}

fn emit(options: &CollimateOptions, event: EngineEvent) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_event(&event);
    }
}
