//! Sample planning: how much of the row set to scan, and how to scale capacity
//! thresholds for what the scan is expected to miss.

/// Minimum number of rows to scan before deciding on types.
pub const MIN_SCAN_COUNT: usize = 1000;

/// Minimum fraction of the row set to scan.
pub const MIN_SCAN_FRACTION: f64 = 0.3;

/// A column is a dictionary-encoding candidate if its distinct count stays below
/// this fraction of the row count.
pub const CATEGORICAL_FRACTION: f64 = 0.3;

/// Hard ceiling on dictionary cardinality (16-bit code space).
pub const MAX_CATEGORICAL: usize = 65536;

/// Exponent applied to the encounter estimate. Penalizes small samples, modeling
/// diminishing confidence about distinct values the scan never saw.
pub const ENTROPIC_ENCOUNTER_EXPONENT: i32 = 2;

/// Fraction of a column's true distinct-value population expected to be observed,
/// as a function of the sampled fraction of rows.
///
/// Consulted as a descending-threshold lookup: the entry with the largest sample
/// fraction `<=` the actual one wins.
const ENCOUNTER_FRACTION_TABLE: [(f64, f64); 7] = [
    (1.0, 1.0),
    (0.8, 0.7),
    (0.4, 0.65),
    (0.2, 0.6),
    (0.1, 0.5),
    (0.04, 0.3),
    (0.01, 0.1),
];

/// The planned scan window and the capacity scaling derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPlan {
    /// Number of prefix rows the scanner will examine.
    pub scan_rows: usize,
    /// `scan_rows / N`.
    pub sample_fraction: f64,
    /// Estimated share of each column's distinct-value population the scan will
    /// encounter, in `(0, 1]`.
    pub encounter_fraction: f64,
    /// Adaptive distinct-count threshold for dictionary encoding, already scaled by
    /// the encounter fraction.
    pub categorical_threshold: f64,
}

impl ScanPlan {
    /// Distinct-count bound under which an encoded column starts at 8-bit codes.
    pub fn eight_bit_threshold(&self) -> f64 {
        256.0 * self.encounter_fraction
    }
}

/// Plan the scan window for a row set of `n` rows.
pub fn plan_scan(n: usize) -> ScanPlan {
    let scan_rows = if n < MIN_SCAN_COUNT {
        n
    } else {
        let fraction_rows = ((n as f64) * MIN_SCAN_FRACTION).ceil() as usize;
        MIN_SCAN_COUNT.max(fraction_rows)
    };

    let sample_fraction = if n == 0 {
        1.0
    } else {
        scan_rows as f64 / n as f64
    };

    let base = ENCOUNTER_FRACTION_TABLE
        .iter()
        .find(|(fraction, _)| sample_fraction >= *fraction)
        .map(|(_, estimate)| *estimate)
        .unwrap_or(ENCOUNTER_FRACTION_TABLE[ENCOUNTER_FRACTION_TABLE.len() - 1].1);
    let encounter_fraction = base.powi(ENTROPIC_ENCOUNTER_EXPONENT);

    let raw_threshold = ((n as f64) * CATEGORICAL_FRACTION).ceil().min(MAX_CATEGORICAL as f64);
    let categorical_threshold = raw_threshold * encounter_fraction;

    ScanPlan {
        scan_rows,
        sample_fraction,
        encounter_fraction,
        categorical_threshold,
    }
}
