//! Timing samples and their reduction into a comparative score.
//!
//! One [`Measurement`] is produced per executed test step, accumulated into
//! per-suite [`SuiteResult`]s, and reduced exactly once at run end by
//! [`finalize`] into a [`Summary`].

use serde::{Deserialize, Serialize};

/// Fixed calibration constant scaling the geomean into the reported score.
/// Purely a readability tuning knob, never derived from data.
pub const DEFAULT_CORRECTION_FACTOR: f64 = 3.0;

/// Numerator of the score formula: one minute, in milliseconds.
const SCORE_NUMERATOR: f64 = 60.0 * 1000.0;

/// Timing sample for one executed test step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Name of the test step this sample belongs to.
    pub test_name: String,
    /// Time spent in directly-executed script, before the step returned.
    pub sync_ms: f64,
    /// Time until the deferred work scheduled during the synchronous phase
    /// had drained.
    pub async_ms: f64,
    /// Secondary diagnostic read from the sandbox (rendered content
    /// height); not used in scoring.
    pub sandbox_metric: f64,
}

impl Measurement {
    /// Combined sync + async duration for this step.
    pub fn total_ms(&self) -> f64 {
        self.sync_ms + self.async_ms
    }
}

/// Ordered measurements of one suite plus their running total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub suite_name: String,
    pub measurements: Vec<Measurement>,
    pub total_ms: f64,
}

impl SuiteResult {
    /// Creates an empty result for a suite.
    pub fn new(suite_name: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            measurements: Vec::new(),
            total_ms: 0.0,
        }
    }

    /// Appends a measurement, keeping the per-suite total current.
    pub fn push(&mut self, measurement: Measurement) {
        self.total_ms += measurement.total_ms();
        self.measurements.push(measurement);
    }
}

/// Final reduction over all suites of a run. Created exactly once, at run
/// end; never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of all per-test totals.
    pub total: f64,
    /// Arithmetic mean of the per-test totals.
    pub mean: f64,
    /// n-th root of `total`. Deliberately NOT a textbook geometric mean
    /// (root of the sum rather than of the product); downstream score
    /// comparisons depend on this exact formula.
    pub geomean: f64,
    /// `60000 / geomean / correction_factor`.
    pub score: f64,
}

/// Reduces every test's `(sync + async)` total across all suites into a
/// [`Summary`]. Pure function of the collected measurements; permuting
/// suite or test order does not change the outcome.
pub fn finalize(suites: &[SuiteResult], correction_factor: f64) -> Summary {
    let totals: Vec<f64> = suites
        .iter()
        .flat_map(|s| s.measurements.iter().map(Measurement::total_ms))
        .collect();

    if totals.is_empty() {
        return Summary {
            total: 0.0,
            mean: 0.0,
            geomean: 0.0,
            score: 0.0,
        };
    }

    let n = totals.len() as f64;
    let total: f64 = totals.iter().sum();
    let mean = total / n;
    let geomean = total.powf(1.0 / n);
    let score = SCORE_NUMERATOR / geomean / correction_factor;

    Summary {
        total,
        mean,
        geomean,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, sync_ms: f64, async_ms: f64) -> Measurement {
        Measurement {
            test_name: name.to_string(),
            sync_ms,
            async_ms,
            sandbox_metric: 0.0,
        }
    }

    fn suite(name: &str, measurements: Vec<Measurement>) -> SuiteResult {
        let mut result = SuiteResult::new(name);
        for m in measurements {
            result.push(m);
        }
        result
    }

    #[test]
    fn test_suite_result_accumulates_total() {
        let result = suite("s", vec![sample("a", 10.0, 5.0), sample("b", 2.0, 3.0)]);
        assert!((result.total_ms - 20.0).abs() < f64::EPSILON);
        assert_eq!(result.measurements.len(), 2);
    }

    #[test]
    fn test_finalize_reference_scenario() {
        // Two tests totalling 3,000,000 clock units: the geomean is the
        // square root of the SUM of the totals, and the score divides one
        // minute by geomean and the correction factor.
        let suites = vec![suite(
            "s",
            vec![
                sample("a", 1_000_000.0, 500_000.0),
                sample("b", 1_000_000.0, 500_000.0),
            ],
        )];
        let summary = finalize(&suites, 3.0);

        assert!((summary.total - 3_000_000.0).abs() < 1e-6);
        assert!((summary.mean - 1_500_000.0).abs() < 1e-6);
        assert!((summary.geomean - 3_000_000.0_f64.sqrt()).abs() < 1e-9);
        assert!((summary.geomean - 1732.050_807_568_877_2).abs() < 1e-6);
        assert!((summary.score - 60_000.0 / summary.geomean / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_finalize_single_sample_geomean_equals_total() {
        let suites = vec![suite("s", vec![sample("only", 2_000_000.0, 1_000_000.0)])];
        let summary = finalize(&suites, 3.0);

        // n = 1: the first root of the sum is the sum itself.
        assert!((summary.geomean - 3_000_000.0).abs() < 1e-6);
        assert!((summary.mean - 3_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_finalize_is_order_independent() {
        let a = || sample("a", 120.0, 30.0);
        let b = || sample("b", 45.0, 5.0);
        let c = || sample("c", 300.0, 0.0);

        let declared = vec![suite("one", vec![a(), b()]), suite("two", vec![c()])];
        let permuted = vec![suite("two", vec![c()]), suite("one", vec![b(), a()])];

        let first = finalize(&declared, DEFAULT_CORRECTION_FACTOR);
        let second = finalize(&permuted, DEFAULT_CORRECTION_FACTOR);

        assert_eq!(first.total.to_bits(), second.total.to_bits());
        assert_eq!(first.mean.to_bits(), second.mean.to_bits());
        assert_eq!(first.geomean.to_bits(), second.geomean.to_bits());
        assert_eq!(first.score.to_bits(), second.score.to_bits());
    }

    #[test]
    fn test_finalize_empty_run() {
        let summary = finalize(&[], DEFAULT_CORRECTION_FACTOR);
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.score, 0.0);
    }

    #[test]
    fn test_summary_serializes() {
        let suites = vec![suite("s", vec![sample("a", 1.0, 2.0)])];
        let summary = finalize(&suites, DEFAULT_CORRECTION_FACTOR);
        let json = serde_json::to_string(&summary).expect("serialization should work");
        let parsed: Summary = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(parsed, summary);
    }
}
