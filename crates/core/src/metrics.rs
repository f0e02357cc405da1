//! Accuracy metric derivation (MAPE / SMAPE).
//!
//! A finished range estimation is a flat sequence of numbers encoding
//! repeated (input, predicted, actual) triples. This module groups the
//! sequence and derives the two headline accuracy percentages plus the
//! per-triple points used for the scatter plot. Pure and stateless.

use crate::error::CoreError;

/// One (input, predicted, actual) observation from a finished estimation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Observation {
    pub input: f64,
    pub predicted: f64,
    pub actual: f64,
}

impl Observation {
    /// Absolute percentage error, as a fraction.
    ///
    /// `actual == 0` would divide by zero; it is treated as zero error.
    pub fn ape(&self) -> f64 {
        if self.actual == 0.0 {
            return 0.0;
        }
        (self.actual - self.predicted).abs() / self.actual.abs()
    }

    /// Symmetric absolute percentage error, as a fraction.
    ///
    /// A zero `|actual| + |predicted|` denominator is treated as zero error.
    pub fn sape(&self) -> f64 {
        let denom = self.actual.abs() + self.predicted.abs();
        if denom == 0.0 {
            return 0.0;
        }
        (self.actual - self.predicted).abs() / denom
    }
}

/// Derived accuracy report over a set of observations.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AccuracyReport {
    /// Mean absolute percentage error, in percent.
    pub mape_pct: f64,
    /// Symmetric mean absolute percentage error, in percent.
    pub smape_pct: f64,
    /// The observations the averages were taken over (scatter-plot points).
    pub observations: Vec<Observation>,
}

/// Group a flat value sequence into (input, predicted, actual) triples.
///
/// A length that is not a multiple of three means the external estimator
/// wrote back a malformed result.
pub fn group_triples(values: &[f64]) -> Result<Vec<Observation>, CoreError> {
    if values.len() % 3 != 0 {
        return Err(CoreError::Validation(format!(
            "result length {} is not a multiple of 3",
            values.len()
        )));
    }
    Ok(values
        .chunks_exact(3)
        .map(|t| Observation {
            input: t[0],
            predicted: t[1],
            actual: t[2],
        })
        .collect())
}

/// Mean absolute percentage error across observations, in percent.
///
/// Returns 0 for an empty slice.
pub fn mape_pct(observations: &[Observation]) -> f64 {
    mean(observations.iter().map(Observation::ape)) * 100.0
}

/// Symmetric mean absolute percentage error across observations, in percent.
///
/// Returns 0 for an empty slice.
pub fn smape_pct(observations: &[Observation]) -> f64 {
    mean(observations.iter().map(Observation::sape)) * 100.0
}

/// Derive the full accuracy report from a flat value sequence.
pub fn derive_report(values: &[f64]) -> Result<AccuracyReport, CoreError> {
    let observations = group_triples(values)?;
    Ok(AccuracyReport {
        mape_pct: mape_pct(&observations),
        smape_pct: smape_pct(&observations),
        observations,
    })
}

fn mean(iter: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in iter {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    fn obs(input: f64, predicted: f64, actual: f64) -> Observation {
        Observation {
            input,
            predicted,
            actual,
        }
    }

    #[test]
    fn perfect_predictions_give_zero_error() {
        let observations = vec![obs(3.0, 9.0, 9.0), obs(4.0, 11.0, 11.0)];
        assert_eq!(mape_pct(&observations), 0.0);
        assert_eq!(smape_pct(&observations), 0.0);
    }

    #[test]
    fn empty_sequence_reports_zero_for_both_metrics() {
        let report = derive_report(&[]).unwrap();
        assert_eq!(report.mape_pct, 0.0);
        assert_eq!(report.smape_pct, 0.0);
        assert!(report.observations.is_empty());
    }

    #[test]
    fn zero_actual_is_treated_as_zero_error() {
        // |0 - 5| / |0| would divide by zero.
        assert_eq!(obs(1.0, 5.0, 0.0).ape(), 0.0);
    }

    #[test]
    fn zero_sum_denominator_is_treated_as_zero_error() {
        assert_eq!(obs(1.0, 0.0, 0.0).sape(), 0.0);
    }

    #[test]
    fn groups_flat_sequence_into_triples() {
        let values = [3.0, 10.0, 9.0, 4.0, 11.0, 10.0, 5.0, 9.0, 11.0];
        let observations = group_triples(&values).unwrap();
        assert_eq!(observations.len(), 3);
        assert_eq!(observations[1], obs(4.0, 11.0, 10.0));
    }

    #[test]
    fn non_triple_length_is_rejected() {
        assert_matches!(group_triples(&[1.0, 2.0]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn known_sequence_produces_expected_percentages() {
        // Triples: (3,10,9), (4,11,10), (5,9,11).
        // APEs:  1/9, 1/10, 2/11 -> mean = 0.131313...
        // SAPEs: 1/19, 1/21, 2/20 -> mean = 0.100752...
        let values = [3.0, 10.0, 9.0, 4.0, 11.0, 10.0, 5.0, 9.0, 11.0];
        let report = derive_report(&values).unwrap();

        let expected_mape = (1.0 / 9.0 + 1.0 / 10.0 + 2.0 / 11.0) / 3.0 * 100.0;
        let expected_smape = (1.0 / 19.0 + 1.0 / 21.0 + 2.0 / 20.0) / 3.0 * 100.0;
        assert!((report.mape_pct - expected_mape).abs() < 1e-9);
        assert!((report.smape_pct - expected_smape).abs() < 1e-9);
    }
}
