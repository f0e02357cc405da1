//! Submission input parsing and validation.
//!
//! A submission is either a single number or a contiguous inclusive integer
//! range. Both are stored (and handed to the external estimator) as a flat
//! list of values: a scalar becomes a one-element list, a range `[a, b]`
//! expands to `{a, a+1, ..., b}`.

use serde::Deserialize;

use crate::error::CoreError;

/// Maximum number of values a single range submission may expand to.
///
/// Keeps a typo like `1-1000000000` from materialising a giant row.
pub const MAX_RANGE_VALUES: i64 = 10_000;

/// A submitted estimation input: a single value or an inclusive range.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum EstimateInput {
    /// A single number, e.g. `{"value": 7}`.
    Value { value: f64 },
    /// An inclusive integer range, e.g. `{"start": 3, "end": 5}`.
    Range { start: i64, end: i64 },
}

impl EstimateInput {
    /// Validate the input without expanding it.
    ///
    /// Rejects non-finite scalars, ranges with `start > end`, and ranges
    /// that would expand beyond [`MAX_RANGE_VALUES`].
    pub fn validate(&self) -> Result<(), CoreError> {
        match *self {
            Self::Value { value } => {
                if !value.is_finite() {
                    return Err(CoreError::Validation(
                        "input value must be a finite number".to_string(),
                    ));
                }
            }
            Self::Range { start, end } => {
                if start > end {
                    return Err(CoreError::Validation(format!(
                        "range start ({start}) must not exceed end ({end})"
                    )));
                }
                // i128: `end - start + 1` overflows i64 for extreme
                // endpoints (e.g. i64::MIN..=i64::MAX).
                let count = i128::from(end) - i128::from(start) + 1;
                if count > i128::from(MAX_RANGE_VALUES) {
                    return Err(CoreError::Validation(format!(
                        "range expands to {count} values (max {MAX_RANGE_VALUES})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validate and expand to the flat value list stored in the database.
    pub fn expand(&self) -> Result<Vec<f64>, CoreError> {
        self.validate()?;
        let values = match *self {
            Self::Value { value } => vec![value],
            Self::Range { start, end } => (start..=end).map(|v| v as f64).collect(),
        };
        Ok(values)
    }
}

/// Encode a value list as the comma-separated argv string passed to the
/// external estimator, e.g. `[3.0, 4.0, 5.0]` -> `"3,4,5"`.
///
/// Integral values are rendered without a fractional part so a scalar
/// submission of `7` reaches the script as `"7"`, matching its contract.
pub fn encode_argv(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| {
            if v.fract() == 0.0 && v.abs() < 1e15 {
                format!("{}", *v as i64)
            } else {
                format!("{v}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
