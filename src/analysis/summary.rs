//! Descriptive statistics for one group of daily cloud cover values.

use crate::analysis::error::AnalysisError;
use std::fmt;

/// z value of the two-sided 95% normal interval.
pub const Z_95: f64 = 1.96;

/// Sample mean of `values`. Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with an `n - 1` denominator.
pub fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub std_error: f64,
    /// Half-width of the 95% confidence interval, `1.96 * std_error`.
    pub margin_of_error: f64,
    pub median: f64,
}

impl GroupSummary {
    /// Summarises a group. At least two values are required for a sample standard deviation.
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Result<Self, AnalysisError> {
        let name = name.into();
        if values.len() < 2 {
            return Err(AnalysisError::InsufficientData {
                group: name,
                found: values.len(),
                required: 2,
            });
        }
        let n = values.len();
        let mean = mean(values);
        let std_dev = sample_variance(values).sqrt();
        let std_error = std_dev / (n as f64).sqrt();

        Ok(Self {
            name,
            n,
            mean,
            std_dev,
            std_error,
            margin_of_error: Z_95 * std_error,
            median: quantile(&sorted(values), 0.5),
        })
    }

    pub fn variance(&self) -> f64 {
        self.std_dev.powi(2)
    }

    /// Lower and upper bound of the 95% confidence interval of the mean.
    pub fn confidence_interval(&self) -> (f64, f64) {
        (self.mean - self.margin_of_error, self.mean + self.margin_of_error)
    }
}

impl fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        writeln!(f, "  n = {}", self.n)?;
        writeln!(
            f,
            "  Mean cloud cover = {:.2}% ± {:.2} (95% CI)",
            self.mean, self.margin_of_error
        )?;
        writeln!(f, "  Std Dev = {:.2}", self.std_dev)
    }
}
