//! Weekday vs weekend comparison: both group summaries plus Welch's t-test.

use crate::analysis::error::AnalysisError;
use crate::analysis::summary::GroupSummary;
use crate::analysis::welch::WelchTest;
use crate::dataset::samples::GroupSamples;
use crate::types::day_type::DayType;
use std::fmt;

pub const ALPHA: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub weekdays: GroupSummary,
    pub weekends: GroupSummary,
    pub test: WelchTest,
}

impl Comparison {
    pub fn new(weekdays: &[f64], weekends: &[f64]) -> Result<Self, AnalysisError> {
        let weekdays = GroupSummary::from_values(DayType::Weekday.plural(), weekdays)?;
        let weekends = GroupSummary::from_values(DayType::Weekend.plural(), weekends)?;
        let test = WelchTest::run(&weekdays, &weekends)?;
        Ok(Self {
            weekdays,
            weekends,
            test,
        })
    }

    pub fn from_samples(samples: &GroupSamples) -> Result<Self, AnalysisError> {
        Self::new(&samples.weekdays(), &samples.weekends())
    }

    /// Weekday mean minus weekend mean.
    pub fn mean_difference(&self) -> f64 {
        self.weekdays.mean - self.weekends.mean
    }

    /// Cohen's d using the root mean square of both standard deviations.
    pub fn cohens_d(&self) -> f64 {
        let pooled = ((self.weekdays.variance() + self.weekends.variance()) / 2.0).sqrt();
        self.mean_difference() / pooled
    }

    pub fn is_significant(&self) -> bool {
        self.test.is_significant(ALPHA)
    }

    pub fn verdict(&self) -> &'static str {
        if self.is_significant() {
            "YES. Statistically significant difference in average cloud cover between weekdays and weekends (p < 0.05)"
        } else {
            "NO. No statistically significant difference in average cloud cover (p ≥ 0.05)"
        }
    }
}

/// The console report printed by the compare step.
impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Cloud Cover Comparison: Weekdays vs Weekends ===")?;
        writeln!(f)?;
        writeln!(f, "{}", self.weekdays)?;
        writeln!(f, "{}", self.weekends)?;
        writeln!(f, "=== Two-Sample t-Test Results ===")?;
        writeln!(f, "T-statistic: {:.4}", self.test.t_statistic)?;
        writeln!(f, "P-value: {:.4}", self.test.p_value)?;
        write!(f, "{}", self.verdict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_of_shifted_groups() {
        let weekdays = [40.0, 45.0, 50.0, 55.0, 60.0, 42.0, 58.0];
        let weekends = [20.0, 22.0, 25.0, 28.0, 30.0];
        let comparison = Comparison::new(&weekdays, &weekends).unwrap();

        assert_eq!(comparison.weekdays.name, "Weekdays");
        assert_eq!(comparison.weekends.n, 5);
        assert!((comparison.mean_difference() - (50.0 - 25.0)).abs() < 1e-9);
        assert!(comparison.cohens_d() > 2.0);
        assert!(comparison.is_significant());
        assert!(comparison.verdict().starts_with("YES."));
    }

    #[test]
    fn test_overlapping_groups_are_not_significant() {
        let weekdays = [10.0, 90.0, 30.0, 70.0, 50.0];
        let weekends = [20.0, 80.0, 40.0, 60.0];
        let comparison = Comparison::new(&weekdays, &weekends).unwrap();
        assert!(!comparison.is_significant());
        assert!(comparison.verdict().starts_with("NO."));
    }

    #[test]
    fn test_report_layout() {
        let comparison = Comparison::new(&[10.0, 20.0, 30.0], &[15.0, 25.0, 35.0]).unwrap();
        let report = comparison.to_string();
        assert!(report.starts_with("=== Cloud Cover Comparison: Weekdays vs Weekends ===\n\nWeekdays:\n  n = 3\n"));
        assert!(report.contains("Weekends:\n  n = 3\n"));
        assert!(report.contains("T-statistic: -0.6124\n"));
        assert!(report.contains("=== Two-Sample t-Test Results ==="));
        assert!(report.ends_with("(p ≥ 0.05)"));
    }

    #[test]
    fn test_small_group_is_an_error() {
        let err = Comparison::new(&[1.0, 2.0, 3.0], &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { found: 0, .. }));
    }
}
