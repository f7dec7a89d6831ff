//! Two-sample t-test without assuming equal variances (Welch's t-test).

use crate::analysis::error::AnalysisError;
use crate::analysis::summary::GroupSummary;
use statrs::distribution::{ContinuousCDF, StudentsT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTest {
    pub t_statistic: f64,
    /// Welch–Satterthwaite approximation, generally not an integer.
    pub degrees_of_freedom: f64,
    /// Two-sided.
    pub p_value: f64,
}

impl WelchTest {
    pub fn run(a: &GroupSummary, b: &GroupSummary) -> Result<Self, AnalysisError> {
        let va = a.variance() / a.n as f64;
        let vb = b.variance() / b.n as f64;
        let se = (va + vb).sqrt();
        if !se.is_finite() {
            return Err(AnalysisError::NonFiniteStandardError(se));
        }
        if se == 0.0 {
            return Err(AnalysisError::ZeroVariance);
        }

        let t_statistic = (a.mean - b.mean) / se;
        let degrees_of_freedom =
            (va + vb).powi(2) / (va.powi(2) / (a.n as f64 - 1.0) + vb.powi(2) / (b.n as f64 - 1.0));

        let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).map_err(|e| {
            AnalysisError::Distribution {
                df: degrees_of_freedom,
                message: e.to_string(),
            }
        })?;
        let p_value = (2.0 * dist.sf(t_statistic.abs())).min(1.0);

        Ok(Self {
            t_statistic,
            degrees_of_freedom,
            p_value,
        })
    }

    /// Runs the test directly on two samples.
    pub fn from_samples(a: &[f64], b: &[f64]) -> Result<Self, AnalysisError> {
        let a = GroupSummary::from_values("a", a)?;
        let b = GroupSummary::from_values("b", b)?;
        Self::run(&a, &b)
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_reference_values() {
        // equal variances of 2.5, so t = -2 / 1 and df = 8
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [3.0, 4.0, 5.0, 6.0, 7.0];
        let test = WelchTest::from_samples(&a, &b).unwrap();
        assert!((test.t_statistic + 2.0).abs() < 1e-9);
        assert!((test.degrees_of_freedom - 8.0).abs() < 1e-9);
        assert!((test.p_value - 0.0805).abs() < 1e-3);
        assert!(!test.is_significant(0.05));
    }

    #[test]
    fn test_unequal_variances_use_satterthwaite_df() {
        let a = [10.0, 12.0, 14.0, 16.0];
        let b = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let test = WelchTest::from_samples(&a, &b).unwrap();
        // var_a = 20/3, var_b = 350; va = 5/3, vb = 175/3
        let va: f64 = 5.0 / 3.0;
        let vb: f64 = 175.0 / 3.0;
        let expected_df = (va + vb).powi(2) / (va.powi(2) / 3.0 + vb.powi(2) / 5.0);
        assert!((test.degrees_of_freedom - expected_df).abs() < 1e-9);
        assert!((test.t_statistic - (13.0 - 35.0) / (va + vb).sqrt()).abs() < 1e-9);
        assert!(test.p_value > 0.0 && test.p_value < 1.0);
    }

    #[test]
    fn test_identical_samples_are_not_significant() {
        let a = [20.0, 40.0, 60.0, 80.0];
        let test = WelchTest::from_samples(&a, &a).unwrap();
        assert_eq!(test.t_statistic, 0.0);
        assert!((test.p_value - 1.0).abs() < 1e-12);
        assert!(!test.is_significant(0.05));
    }

    #[test]
    fn test_constant_groups_are_rejected() {
        let err = WelchTest::from_samples(&[5.0, 5.0], &[5.0, 5.0, 5.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::ZeroVariance));
    }

    #[test]
    fn test_nan_sample_is_not_reported_as_zero_variance() {
        let err = WelchTest::from_samples(&[f64::NAN, 10.0, 20.0], &[30.0, 40.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::NonFiniteStandardError(se) if se.is_nan()));
    }
}
