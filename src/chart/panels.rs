//! Everything the figure shows, computed up front so drawing is pure layout.

use crate::analysis::comparison::{Comparison, ALPHA};
use crate::analysis::density::{gaussian_kde, linspace};
use crate::analysis::rolling::rolling_mean;
use crate::analysis::summary::{quantile, sorted, GroupSummary};
use crate::chart::error::ChartError;
use crate::dataset::samples::GroupSamples;
use crate::types::day_type::DayType;
use chrono::{Datelike, NaiveDate};

pub const ROLLING_WINDOW: usize = 30;
pub const ROLLING_MIN_PERIODS: usize = 15;
/// Half of the violin width, in x-axis units (groups sit at x = 0 and x = 1).
pub const VIOLIN_HALF_WIDTH: f64 = 0.35;
const VIOLIN_POINTS: usize = 100;
const BAR_Y_MAX: f64 = 70.0;

/// Box plot statistics; whiskers reach the most extreme values within 1.5 IQR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
}

impl BoxStats {
    /// `values` must be sorted and non-empty.
    fn from_sorted(values: &[f64]) -> Self {
        let q1 = quantile(values, 0.25);
        let q3 = quantile(values, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;
        let whisker_low = values
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = values
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);
        Self {
            q1,
            median: quantile(values, 0.5),
            q3,
            whisker_low,
            whisker_high,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupPanel {
    pub label: DayType,
    /// x position of the group in the categorical panels.
    pub position: f64,
    pub summary: GroupSummary,
    pub box_stats: BoxStats,
    /// `(cloud cover, half width)` outline of the violin, scaled so the widest
    /// point is [`VIOLIN_HALF_WIDTH`].
    pub violin: Vec<(f64, f64)>,
    pub mean: f64,
    pub series: Vec<(NaiveDate, f64)>,
    /// Contiguous runs of the rolling mean. Gaps split runs.
    pub rolling: Vec<Vec<(NaiveDate, f64)>>,
}

impl GroupPanel {
    fn new(label: DayType, position: f64, summary: &GroupSummary, samples: &GroupSamples) -> Self {
        let series = samples.series(label);
        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        let ordered = sorted(&values);

        Self {
            label,
            position,
            summary: summary.clone(),
            box_stats: BoxStats::from_sorted(&ordered),
            violin: violin_outline(&ordered),
            mean: summary.mean,
            rolling: rolling_runs(&series),
            series,
        }
    }

    /// Top of the 95% CI error bar.
    pub fn bar_top(&self) -> f64 {
        self.summary.mean + self.summary.margin_of_error
    }
}

fn violin_outline(sorted_values: &[f64]) -> Vec<(f64, f64)> {
    let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
        return Vec::new();
    };
    let grid = linspace(min, max, VIOLIN_POINTS);
    let density = gaussian_kde(sorted_values, &grid);
    let peak = density.iter().copied().fold(0.0, f64::max);
    let scale = if peak > 0.0 {
        VIOLIN_HALF_WIDTH / peak
    } else {
        0.0
    };
    grid.into_iter()
        .zip(density)
        .map(|(y, d)| (y, d * scale))
        .collect()
}

fn rolling_runs(series: &[(NaiveDate, f64)]) -> Vec<Vec<(NaiveDate, f64)>> {
    let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
    let rolled = rolling_mean(&values, ROLLING_WINDOW, ROLLING_MIN_PERIODS);

    let mut runs = Vec::new();
    let mut current = Vec::new();
    for ((date, _), mean) in series.iter().zip(rolled) {
        match mean {
            Some(mean) => current.push((*date, mean)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// All data for the four-panel figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub location: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub comparison: Comparison,
    pub groups: [GroupPanel; 2],
}

impl ChartData {
    pub fn new(location: impl Into<String>, samples: &GroupSamples) -> Result<Self, ChartError> {
        let (first_date, last_date) = samples.date_span().ok_or(ChartError::NoData)?;
        let comparison = Comparison::from_samples(samples)?;
        let groups = [
            GroupPanel::new(DayType::Weekday, 0.0, &comparison.weekdays, samples),
            GroupPanel::new(DayType::Weekend, 1.0, &comparison.weekends, samples),
        ];
        Ok(Self {
            location: location.into(),
            first_date,
            last_date,
            comparison,
            groups,
        })
    }

    pub fn title(&self) -> String {
        format!(
            "Cloud Cover Analysis: Weekdays vs Weekends ({})",
            self.location
        )
    }

    pub fn year_span(&self) -> String {
        format!("{}-{}", self.first_date.year(), self.last_date.year())
    }

    /// Upper bound of the bar panel's y axis, leaving room for the value labels.
    pub fn bar_y_max(&self) -> f64 {
        let highest = self
            .groups
            .iter()
            .map(GroupPanel::bar_top)
            .fold(0.0, f64::max);
        BAR_Y_MAX.max((highest + 12.0).ceil())
    }

    /// Lines of the statistical summary panel.
    pub fn summary_lines(&self) -> Vec<String> {
        let c = &self.comparison;
        let rule = "=".repeat(50);
        let significant = c.is_significant();
        let mut lines = vec!["STATISTICAL SUMMARY".to_string(), rule.clone(), String::new()];

        for group in [&c.weekdays, &c.weekends] {
            let (lo, hi) = group.confidence_interval();
            lines.push(format!("{} (n = {}):", group.name, thousands(group.n)));
            lines.push(format!(
                "  Mean ± SD: {:.2}% ± {:.2}%",
                group.mean, group.std_dev
            ));
            lines.push(format!("  95% CI: [{:.2}, {:.2}]", lo, hi));
            lines.push(format!("  Median: {:.2}%", group.median));
            lines.push(String::new());
        }

        lines.push(rule.clone());
        lines.push("WELCH'S TWO-SAMPLE T-TEST".to_string());
        lines.push(rule);
        lines.push(String::new());
        lines.push(format!("Difference in means: {:.2}%", c.mean_difference()));
        lines.push(format!("T-statistic: {:.4}", c.test.t_statistic));
        lines.push(format!("P-value: {:.4}", c.test.p_value));
        lines.push(format!(
            "Degrees of freedom: {:.1}",
            c.test.degrees_of_freedom
        ));
        lines.push(String::new());
        lines.push(format!(
            "Result: {} (α = {})",
            if significant {
                "SIGNIFICANT"
            } else {
                "NOT SIGNIFICANT"
            },
            ALPHA
        ));
        lines.push(String::new());
        lines.push("Interpretation:".to_string());
        lines.push(
            if significant {
                "There IS sufficient evidence to reject the null"
            } else {
                "There is NO sufficient evidence to reject the null"
            }
            .to_string(),
        );
        lines.push("hypothesis of equal mean cloud cover between".to_string());
        lines.push("weekdays and weekends.".to_string());
        lines.push(String::new());
        lines.push(format!("Effect size (Cohen's d): {:.4}", c.cohens_d()));
        lines
    }
}

/// Formats a count with `,` as thousands separator.
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
