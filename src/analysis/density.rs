//! Gaussian kernel density estimate used for the violin outlines.

use crate::analysis::summary::sample_variance;
use std::f64::consts::PI;

/// Scott's rule bandwidth: `std * n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    sample_variance(values).sqrt() * n.powf(-0.2)
}

/// Evaluates the density of `values` at every point of `grid`.
///
/// Returns all zeros when the bandwidth is degenerate (fewer than two values,
/// or all values equal).
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Vec<f64> {
    let h = if values.len() < 2 {
        f64::NAN
    } else {
        scott_bandwidth(values)
    };
    if !(h.is_finite() && h > 0.0) {
        return vec![0.0; grid.len()];
    }

    let norm = 1.0 / (values.len() as f64 * h * (2.0 * PI).sqrt());
    grid.iter()
        .map(|&x| {
            norm * values
                .iter()
                .map(|&v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
        })
        .collect()
}

/// `points` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_integrates_to_about_one() {
        let values: Vec<f64> = (0..200).map(|i| (i % 50) as f64 + 25.0).collect();
        let grid = linspace(-50.0, 150.0, 2001);
        let density = gaussian_kde(&values, &grid);
        let step = grid[1] - grid[0];
        let area: f64 = density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn test_density_peaks_near_the_data() {
        let values = [48.0, 50.0, 50.0, 52.0];
        let grid = linspace(0.0, 100.0, 101);
        let density = gaussian_kde(&values, &grid);
        let peak = density
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| grid[i])
            .unwrap();
        assert_eq!(peak, 50.0);
    }

    #[test]
    fn test_degenerate_input_is_flat() {
        let grid = linspace(0.0, 1.0, 5);
        assert_eq!(gaussian_kde(&[3.0, 3.0], &grid), vec![0.0; 5]);
        assert_eq!(gaussian_kde(&[3.0], &grid), vec![0.0; 5]);
    }

    #[test]
    fn test_linspace_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
