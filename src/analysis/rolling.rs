/// Trailing moving average over row positions.
///
/// Position `i` averages the last `window` values up to and including `i`.
/// Positions with fewer than `min_periods` finite values in the window are `None`.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut count = 0usize;

    for (i, &value) in values.iter().enumerate() {
        if value.is_finite() {
            sum += value;
            count += 1;
        }
        if i >= window {
            let leaving = values[i - window];
            if leaving.is_finite() {
                sum -= leaving;
                count -= 1;
            }
        }
        out.push((count >= min_periods.max(1)).then(|| sum / count as f64));
    }
    out
}
