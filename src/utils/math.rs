//! Shared numeric helpers for series and rendering hints.

/// Trailing-window mean. The first `window - 1` points average over
/// however many values exist so far. A window of 0 is treated as 1.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        let len = (i + 1).min(window);
        out.push(sum / len as f64);
    }
    out
}

/// Marker size for a node with `count` appearances: `2 + 4 ln(1 + count)`.
pub fn node_size(count: u32) -> f64 {
    2.0 + 4.0 * (count as f64).ln_1p()
}

/// Fractional part using floor semantics, so negatives land in `[0, 1)`.
pub fn frac(x: f64) -> f64 {
    x - x.floor()
}
