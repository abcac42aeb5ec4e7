use crate::config::ROUND_DECIMALS;

pub fn shift(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for i in lag..values.len() {
        out[i] = values[i - lag];
    }
    out
}

pub fn rolling_mean(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |sum, n| sum / n as f64)
}

pub fn rolling_sum(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |sum, _| sum)
}

fn rolling(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
    finish: impl Fn(f64, usize) -> f64,
) -> Vec<Option<f64>> {
    let min_periods = min_periods.max(1);
    (0..values.len())
        .map(|i| {
            if window == 0 {
                return None;
            }
            let start = (i + 1).saturating_sub(window);
            let (sum, n) = values[start..=i]
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            (n >= min_periods).then(|| finish(sum, n))
        })
        .collect()
}

// Adjusted weights, alpha = 2 / (span + 1). Gaps still decay earlier weights.
pub fn ewma(values: &[Option<f64>], span: usize, min_periods: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let min_periods = min_periods.max(1);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut observed = 0usize;
    values
        .iter()
        .map(|value| {
            if observed > 0 {
                numerator *= decay;
                denominator *= decay;
            }
            if let Some(x) = value {
                numerator += x;
                denominator += 1.0;
                observed += 1;
            }
            (observed >= min_periods).then(|| numerator / denominator)
        })
        .collect()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

pub fn round_series(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| v.map(|x| round_to(x, ROUND_DECIMALS)))
        .collect()
}

pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

pub fn diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

pub fn sum(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? + b?)
}
