use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum SeriesError {
    #[error("Dilution start must be a finite number, got {0}")]
    InvalidStart(f64),
    #[error("Dilution factor must be a positive finite number, got {0}")]
    InvalidFactor(f64),
}

/// Parses a comma-separated concentration list. Tokens that are not finite
/// numbers are dropped.
pub fn parse_concentrations(text: &str) -> Vec<f64> {
    text.split(',')
        .filter_map(|token| {
            let token = token.trim();
            match token.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    if !token.is_empty() {
                        debug!("Dropping non-numeric concentration token {:?}", token);
                    }
                    None
                }
            }
        })
        .collect()
}

/// `points` concentrations starting at `start`, each `factor` times more dilute
/// than the previous, rounded to three significant digits.
pub fn dilution_series(start: f64, factor: f64, points: usize) -> Result<Vec<f64>, SeriesError> {
    if !start.is_finite() {
        return Err(SeriesError::InvalidStart(start));
    }
    if !factor.is_finite() || factor <= 0.0 {
        return Err(SeriesError::InvalidFactor(factor));
    }
    let mut current = start;
    let mut series = Vec::with_capacity(points);
    for _ in 0..points {
        series.push(round_significant(current, 3));
        current /= factor;
    }
    Ok(series)
}

fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits - 1 - magnitude;
    if shift >= 0 {
        let scale = 10f64.powi(shift);
        (value * scale).round() / scale
    } else {
        let scale = 10f64.powi(-shift);
        (value / scale).round() * scale
    }
}
