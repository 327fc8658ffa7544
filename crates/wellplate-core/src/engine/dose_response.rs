//! Closed-form four-parameter logistic (4PL) estimation.
//!
//! The estimator is deterministic and non-iterative: asymptotes come from the
//! response extremes, IC50 from log-linear interpolation at the half-maximal
//! response, and the Hill slope from an ordinary least-squares fit of the
//! linearized Hill equation.

use super::error::AnalysisError;
use super::statistics::mean;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, instrument, warn};

pub const MIN_FIT_POINTS: usize = 4;
const DEFAULT_HILL_SLOPE: f64 = 1.0;

/// One dose level with its replicate-averaged response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DosePoint {
    pub concentration: f64,
    pub response: f64,
}

impl DosePoint {
    pub fn new(concentration: f64, response: f64) -> Self {
        Self {
            concentration,
            response,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FourPlFit {
    /// `None` when no bracket was found and no concentration is positive.
    pub ic50: Option<f64>,
    pub top: f64,
    pub bottom: f64,
    pub hill_slope: f64,
}

impl FourPlFit {
    /// `bottom + (top - bottom) / (1 + (x / ic50)^hill_slope)`.
    ///
    /// `hill_slope` is reported negative for a falling (inhibition) curve, and
    /// this expression with a negative exponent rises with `x`. To redraw a
    /// fitted inhibition curve, evaluate a copy whose `hill_slope` is replaced
    /// by its absolute value.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let ic50 = self.ic50?;
        Some(self.bottom + (self.top - self.bottom) / (1.0 + (x / ic50).powf(self.hill_slope)))
    }

    /// `points` samples of the fitted curve, log-spaced over `[from, to]`.
    pub fn curve(&self, from: f64, to: f64, points: usize) -> Vec<DosePoint> {
        if from <= 0.0 || to <= 0.0 || points < 2 {
            return Vec::new();
        }
        let (log_from, log_to) = (from.log10(), to.log10());
        let step = (log_to - log_from) / (points - 1) as f64;
        (0..points)
            .filter_map(|i| {
                let x = 10f64.powf(log_from + step * i as f64);
                self.evaluate(x).map(|y| DosePoint::new(x, y))
            })
            .collect()
    }
}

fn by_value(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

#[instrument(level = "debug", skip_all, fields(points = points.len()))]
pub fn fit_four_pl(points: &[DosePoint]) -> Result<FourPlFit, AnalysisError> {
    if points.len() < MIN_FIT_POINTS {
        return Err(AnalysisError::InsufficientData(format!(
            "at least {} data points are required for a 4PL fit, got {}",
            MIN_FIT_POINTS,
            points.len()
        )));
    }

    let (mut top, mut bottom) = points.iter().fold(
        (f64::NEG_INFINITY, f64::INFINITY),
        |(hi, lo), p| (hi.max(p.response), lo.min(p.response)),
    );
    if top == bottom {
        return Err(AnalysisError::InsufficientData(format!(
            "response is flat at {}; IC50 and Hill slope are undefined",
            top
        )));
    }
    if top < bottom {
        std::mem::swap(&mut top, &mut bottom);
    }

    let ic50 = estimate_ic50(points, top, bottom);
    let hill_slope = estimate_hill_slope(points, top, bottom);
    debug!(?ic50, top, bottom, hill_slope, "4PL estimate complete");

    Ok(FourPlFit {
        ic50,
        top,
        bottom,
        hill_slope,
    })
}

fn estimate_ic50(points: &[DosePoint], top: f64, bottom: f64) -> Option<f64> {
    let half = bottom + (top - bottom) / 2.0;
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| by_value(&a.concentration, &b.concentration));

    let bracket = sorted.windows(2).find(|w| {
        let (y1, y2) = (w[0].response, w[1].response);
        (y1 >= half && y2 <= half) || (y1 <= half && y2 >= half)
    });

    if let Some([p1, p2]) = bracket {
        if p1.concentration > 0.0 && p2.concentration > 0.0 {
            let (log_x1, log_x2) = (p1.concentration.log10(), p2.concentration.log10());
            let slope = (p2.response - p1.response) / (log_x2 - log_x1);
            if slope != 0.0 && slope.is_finite() {
                return Some(10f64.powf(log_x1 + (half - p1.response) / slope));
            }
            return Some((p1.concentration + p2.concentration) / 2.0);
        }
    }

    warn!("Half-maximal response is not bracketed; using the median concentration as IC50");
    let mut positive: Vec<f64> = points
        .iter()
        .map(|p| p.concentration)
        .filter(|&c| c > 0.0)
        .collect();
    positive.sort_by(by_value);
    positive.get(positive.len() / 2).copied()
}

fn estimate_hill_slope(points: &[DosePoint], top: f64, bottom: f64) -> f64 {
    let transformed: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| p.response > bottom && p.response < top && p.concentration > 0.0)
        .map(|p| {
            (
                p.concentration.log10(),
                ((top - p.response) / (p.response - bottom)).log10(),
            )
        })
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    if transformed.len() < 2 {
        return DEFAULT_HILL_SLOPE;
    }
    match least_squares_slope(&transformed) {
        // The linearized plot rises with the negative Hill slope.
        Some(b) => -b,
        None => DEFAULT_HILL_SLOPE,
    }
}

/// Slope `b` of the ordinary least-squares line `y = a + b x`, or `None` when
/// all `x` coincide.
fn least_squares_slope(points: &[(f64, f64)]) -> Option<f64> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (x_mean, y_mean) = (mean(&xs), mean(&ys));
    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        (sxy + (x - x_mean) * (y - y_mean), sxx + (x - x_mean).powi(2))
    });
    if sxx == 0.0 { None } else { Some(sxy / sxx) }
}
