use super::error::AnalysisError;
use super::statistics::group_stats;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssayQuality {
    SubOptimal,
    Good,
    Excellent,
}

impl AssayQuality {
    /// `< 0.5` sub-optimal, `[0.5, 0.7)` good, `>= 0.7` excellent.
    pub fn classify(z_prime: f64) -> Self {
        if z_prime < 0.5 {
            AssayQuality::SubOptimal
        } else if z_prime < 0.7 {
            AssayQuality::Good
        } else {
            AssayQuality::Excellent
        }
    }
}

impl fmt::Display for AssayQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssayQuality::SubOptimal => f.write_str("sub-optimal"),
            AssayQuality::Good => f.write_str("good"),
            AssayQuality::Excellent => f.write_str("excellent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZFactor {
    pub value: f64,
    pub classification: AssayQuality,
}

/// Z′-factor of an assay from positive and negative control readings:
/// `1 - 3 (sd_pos + sd_neg) / |mean_pos - mean_neg|`.
///
/// Each arm needs at least two values, and the arm means must differ.
pub fn z_factor(positive: &[f64], negative: &[f64]) -> Result<ZFactor, AnalysisError> {
    if positive.len() < 2 || negative.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "Z'-factor needs at least 2 points per control (positive: {}, negative: {})",
            positive.len(),
            negative.len()
        )));
    }

    let pos = group_stats(positive);
    let neg = group_stats(negative);
    let separation = (pos.mean - neg.mean).abs();
    if separation == 0.0 {
        return Err(AnalysisError::InsufficientData(
            "positive and negative controls have the same mean; Z'-factor is undefined"
                .to_string(),
        ));
    }

    let value = 1.0 - 3.0 * (pos.std_dev + neg.std_dev) / separation;
    Ok(ZFactor {
        value,
        classification: AssayQuality::classify(value),
    })
}
