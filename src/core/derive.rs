//! Decay-rate and damping derivation
//!
//! Every step is `None` when its input is `None` or falls outside the step's
//! domain. Nothing here panics or returns an error.

use std::f64::consts::PI;

/// Line frequency of the measurement (Hz)
pub const LINE_FREQUENCY: f64 = 60.0;

/// Sampling half-period: 1 / (60 × 2) seconds
pub const HALF_PERIOD: f64 = 1.0 / (LINE_FREQUENCY * 2.0);

/// All intermediate values of one decay/damping derivation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Damping {
    /// |numerator / denominator|
    pub ratio: Option<f64>,
    pub half_period: f64,
    /// ln(ratio)
    pub log_ratio: Option<f64>,
    /// log_ratio / -half_period
    pub decay_rate: Option<f64>,
    /// 1 / decay_rate
    pub time_constant: Option<f64>,
    /// time_constant × 2π × 60
    pub angular_frequency: Option<f64>,
    /// cos(atan(angular_frequency))
    pub damping: Option<f64>,
}

impl Damping {
    pub fn derive(numerator: Option<f64>, denominator: Option<f64>) -> Self {
        let ratio = ratio(numerator, denominator);
        let log_ratio = ratio.filter(|r| *r > 0.0).and_then(|r| not_nan(r.ln()));
        let decay_rate = log_ratio.and_then(|l| not_nan(l / -HALF_PERIOD));
        let time_constant = decay_rate
            .filter(|d| *d != 0.0)
            .and_then(|d| not_nan(1.0 / d));
        let angular_frequency =
            time_constant.and_then(|t| not_nan(t * 2.0 * PI * LINE_FREQUENCY));
        let damping = angular_frequency.and_then(|w| not_nan(w.atan().cos()));

        Self {
            ratio,
            half_period: HALF_PERIOD,
            log_ratio,
            decay_rate,
            time_constant,
            angular_frequency,
            damping,
        }
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (num, den) = (numerator?, denominator?);
    if den == 0.0 {
        return None;
    }
    not_nan((num / den).abs())
}

/// NaN → None; infinities are kept
fn not_nan(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}
