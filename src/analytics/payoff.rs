//! Expiry payoff of a single option leg.

use serde::{Deserialize, Serialize};

use crate::model::OptionKind;

/// Payoff range is `[LOWER_BOUND × strike, UPPER_BOUND × strike]`.
pub const LOWER_BOUND: f64 = 0.5;
pub const UPPER_BOUND: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    pub spot: f64,
    pub intrinsic: f64,
    pub contract_value: f64,
}

/// Value of exercising right now at `spot`.
pub fn intrinsic(kind: OptionKind, strike: f64, spot: f64) -> f64 {
    match kind {
        OptionKind::Call => (spot - strike).max(0.0),
        OptionKind::Put => (strike - spot).max(0.0),
    }
}

pub fn payoff_at(kind: OptionKind, strike: f64, spot: f64, multiplier: f64) -> PayoffPoint {
    let intrinsic = intrinsic(kind, strike, spot);
    PayoffPoint {
        spot,
        intrinsic,
        contract_value: intrinsic * multiplier,
    }
}

/// Spot range the curve and the dashboard slider cover.
pub fn spot_range(strike: f64) -> (f64, f64) {
    (strike * LOWER_BOUND, strike * UPPER_BOUND)
}

/// `steps + 1` evenly spaced points across [`spot_range`].
///
/// Empty for a strike that is not a positive finite number.
pub fn payoff_curve(kind: OptionKind, strike: f64, steps: usize, multiplier: f64) -> Vec<PayoffPoint> {
    if !strike.is_finite() || strike <= 0.0 {
        return Vec::new();
    }
    let (lo, hi) = spot_range(strike);
    if steps == 0 {
        return vec![payoff_at(kind, strike, lo, multiplier)];
    }
    let step = (hi - lo) / steps as f64;
    (0..=steps)
        .map(|i| {
            // Pin the last point to the bound so rounding cannot overshoot.
            let spot = if i == steps { hi } else { lo + step * i as f64 };
            payoff_at(kind, strike, spot, multiplier)
        })
        .collect()
}
