use serde::{Deserialize, Serialize};

/// Scales at or below this threshold are treated as degenerate.
pub const MIN_SCALE: f64 = 1e-8;

/// Z-score parameters for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardizationParams {
    pub mean: f64,
    pub scale: f64,
}

impl StandardizationParams {
    pub const fn new(mean: f64, scale: f64) -> Self {
        Self { mean, scale }
    }

    /// Whether the scale is too small to divide by.
    pub fn is_degenerate(&self) -> bool {
        self.scale == 0.0 || self.scale < MIN_SCALE
    }

    /// `(value - mean) / scale`, or exactly `0.0` for a degenerate scale.
    pub fn apply(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (value - self.mean) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes() {
        let params = StandardizationParams::new(632.6, 50.4);
        let z = params.apply(700.0);
        assert!((z - 1.337_301_587).abs() < 1e-6);
    }

    #[test]
    fn degenerate_scale_yields_zero() {
        for scale in [0.0, 1e-9, -3.0] {
            let params = StandardizationParams::new(10.0, scale);
            assert_eq!(params.apply(1234.0), 0.0);
        }
        assert!(!StandardizationParams::new(0.0, MIN_SCALE).is_degenerate());
    }
}
