//! Score weight configuration.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Relative importance of each scoring factor.
///
/// Weights need not sum to 1; the engine divides by the sum of the non-zero
/// weights. Any field omitted when deserializing takes its default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Closer stations score higher.
    pub distance: f64,
    /// More powerful chargers score higher.
    pub power: f64,
    /// Cheaper stations score higher.
    pub price: f64,
    /// Better rated stations score higher.
    pub rating: f64,
    /// Available > occupied > offline.
    pub availability: f64,
}

impl ScoreWeights {
    /// Create weights from explicit values.
    pub fn new(distance: f64, power: f64, price: f64, rating: f64, availability: f64) -> Self {
        Self {
            distance,
            power,
            price,
            rating,
            availability,
        }
    }

    /// All weight on distance; used for "nearest station" queries.
    pub fn distance_only() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Every factor weighted equally.
    pub fn equal() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0, 1.0)
    }

    /// Weights paired with their factor names, in scoring order.
    pub fn factors(&self) -> [(&'static str, f64); 5] {
        [
            ("distance", self.distance),
            ("power", self.power),
            ("price", self.price),
            ("rating", self.rating),
            ("availability", self.availability),
        ]
    }

    /// Sum of the weights that take part in scoring.
    pub fn applied_total(&self) -> f64 {
        self.factors()
            .iter()
            .map(|&(_, w)| w)
            .filter(|&w| w > 0.0)
            .sum()
    }

    /// Check every weight is finite and non-negative, and at least one is
    /// positive.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (factor, value) in self.factors() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EngineError::NegativeWeight { factor, value });
            }
        }
        if self.applied_total() <= 0.0 {
            return Err(EngineError::AllWeightsZero);
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: 0.30,
            power: 0.20,
            price: 0.10,
            rating: 0.20,
            availability: 0.20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset() {
        let w = ScoreWeights::default();
        assert_eq!(w.distance, 0.30);
        assert_eq!(w.power, 0.20);
        assert_eq!(w.price, 0.10);
        assert_eq!(w.rating, 0.20);
        assert_eq!(w.availability, 0.20);
        assert!((w.applied_total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let w: ScoreWeights = serde_json::from_str(r#"{"price": 0.9}"#).unwrap();
        assert_eq!(w.price, 0.9);
        assert_eq!(w.distance, 0.30);
        assert_eq!(w.availability, 0.20);

        let w: ScoreWeights = serde_json::from_str("{}").unwrap();
        assert_eq!(w, ScoreWeights::default());
    }

    #[test]
    fn all_zero_rejected() {
        let w = ScoreWeights::new(0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(w.validate(), Err(EngineError::AllWeightsZero));
    }

    #[test]
    fn negative_rejected() {
        let w = ScoreWeights::new(1.0, -0.1, 0.0, 0.0, 0.0);
        assert_eq!(
            w.validate(),
            Err(EngineError::NegativeWeight {
                factor: "power",
                value: -0.1
            })
        );
        let w = ScoreWeights::new(f64::INFINITY, 0.0, 0.0, 0.0, 0.0);
        assert!(w.validate().is_err());
    }

    #[test]
    fn sum_need_not_be_one() {
        assert!(ScoreWeights::new(3.0, 0.0, 7.0, 0.0, 0.0).validate().is_ok());
        assert_eq!(ScoreWeights::equal().applied_total(), 5.0);
        assert_eq!(ScoreWeights::distance_only().applied_total(), 1.0);
    }
}
