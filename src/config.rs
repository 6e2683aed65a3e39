//! Evaluation settings.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a valid
//! config. Weights are used as given; callers that want normalized weights
//! can check `ScoreWeights::is_normalized`.

use crate::constants::*;
use crate::error::ConfigError;
use crate::scoring::ScoreWeights;
use serde::{Deserialize, Serialize};

/// Explosive used for a raid. Only affects the charge-count estimate;
/// destroy costs are always in sulfur.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaidMethod {
    #[default]
    Rockets,
    C4,
    ExplosiveAmmo,
    Satchels,
}

impl RaidMethod {
    /// Sulfur per charge.
    pub fn charge_cost(self) -> u64 {
        let cost = match self {
            RaidMethod::Rockets => ROCKET_CHARGE_COST,
            RaidMethod::C4 => C4_CHARGE_COST,
            RaidMethod::ExplosiveAmmo => EXPLOSIVE_AMMO_CHARGE_COST,
            RaidMethod::Satchels => SATCHEL_CHARGE_COST,
        };
        cost as u64
    }

    /// Charges needed to spend `cost` sulfur, rounded up.
    pub fn charges_for(self, cost: u64) -> u64 {
        cost.div_ceil(self.charge_cost())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaidConfig {
    #[serde(default)]
    pub method: RaidMethod,
    /// Tool cupboard range used for coverage diagnostics.
    #[serde(default = "default_coverage_radius")]
    pub coverage_radius: f64,
}

fn default_coverage_radius() -> f64 {
    UTILITY_COVERAGE_RADIUS
}

impl Default for RaidConfig {
    fn default() -> Self {
        RaidConfig {
            method: RaidMethod::default(),
            coverage_radius: default_coverage_radius(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub raid: RaidConfig,
}

impl EvaluationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = EvaluationConfig::from_json("{}").unwrap();
        assert_eq!(config, EvaluationConfig::default());
        assert_eq!(config.raid.method, RaidMethod::Rockets);
        assert_eq!(config.raid.coverage_radius, 25.0);
        assert!(config.weights.is_normalized());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let json = r#"{
            "weights": { "protection": 0.5, "visibility": 0.5 },
            "raid": { "method": "c4" }
        }"#;
        let config = EvaluationConfig::from_json(json).unwrap();
        assert_eq!(config.weights.protection, 0.5);
        assert_eq!(config.weights.visibility, 0.5);
        assert_eq!(config.weights.upkeep_efficiency, 0.20);
        assert_eq!(config.raid.method, RaidMethod::C4);
        assert_eq!(config.raid.coverage_radius, 25.0);
        assert!(!config.weights.is_normalized());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = EvaluationConfig::from_json(r#"{ "raid": { "method": "catapult" } }"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("config parse error"));
    }

    #[test]
    fn config_roundtrips() {
        let mut config = EvaluationConfig::default();
        config.raid.method = RaidMethod::Satchels;
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(EvaluationConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn charge_estimates_round_up() {
        assert_eq!(RaidMethod::Rockets.charges_for(1400), 4);
        assert_eq!(RaidMethod::Rockets.charges_for(1401), 5);
        assert_eq!(RaidMethod::Rockets.charges_for(0), 0);
        assert_eq!(RaidMethod::C4.charges_for(2100), 1);
        assert_eq!(RaidMethod::ExplosiveAmmo.charges_for(100), 4);
    }
}
