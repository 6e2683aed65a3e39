//! Composite defensive score.
//!
//! Five sub-scores, each in [0, 100], combined as a plain weighted sum. The
//! raid simulator runs once per evaluation and feeds both the protection and
//! upkeep efficiency scores.

use crate::config::*;
use crate::constants::*;
use crate::piece::*;
use crate::raid::*;
use crate::structure::*;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub protection: f64,
    pub visibility: f64,
    pub upkeep_efficiency: f64,
    pub redundant_utility: f64,
    pub redundant_spawn: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            protection: 0.35,
            visibility: 0.20,
            upkeep_efficiency: 0.20,
            redundant_utility: 0.15,
            redundant_spawn: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.protection
            + self.visibility
            + self.upkeep_efficiency
            + self.redundant_utility
            + self.redundant_spawn
    }

    /// Whether the weights sum to 1 within 1e-6.
    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() <= 1e-6
    }
}

/// A named, weighted sub-score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

impl ScoreEntry {
    fn new(name: &str, score: f64, weight: f64) -> Self {
        ScoreEntry {
            name: name.to_owned(),
            score,
            weight,
        }
    }

    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub protection: f64,
    pub visibility: f64,
    pub upkeep_efficiency: f64,
    pub redundant_utility: f64,
    pub redundant_spawn: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDiagnostics {
    pub mean_raid_cost: f64,
    pub min_raid_cost: u64,
    /// Share of boundary-layer pieces that block sight, 0 to 1.
    pub visibility_ratio: f64,
    pub upkeep: UpkeepTotals,
    pub total_upkeep: u32,
    pub utility_anchors: usize,
    pub spawn_anchors: usize,
    pub loot_rooms: usize,
    pub reachable_loot_rooms: usize,
    /// Loot rooms within cupboard range.
    pub covered_loot_rooms: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Weighted sum of the sub-scores.
    pub overall: f64,
    pub sub_scores: SubScores,
    /// The sub-scores with their weights, in a fixed order.
    pub entries: Vec<ScoreEntry>,
    pub diagnostics: EvaluationDiagnostics,
    pub raid: RaidSummary,
}

/// Protection from the mean optimized raid cost.
pub fn protection_score(summary: &RaidSummary) -> f64 {
    (summary.mean_cost / PROTECTION_COST_PER_POINT).min(MAX_SUB_SCORE)
}

/// Blocking share of the pieces on the boundary layer, as (score, ratio).
pub fn visibility_score(structure: &Structure) -> (f64, f64) {
    let (boundary, blocking) = structure
        .iter()
        .filter(|(pos, _)| structure.is_boundary_layer(*pos))
        .fold((0usize, 0usize), |(boundary, blocking), (_, piece)| {
            (boundary + 1, blocking + blocks_visibility(piece) as usize)
        });

    if boundary == 0 {
        return (0.0, 0.0);
    }

    let ratio = blocking as f64 / boundary as f64;
    (ratio * MAX_SUB_SCORE, ratio)
}

/// Raid cost bought per unit of upkeep.
pub fn upkeep_efficiency_score(summary: &RaidSummary, total_upkeep: u32) -> f64 {
    let upkeep = total_upkeep.max(1) as f64;
    (summary.mean_cost / upkeep * UPKEEP_EFFICIENCY_SCALE).min(MAX_SUB_SCORE)
}

/// 0 anchors scores 0, one scores `single`, two score 70 and each further
/// anchor adds 10.
pub fn redundancy_score(anchors: usize, single: f64) -> f64 {
    match anchors {
        0 => 0.0,
        1 => single,
        n => (70.0 + 10.0 * (n - 2) as f64).min(MAX_SUB_SCORE),
    }
}

pub fn redundant_utility_score(structure: &Structure) -> f64 {
    redundancy_score(structure.tool_cupboards.len(), 30.0)
}

pub fn redundant_spawn_score(structure: &Structure) -> f64 {
    redundancy_score(structure.beds.len(), 40.0)
}

/// Evaluate with the default raid settings, and the given weights or the
/// defaults.
pub fn evaluate(structure: &Structure, weights: Option<&ScoreWeights>) -> Evaluation {
    let config = EvaluationConfig {
        weights: weights.copied().unwrap_or_default(),
        ..EvaluationConfig::default()
    };
    evaluate_with(structure, &config)
}

pub fn evaluate_with(structure: &Structure, config: &EvaluationConfig) -> Evaluation {
    let weights = &config.weights;
    let raid = simulate_raid_with(structure, &config.raid);
    let upkeep = *structure.upkeep_totals();

    let (visibility, visibility_ratio) = visibility_score(structure);

    let sub_scores = SubScores {
        protection: protection_score(&raid),
        visibility,
        upkeep_efficiency: upkeep_efficiency_score(&raid, upkeep.total()),
        redundant_utility: redundant_utility_score(structure),
        redundant_spawn: redundant_spawn_score(structure),
    };

    let entries = vec![
        ScoreEntry::new("protection", sub_scores.protection, weights.protection),
        ScoreEntry::new("visibility", sub_scores.visibility, weights.visibility),
        ScoreEntry::new(
            "upkeep_efficiency",
            sub_scores.upkeep_efficiency,
            weights.upkeep_efficiency,
        ),
        ScoreEntry::new(
            "redundant_utility",
            sub_scores.redundant_utility,
            weights.redundant_utility,
        ),
        ScoreEntry::new(
            "redundant_spawn",
            sub_scores.redundant_spawn,
            weights.redundant_spawn,
        ),
    ];

    let overall: f64 = entries.iter().map(|e| e.weighted()).sum();

    let covered_loot_rooms = structure
        .loot_rooms
        .iter()
        .filter(|room| structure.has_coverage(room.position, config.raid.coverage_radius))
        .count();

    let diagnostics = EvaluationDiagnostics {
        mean_raid_cost: raid.mean_cost,
        min_raid_cost: raid.min_cost,
        visibility_ratio,
        upkeep,
        total_upkeep: upkeep.total(),
        utility_anchors: structure.tool_cupboards.len(),
        spawn_anchors: structure.beds.len(),
        loot_rooms: structure.loot_rooms.len(),
        reachable_loot_rooms: raid.reachable_rooms(),
        covered_loot_rooms,
    };

    debug!(
        "Evaluated {}: overall {:.2} (protection {:.2}, visibility {:.2}, upkeep {:.2})",
        structure.id(),
        overall,
        sub_scores.protection,
        sub_scores.visibility,
        sub_scores.upkeep_efficiency
    );

    Evaluation {
        overall,
        sub_scores,
        entries,
        diagnostics,
        raid,
    }
}
