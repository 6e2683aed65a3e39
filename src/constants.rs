//! Game constants for building pieces and raid tools.
//!
//! Every per-tier table is a fixed array indexed by `MaterialTier as usize`,
//! so adding a tier is a compile error until every table is extended.

use crate::piece::{MaterialTier, UpkeepResource};

pub const TIER_COUNT: usize = 5;

pub const ALL_TIERS: [MaterialTier; TIER_COUNT] = [
    MaterialTier::Twig,
    MaterialTier::Wood,
    MaterialTier::Stone,
    MaterialTier::Metal,
    MaterialTier::Armored,
];

/// Hit points of a freshly placed piece, per tier.
pub const PIECE_HEALTH: [u32; TIER_COUNT] = [10, 250, 500, 1000, 2000];

/// Sulfur cost to destroy a barrier-class piece (walls, floors, foundations, ...).
pub const BARRIER_DESTROY_COST: [u32; TIER_COUNT] = [1, 175, 1400, 2100, 4200];

/// Sulfur cost to destroy an aperture-class piece (doors and gates).
pub const APERTURE_DESTROY_COST: [u32; TIER_COUNT] = [1, 70, 700, 1050, 2100];

/// Upkeep resource and base amount, per tier. Twig is free.
pub const TIER_UPKEEP: [(UpkeepResource, u32); TIER_COUNT] = [
    (UpkeepResource::Wood, 0),
    (UpkeepResource::Wood, 10),
    (UpkeepResource::Stone, 10),
    (UpkeepResource::MetalFragments, 20),
    (UpkeepResource::HighQualityMetal, 10),
];

/// Tool cupboard authorization range, in cells.
pub const UTILITY_COVERAGE_RADIUS: f64 = 25.0;

/// Cost multiplier for blast groups of two or more pieces: 0.75 as
/// (numerator, denominator).
pub const SPLASH_EFFICIENCY: (u64, u64) = (3, 4);

/// Cost charged for moving through an empty cell.
pub const EMPTY_TRAVERSAL_COST: u32 = 1;

/// Highest z a perimeter cell may have and still count as a ground entry.
pub const GROUND_ENTRY_MAX_Z: i32 = 2;

/// Sulfur per charge for each raid method.
pub const ROCKET_CHARGE_COST: u32 = 350;
pub const C4_CHARGE_COST: u32 = 2200;
pub const EXPLOSIVE_AMMO_CHARGE_COST: u32 = 25;
pub const SATCHEL_CHARGE_COST: u32 = 480;

/// Protection sub-score: raid cost units per score point.
pub const PROTECTION_COST_PER_POINT: f64 = 100.0;

/// Upkeep efficiency sub-score: points per unit of raid-cost-to-upkeep ratio.
pub const UPKEEP_EFFICIENCY_SCALE: f64 = 10.0;

pub const MAX_SUB_SCORE: f64 = 100.0;
