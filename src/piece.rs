//! Building pieces and their cost model.
//!
//! Destroy cost depends on the material tier and on whether the category is
//! a barrier (walls, floors, ...) or an aperture (doors, gates). Soft-sided
//! stone and metal take half damage cost. Upkeep is the tier's base amount
//! scaled by a per-category structural multiplier.

use crate::constants::*;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceCategory {
    Foundation,
    Wall,
    Floor,
    Ceiling,
    Doorway,
    Window,
    Stairs,
    Roof,
    Door,
    Gate,
    Cupboard,
    Bed,
    Chest,
    Turret,
    Trap,
}

impl PieceCategory {
    pub fn cost_class(self) -> CostClass {
        match self {
            PieceCategory::Door | PieceCategory::Gate => CostClass::Aperture,
            _ => CostClass::Barrier,
        }
    }

    /// Upkeep multiplier for the category.
    pub fn upkeep_multiplier(self) -> u32 {
        match self {
            PieceCategory::Foundation => 2,
            PieceCategory::Wall
            | PieceCategory::Floor
            | PieceCategory::Ceiling
            | PieceCategory::Doorway
            | PieceCategory::Window
            | PieceCategory::Stairs
            | PieceCategory::Roof => 1,
            _ => 0,
        }
    }
}

/// Which destroy-cost table a category reads from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CostClass {
    Barrier,
    Aperture,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialTier {
    Twig = 0,
    Wood = 1,
    Stone = 2,
    Metal = 3,
    Armored = 4,
}

impl MaterialTier {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: u8) -> Option<Self> {
        ALL_TIERS.get(index as usize).copied()
    }

    pub fn health(self) -> u32 {
        PIECE_HEALTH[self.index()]
    }

    /// The next tier up, or `None` at the top.
    pub fn upgraded(self) -> Option<Self> {
        Self::from_index(self as u8 + 1)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpkeepResource {
    Wood,
    Stone,
    MetalFragments,
    HighQualityMetal,
}

impl UpkeepResource {
    pub const COUNT: usize = 4;

    pub const ALL: [UpkeepResource; Self::COUNT] = [
        UpkeepResource::Wood,
        UpkeepResource::Stone,
        UpkeepResource::MetalFragments,
        UpkeepResource::HighQualityMetal,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for UpkeepResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpkeepResource::Wood => "wood",
            UpkeepResource::Stone => "stone",
            UpkeepResource::MetalFragments => "metal_fragments",
            UpkeepResource::HighQualityMetal => "high_quality_metal",
        };
        f.write_str(name)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PieceFlags: u8 {
        /// Face is exposed to the outside of the structure.
        const EXTERNAL = 1;
        /// The weak side of the piece faces the attacker.
        const SOFT_SIDE = 2;
    }
}

/// A single building piece occupying one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub category: PieceCategory,
    pub tier: MaterialTier,
    pub health: u32,
    #[serde(default)]
    pub flags: PieceFlags,
    #[serde(default)]
    pub rotation: u8,
}

impl Piece {
    /// A piece at full health for its tier.
    pub fn new(category: PieceCategory, tier: MaterialTier) -> Self {
        Piece {
            category,
            tier,
            health: tier.health(),
            flags: PieceFlags::empty(),
            rotation: 0,
        }
    }

    pub fn with_flags(mut self, flags: PieceFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Rotation in quarter turns, stored modulo 4.
    pub fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = rotation % 4;
        self
    }

    pub fn external(self) -> Self {
        self.with_flags(PieceFlags::EXTERNAL)
    }

    pub fn soft_side(self) -> Self {
        self.with_flags(PieceFlags::SOFT_SIDE)
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.flags.contains(PieceFlags::EXTERNAL)
    }

    #[inline]
    pub fn is_soft_side(&self) -> bool {
        self.flags.contains(PieceFlags::SOFT_SIDE)
    }

    pub fn destroy_cost(&self) -> u32 {
        destroy_cost(self)
    }

    pub fn upkeep(&self) -> Option<(UpkeepResource, u32)> {
        upkeep(self)
    }
}

/// Base destroy cost for a tier and cost class, ignoring soft sides.
pub fn base_destroy_cost(tier: MaterialTier, class: CostClass) -> u32 {
    match class {
        CostClass::Barrier => BARRIER_DESTROY_COST[tier.index()],
        CostClass::Aperture => APERTURE_DESTROY_COST[tier.index()],
    }
}

/// Sulfur cost to destroy the piece.
pub fn destroy_cost(piece: &Piece) -> u32 {
    let cost = base_destroy_cost(piece.tier, piece.category.cost_class());

    match piece.tier {
        MaterialTier::Stone | MaterialTier::Metal if piece.is_soft_side() => cost / 2,
        _ => cost,
    }
}

/// Upkeep paid for the piece, or `None` if it is free.
pub fn upkeep(piece: &Piece) -> Option<(UpkeepResource, u32)> {
    let (resource, amount) = TIER_UPKEEP[piece.tier.index()];
    let amount = amount * piece.category.upkeep_multiplier();

    if amount > 0 {
        Some((resource, amount))
    } else {
        None
    }
}

/// Upkeep amount for the piece, in its tier's resource.
pub fn upkeep_amount(piece: &Piece) -> u32 {
    upkeep(piece).map(|(_, amount)| amount).unwrap_or(0)
}

pub fn blocks_visibility(piece: &Piece) -> bool {
    matches!(
        piece.category,
        PieceCategory::Wall | PieceCategory::Door | PieceCategory::Gate
    )
}

pub fn is_structural(category: PieceCategory) -> bool {
    matches!(
        category,
        PieceCategory::Foundation
            | PieceCategory::Wall
            | PieceCategory::Floor
            | PieceCategory::Ceiling
            | PieceCategory::Doorway
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORIES: [PieceCategory; 15] = [
        PieceCategory::Foundation,
        PieceCategory::Wall,
        PieceCategory::Floor,
        PieceCategory::Ceiling,
        PieceCategory::Doorway,
        PieceCategory::Window,
        PieceCategory::Stairs,
        PieceCategory::Roof,
        PieceCategory::Door,
        PieceCategory::Gate,
        PieceCategory::Cupboard,
        PieceCategory::Bed,
        PieceCategory::Chest,
        PieceCategory::Turret,
        PieceCategory::Trap,
    ];

    #[test]
    fn destroy_cost_positive_and_monotonic_in_tier() {
        for category in CATEGORIES {
            for soft in [false, true] {
                let mut previous = 0;
                for tier in ALL_TIERS {
                    let mut piece = Piece::new(category, tier);
                    if soft {
                        piece = piece.soft_side();
                    }
                    let cost = destroy_cost(&piece);
                    assert!(cost >= 1, "{:?} {:?} cost {}", category, tier, cost);
                    if !soft {
                        assert!(cost >= previous, "{:?} {:?} not monotonic", category, tier);
                    }
                    previous = cost;
                }
            }
        }
    }

    #[test]
    fn health_increases_with_tier() {
        for pair in ALL_TIERS.windows(2) {
            assert!(pair[0].health() < pair[1].health());
        }
    }

    #[test]
    fn soft_side_halves_stone_and_metal_only() {
        for tier in ALL_TIERS {
            let hard = Piece::new(PieceCategory::Wall, tier);
            let soft = hard.soft_side();
            let base = BARRIER_DESTROY_COST[tier.index()];
            match tier {
                MaterialTier::Stone | MaterialTier::Metal => {
                    assert_eq!(destroy_cost(&soft), base / 2)
                }
                _ => assert_eq!(destroy_cost(&soft), base),
            }
            assert_eq!(destroy_cost(&hard), base);
        }
    }

    #[test]
    fn doors_use_aperture_table() {
        let door = Piece::new(PieceCategory::Door, MaterialTier::Stone);
        let gate = Piece::new(PieceCategory::Gate, MaterialTier::Armored);
        let wall = Piece::new(PieceCategory::Wall, MaterialTier::Stone);
        assert_eq!(destroy_cost(&door), 700);
        assert_eq!(destroy_cost(&gate), 2100);
        assert_eq!(destroy_cost(&wall), 1400);
        assert_eq!(
            destroy_cost(&Piece::new(PieceCategory::Door, MaterialTier::Metal).soft_side()),
            525
        );
    }

    #[test]
    fn upkeep_multipliers() {
        let foundation = Piece::new(PieceCategory::Foundation, MaterialTier::Metal);
        assert_eq!(upkeep(&foundation), Some((UpkeepResource::MetalFragments, 40)));

        let roof = Piece::new(PieceCategory::Roof, MaterialTier::Stone);
        assert_eq!(upkeep(&roof), Some((UpkeepResource::Stone, 10)));

        let door = Piece::new(PieceCategory::Door, MaterialTier::Armored);
        assert_eq!(upkeep(&door), None);

        let twig = Piece::new(PieceCategory::Foundation, MaterialTier::Twig);
        assert_eq!(upkeep(&twig), None);
        assert_eq!(upkeep_amount(&twig), 0);
    }

    #[test]
    fn classification() {
        assert!(blocks_visibility(&Piece::new(PieceCategory::Wall, MaterialTier::Wood)));
        assert!(blocks_visibility(&Piece::new(PieceCategory::Gate, MaterialTier::Wood)));
        assert!(!blocks_visibility(&Piece::new(PieceCategory::Window, MaterialTier::Wood)));

        assert!(is_structural(PieceCategory::Doorway));
        assert!(!is_structural(PieceCategory::Window));
        assert!(!is_structural(PieceCategory::Roof));
    }

    #[test]
    fn rotation_wraps_and_tier_upgrades() {
        let piece = Piece::new(PieceCategory::Wall, MaterialTier::Wood).with_rotation(6);
        assert_eq!(piece.rotation, 2);
        assert_eq!(MaterialTier::Wood.upgraded(), Some(MaterialTier::Stone));
        assert_eq!(MaterialTier::Armored.upgraded(), None);
        assert_eq!(MaterialTier::from_index(5), None);
    }
}
