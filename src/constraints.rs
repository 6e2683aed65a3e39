//! Build constraints a generated structure has to satisfy.

use crate::grid::*;
use crate::piece::UpkeepResource;
use crate::raid::*;
use crate::structure::*;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConstraints {
    /// Per-axis upper bound on the structure's dimensions.
    pub max_dimensions: Option<Dimensions>,
    pub min_loot_rooms: Option<usize>,
    pub max_total_upkeep: Option<u32>,
    /// Upper bound per upkeep resource. Resources not listed are unbounded.
    pub max_resource_upkeep: FnvHashMap<UpkeepResource, u32>,
    /// At least two tool cupboards.
    pub require_multi_utility: bool,
    /// At least two beds.
    pub require_multi_spawn: bool,
    /// Lower bound on the cheapest optimized raid.
    pub min_raid_cost: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintViolation {
    DimensionsExceeded { actual: Dimensions, limit: Dimensions },
    TooFewLootRooms { actual: usize, required: usize },
    UpkeepExceeded { actual: u32, limit: u32 },
    ResourceUpkeepExceeded {
        resource: UpkeepResource,
        actual: u32,
        limit: u32,
    },
    SingleUtility { count: usize },
    SingleSpawn { count: usize },
    RaidCostTooLow { actual: u64, required: u64 },
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::DimensionsExceeded { actual, limit } => write!(
                f,
                "dimensions {}x{}x{} exceed {}x{}x{}",
                actual.width, actual.depth, actual.height, limit.width, limit.depth, limit.height
            ),
            ConstraintViolation::TooFewLootRooms { actual, required } => {
                write!(f, "{} loot rooms, need at least {}", actual, required)
            }
            ConstraintViolation::UpkeepExceeded { actual, limit } => {
                write!(f, "upkeep {} exceeds {}", actual, limit)
            }
            ConstraintViolation::ResourceUpkeepExceeded {
                resource,
                actual,
                limit,
            } => write!(f, "{} upkeep {} exceeds {}", resource, actual, limit),
            ConstraintViolation::SingleUtility { count } => {
                write!(f, "{} tool cupboards, need at least 2", count)
            }
            ConstraintViolation::SingleSpawn { count } => {
                write!(f, "{} beds, need at least 2", count)
            }
            ConstraintViolation::RaidCostTooLow { actual, required } => {
                write!(f, "cheapest raid costs {}, need at least {}", actual, required)
            }
        }
    }
}

type Check = fn(&Structure, &BuildConstraints, Option<&RaidSummary>) -> Option<ConstraintViolation>;

fn check_dimensions(
    structure: &Structure,
    constraints: &BuildConstraints,
    _summary: Option<&RaidSummary>,
) -> Option<ConstraintViolation> {
    let limit = constraints.max_dimensions?;
    let actual = structure.dimensions();

    if actual.width > limit.width || actual.depth > limit.depth || actual.height > limit.height {
        Some(ConstraintViolation::DimensionsExceeded { actual, limit })
    } else {
        None
    }
}

fn check_loot_rooms(
    structure: &Structure,
    constraints: &BuildConstraints,
    _summary: Option<&RaidSummary>,
) -> Option<ConstraintViolation> {
    let required = constraints.min_loot_rooms?;
    let actual = structure.loot_rooms.len();

    (actual < required).then_some(ConstraintViolation::TooFewLootRooms { actual, required })
}

fn check_upkeep(
    structure: &Structure,
    constraints: &BuildConstraints,
    _summary: Option<&RaidSummary>,
) -> Option<ConstraintViolation> {
    let limit = constraints.max_total_upkeep?;
    let actual = structure.upkeep_totals().total();

    (actual > limit).then_some(ConstraintViolation::UpkeepExceeded { actual, limit })
}

/// One violation per listed resource over its limit, in resource order.
fn check_resource_upkeep(
    structure: &Structure,
    constraints: &BuildConstraints,
) -> Vec<ConstraintViolation> {
    let totals = structure.upkeep_totals();

    UpkeepResource::ALL
        .iter()
        .filter_map(|&resource| {
            let limit = *constraints.max_resource_upkeep.get(&resource)?;
            let actual = totals.get(resource);

            (actual > limit).then_some(ConstraintViolation::ResourceUpkeepExceeded {
                resource,
                actual,
                limit,
            })
        })
        .collect()
}

fn check_utility(
    structure: &Structure,
    constraints: &BuildConstraints,
    _summary: Option<&RaidSummary>,
) -> Option<ConstraintViolation> {
    let count = structure.tool_cupboards.len();

    (constraints.require_multi_utility && count < 2)
        .then_some(ConstraintViolation::SingleUtility { count })
}

fn check_spawn(
    structure: &Structure,
    constraints: &BuildConstraints,
    _summary: Option<&RaidSummary>,
) -> Option<ConstraintViolation> {
    let count = structure.beds.len();

    (constraints.require_multi_spawn && count < 2)
        .then_some(ConstraintViolation::SingleSpawn { count })
}

fn check_raid_cost(
    _structure: &Structure,
    constraints: &BuildConstraints,
    summary: Option<&RaidSummary>,
) -> Option<ConstraintViolation> {
    let required = constraints.min_raid_cost?;
    let summary = summary.filter(|s| !s.is_empty())?;
    let actual = summary.min_cost;

    (actual < required).then_some(ConstraintViolation::RaidCostTooLow { actual, required })
}

/// Every constraint `structure` violates; empty when it satisfies all of them.
///
/// The raid cost bound needs a simulation summary and is skipped without one
/// or when no loot room was reachable.
pub fn check_constraints(
    structure: &Structure,
    constraints: &BuildConstraints,
    summary: Option<&RaidSummary>,
) -> Vec<ConstraintViolation> {
    // Cheapest first.
    let checks: [Check; 6] = [
        check_dimensions,
        check_loot_rooms,
        check_upkeep,
        check_utility,
        check_spawn,
        check_raid_cost,
    ];

    let mut violations: Vec<_> = checks
        .iter()
        .filter_map(|check| (check)(structure, constraints, summary))
        .collect();

    violations.extend(check_resource_upkeep(structure, constraints));

    violations
}

/// Shorthand for `check_constraints(..).is_empty()`.
pub fn meets_constraints(
    structure: &Structure,
    constraints: &BuildConstraints,
    summary: Option<&RaidSummary>,
) -> bool {
    check_constraints(structure, constraints, summary).is_empty()
}
