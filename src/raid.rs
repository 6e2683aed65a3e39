//! Multi-target raid simulation.
//!
//! For each loot room, every entry point is tried as a path start and the
//! cheapest raw path wins. The winning path is then splash-optimized to get
//! the reported cost. Loot rooms no entry can reach are left out of the
//! ranking and counted separately.

use crate::config::*;
use crate::constants::*;
use crate::location::*;
use crate::pathfinder::*;
use crate::splash::*;
use crate::structure::*;
use itertools::Itertools;
use log::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The cheapest raid on one loot room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaidResult {
    pub loot_room: LootRoom,
    pub entry: Position,
    pub path: PathResult,
    /// A* cost of `path`.
    pub raw_cost: u64,
    /// Splash-optimized cost of `path`.
    pub cost: u64,
    /// Loot value per unit of optimized cost.
    pub efficiency: f64,
    pub splash: SplashReport,
    pub method: RaidMethod,
}

impl RaidResult {
    pub fn target(&self) -> Position {
        self.loot_room.position
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RaidSummary {
    /// Reachable loot rooms, most efficient first.
    pub results: Vec<RaidResult>,
    pub min_cost: u64,
    pub max_cost: u64,
    pub mean_cost: f64,
    pub best_target: Option<Position>,
    pub best_efficiency: f64,
    pub unreachable_rooms: usize,
    pub entry_point_count: usize,
    pub method: RaidMethod,
}

impl RaidSummary {
    pub fn reachable_rooms(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Candidate raid starts in scan order, without duplicates.
///
/// Every externally flagged piece plus every x/y perimeter cell near the
/// ground, occupied or not. Never empty, since every structure has at least
/// one perimeter cell at z 0.
pub fn find_entry_points(structure: &Structure) -> Vec<Position> {
    let dims = structure.dimensions();

    dims.positions()
        .filter(|&pos| {
            let external = structure.get(pos).map(|p| p.is_external()).unwrap_or(false);
            let ground_perimeter = pos.z <= GROUND_ENTRY_MAX_Z && dims.is_side_boundary(pos);
            external || ground_perimeter
        })
        .collect()
}

/// Cheapest raw path from any entry to `target`, with its entry index.
///
/// Ties keep the lowest entry index.
fn cheapest_path(
    structure: &Structure,
    entries: &[Position],
    target: Position,
) -> Option<(usize, PathResult)> {
    #[cfg(feature = "parallel")]
    let best = entries
        .par_iter()
        .enumerate()
        .filter_map(|(index, &entry)| {
            find_path(structure, entry, target).map(|path| (index, path))
        })
        .min_by_key(|(index, path)| (path.cost, *index));

    #[cfg(not(feature = "parallel"))]
    let best = entries
        .iter()
        .enumerate()
        .filter_map(|(index, &entry)| {
            find_path(structure, entry, target).map(|path| (index, path))
        })
        .min_by_key(|(index, path)| (path.cost, *index));

    best
}

fn simulate_room(
    structure: &Structure,
    entries: &[Position],
    room: &LootRoom,
    method: RaidMethod,
) -> Option<RaidResult> {
    let (index, path) = cheapest_path(structure, entries, room.position)?;
    let splash = optimize_splash_with(structure, &path.positions, method);
    let cost = splash.cost;

    trace!(
        "Loot room {} best entry {} raw {} optimized {}",
        room.position,
        entries[index],
        path.cost,
        cost
    );

    Some(RaidResult {
        loot_room: room.clone(),
        entry: entries[index],
        raw_cost: path.cost,
        cost,
        efficiency: room.value / cost.max(1) as f64,
        path,
        splash,
        method,
    })
}

/// Raid every loot room with the default settings.
pub fn simulate_raid(structure: &Structure) -> RaidSummary {
    simulate_raid_with(structure, &RaidConfig::default())
}

pub fn simulate_raid_with(structure: &Structure, config: &RaidConfig) -> RaidSummary {
    let entries = find_entry_points(structure);

    let mut results = Vec::with_capacity(structure.loot_rooms.len());
    let mut unreachable_rooms = 0;

    for room in &structure.loot_rooms {
        match simulate_room(structure, &entries, room, config.method) {
            Some(result) => results.push(result),
            None => {
                trace!("Loot room {} is unreachable", room.position);
                unreachable_rooms += 1;
            }
        }
    }

    // Stable, so equal efficiencies keep loot room order.
    results.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));

    let (min_cost, max_cost) = results
        .iter()
        .map(|r| r.cost)
        .minmax()
        .into_option()
        .unwrap_or((0, 0));

    let mean_cost = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.cost as f64).sum::<f64>() / results.len() as f64
    };

    let best_target = results.first().map(|r| r.target());
    let best_efficiency = results.first().map(|r| r.efficiency).unwrap_or(0.0);

    debug!(
        "Raid simulation of {}: {} entries, {} loot rooms, {} reachable",
        structure.id(),
        entries.len(),
        structure.loot_rooms.len(),
        results.len()
    );

    RaidSummary {
        results,
        min_cost,
        max_cost,
        mean_cost,
        best_target,
        best_efficiency,
        unreachable_rooms,
        entry_point_count: entries.len(),
        method: config.method,
    }
}
