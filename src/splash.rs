//! Splash damage optimization for a found path.
//!
//! Explosives damage every piece adjacent to the impact, so pieces that are
//! destroyed next to each other share cost. The occupied cells of a path are
//! grouped into blast groups (face-connected components among the path's own
//! occupied cells) and groups of two or more pieces pay 75% of their raw
//! cost, rounded up. Pieces outside the path never join or bridge a group.

use crate::config::RaidMethod;
use crate::constants::*;
use crate::location::*;
use crate::structure::*;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// A set of face-connected path pieces destroyed together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastGroup {
    /// Members in path order.
    pub positions: Vec<Position>,
    /// Sum of member destroy costs.
    pub raw_cost: u64,
    /// Cost after the splash discount.
    pub cost: u64,
    /// Estimated charges for `cost`. Informational only.
    pub charges: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplashReport {
    /// Discounted group costs plus one per empty path cell.
    pub cost: u64,
    /// Undiscounted group costs plus one per empty path cell.
    pub raw_cost: u64,
    pub groups: Vec<BlastGroup>,
    /// Raw group cost minus discounted group cost.
    pub savings: u64,
    pub empty_cells: usize,
}

/// Applies the splash discount to a raw group cost.
#[inline]
pub fn discounted_cost(raw_cost: u64, members: usize) -> u64 {
    if members >= 2 {
        let (num, den) = SPLASH_EFFICIENCY;
        (raw_cost * num).div_ceil(den)
    } else {
        raw_cost
    }
}

/// Union-find over a small arena of indices.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        DisjointSet {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Splash-optimized cost of `path` with the default raid method.
pub fn optimize_splash(structure: &Structure, path: &[Position]) -> SplashReport {
    optimize_splash_with(structure, path, RaidMethod::default())
}

/// Splash-optimized cost of `path`; `method` only drives the charge estimate.
pub fn optimize_splash_with(
    structure: &Structure,
    path: &[Position],
    method: RaidMethod,
) -> SplashReport {
    // Arena of distinct occupied path cells, keyed by packed position.
    let mut members: Vec<(Position, u64)> = Vec::new();
    let mut index_of: FnvHashMap<u64, usize> = FnvHashMap::default();
    let mut empty_cells = 0usize;

    for &pos in path {
        match structure.destroy_cost_at(pos) {
            Some(cost) => {
                index_of.entry(pos.packed_repr()).or_insert_with(|| {
                    members.push((pos, cost as u64));
                    members.len() - 1
                });
            }
            None => empty_cells += 1,
        }
    }

    let mut sets = DisjointSet::new(members.len());
    for (i, (pos, _)) in members.iter().enumerate() {
        for neighbor in pos.adjacent() {
            if let Some(&j) = index_of.get(&neighbor.packed_repr()) {
                sets.union(i, j);
            }
        }
    }

    // Groups ordered by their first member's place in the path.
    let mut group_of_root: FnvHashMap<usize, usize> = FnvHashMap::default();
    let mut members_by_group: Vec<Vec<usize>> = Vec::new();
    for i in 0..members.len() {
        let root = sets.find(i);
        let group = *group_of_root.entry(root).or_insert_with(|| {
            members_by_group.push(Vec::new());
            members_by_group.len() - 1
        });
        members_by_group[group].push(i);
    }

    let groups: Vec<BlastGroup> = members_by_group
        .into_iter()
        .map(|indices| {
            let raw_cost: u64 = indices.iter().map(|&i| members[i].1).sum();
            let cost = discounted_cost(raw_cost, indices.len());
            BlastGroup {
                positions: indices.iter().map(|&i| members[i].0).collect(),
                raw_cost,
                cost,
                charges: method.charges_for(cost),
            }
        })
        .collect();

    let raw_group_cost: u64 = groups.iter().map(|g| g.raw_cost).sum();
    let group_cost: u64 = groups.iter().map(|g| g.cost).sum();
    let movement_cost = empty_cells as u64 * EMPTY_TRAVERSAL_COST as u64;

    SplashReport {
        cost: group_cost + movement_cost,
        raw_cost: raw_group_cost + movement_cost,
        groups,
        savings: raw_group_cost - group_cost,
        empty_cells,
    }
}

/// Incremental cost of extending a path onto `pos`: 1 for an empty cell,
/// otherwise the destroy cost, discounted when a previous path cell is
/// face-adjacent.
pub fn estimate_step_cost(structure: &Structure, pos: Position, previous: &[Position]) -> u64 {
    let cost = match structure.destroy_cost_at(pos) {
        Some(cost) => cost as u64,
        None => return EMPTY_TRAVERSAL_COST as u64,
    };

    if previous.iter().any(|p| p.is_adjacent(pos)) {
        discounted_cost(cost, 2)
    } else {
        cost
    }
}
