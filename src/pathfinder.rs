//! Cheapest breach path between two cells.
//!
//! The grid is a 6-connected graph. Stepping into an empty cell costs 1;
//! stepping into an occupied cell costs the piece's destroy cost. A piece
//! sitting on the start cell is charged up front since the raid has to
//! breach it before going anywhere. Manhattan distance is the heuristic,
//! which never overestimates because every step costs at least 1.

use crate::constants::*;
use crate::location::*;
use crate::piece::*;
use crate::structure::*;
use log::*;
use pathfinding::directed::astar::astar;
use serde::{Deserialize, Serialize};

/// A route from start to target, both inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub positions: Vec<Position>,
    /// Raw breach cost: start piece plus every step.
    pub cost: u64,
}

impl PathResult {
    pub fn start(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    pub fn target(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn breakdown(&self, structure: &Structure) -> PathBreakdown {
        PathBreakdown::from_path(structure, &self.positions)
    }
}

/// A piece that has to be destroyed along a path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedPiece {
    pub position: Position,
    pub category: PieceCategory,
    pub tier: MaterialTier,
    pub cost: u32,
}

/// Per-cell accounting of a path, charging every cell individually.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathBreakdown {
    pub pieces: Vec<DestroyedPiece>,
    pub empty_cells: usize,
    /// Sum of piece destroy costs plus one per empty cell.
    pub raw_cost: u64,
}

impl PathBreakdown {
    pub fn from_path(structure: &Structure, path: &[Position]) -> Self {
        let mut breakdown = PathBreakdown::default();

        for &position in path {
            match structure.get(position) {
                Some(piece) => {
                    let cost = destroy_cost(piece);
                    breakdown.raw_cost += cost as u64;
                    breakdown.pieces.push(DestroyedPiece {
                        position,
                        category: piece.category,
                        tier: piece.tier,
                        cost,
                    });
                }
                None => {
                    breakdown.empty_cells += 1;
                    breakdown.raw_cost += EMPTY_TRAVERSAL_COST as u64;
                }
            }
        }

        breakdown
    }
}

/// Cost of stepping into `pos`.
#[inline]
pub fn traversal_cost(structure: &Structure, pos: Position) -> u64 {
    structure
        .destroy_cost_at(pos)
        .unwrap_or(EMPTY_TRAVERSAL_COST) as u64
}

/// A* search for the cheapest breach route from `start` to `target`.
///
/// Returns `None` when either endpoint is out of bounds or the target is
/// unreachable from the start.
pub fn find_path(structure: &Structure, start: Position, target: Position) -> Option<PathResult> {
    if !structure.is_valid(start) || !structure.is_valid(target) {
        return None;
    }

    let start_cost = structure.destroy_cost_at(start).unwrap_or(0) as u64;

    let result = astar(
        &start,
        |&pos| {
            structure
                .neighbors(pos)
                .map(|n| (n, traversal_cost(structure, n)))
                .collect::<Vec<_>>()
        },
        |&pos| pos.manhattan_distance(target),
        |&pos| pos == target,
    );

    match result {
        Some((positions, cost)) => Some(PathResult {
            positions,
            cost: start_cost + cost,
        }),
        None => {
            trace!("No path from {} to {}", start, target);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinding::directed::dijkstra::dijkstra;

    fn wall(tier: MaterialTier) -> Piece {
        Piece::new(PieceCategory::Wall, tier)
    }

    fn column_with_wall() -> Structure {
        let mut s = Structure::new("col", "column", 1, 1, 3).unwrap();
        s.place(Position::new(0, 0, 1), wall(MaterialTier::Stone))
            .unwrap();
        s
    }

    #[test]
    fn column_breach() {
        let s = column_with_wall();
        let path = find_path(&s, Position::new(0, 0, 0), Position::new(0, 0, 2)).unwrap();

        assert_eq!(
            path.positions,
            vec![
                Position::new(0, 0, 0),
                Position::new(0, 0, 1),
                Position::new(0, 0, 2)
            ]
        );
        // Empty start is free, then the wall, then one empty step.
        assert_eq!(path.cost, 1401);

        let breakdown = path.breakdown(&s);
        assert_eq!(breakdown.raw_cost, 1402);
        assert_eq!(breakdown.empty_cells, 2);
        assert_eq!(breakdown.pieces.len(), 1);
        assert_eq!(breakdown.pieces[0].cost, 1400);
    }

    #[test]
    fn occupied_start_is_charged() {
        let s = column_with_wall();
        let path = find_path(&s, Position::new(0, 0, 1), Position::new(0, 0, 2)).unwrap();
        assert_eq!(path.cost, 1401);

        let same = find_path(&s, Position::new(0, 0, 1), Position::new(0, 0, 1)).unwrap();
        assert_eq!(same.positions, vec![Position::new(0, 0, 1)]);
        assert_eq!(same.cost, 1400);
    }

    #[test]
    fn routes_around_expensive_pieces() {
        // 3 wide, 1 deep, 2 tall. Armored wall in the middle of the ground
        // layer; going over it through empty cells is cheaper.
        let mut s = Structure::new("s", "s", 3, 1, 2).unwrap();
        s.place(Position::new(1, 0, 0), wall(MaterialTier::Armored))
            .unwrap();

        let path = find_path(&s, Position::new(0, 0, 0), Position::new(2, 0, 0)).unwrap();
        assert_eq!(path.cost, 4);
        assert!(!path.positions.contains(&Position::new(1, 0, 0)));
    }

    #[test]
    fn out_of_bounds_endpoints_are_unreachable() {
        let s = column_with_wall();
        assert!(find_path(&s, Position::new(0, 0, -1), Position::new(0, 0, 2)).is_none());
        assert!(find_path(&s, Position::new(0, 0, 0), Position::new(1, 0, 2)).is_none());
    }

    #[test]
    fn matches_dijkstra_on_mixed_grid() {
        let mut s = Structure::new("s", "s", 5, 4, 3).unwrap();
        let tiers = [
            MaterialTier::Twig,
            MaterialTier::Wood,
            MaterialTier::Stone,
            MaterialTier::Metal,
            MaterialTier::Armored,
        ];
        let mut i = 0usize;
        for x in 0..5 {
            for y in 0..4 {
                for z in 0..3 {
                    i += 1;
                    if (x * 7 + y * 3 + z * 5) % 3 != 0 {
                        let piece = if i % 4 == 0 {
                            Piece::new(PieceCategory::Door, tiers[i % 5])
                        } else {
                            wall(tiers[(i * 3) % 5])
                        };
                        s.place(Position::new(x, y, z), piece).unwrap();
                    }
                }
            }
        }

        let pairs = [
            (Position::new(0, 0, 0), Position::new(4, 3, 2)),
            (Position::new(2, 0, 1), Position::new(2, 3, 0)),
            (Position::new(4, 0, 2), Position::new(0, 3, 0)),
        ];
        for (start, target) in pairs {
            let astar_path = find_path(&s, start, target).unwrap();
            let (_, reference) = dijkstra(
                &start,
                |&pos| {
                    s.neighbors(pos)
                        .map(|n| (n, traversal_cost(&s, n)))
                        .collect::<Vec<_>>()
                },
                |&pos| pos == target,
            )
            .unwrap();
            let start_cost = s.destroy_cost_at(start).unwrap_or(0) as u64;
            assert_eq!(astar_path.cost, reference + start_cost);

            // The reported cost is the cost of the reported route.
            let recomputed: u64 = start_cost
                + astar_path.positions[1..]
                    .iter()
                    .map(|p| traversal_cost(&s, *p))
                    .sum::<u64>();
            assert_eq!(recomputed, astar_path.cost);
            assert!(astar_path
                .positions
                .windows(2)
                .all(|w| w[0].is_adjacent(w[1])));
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let mut s = Structure::new("s", "s", 4, 4, 1).unwrap();
        s.place(Position::new(1, 1, 0), wall(MaterialTier::Wood))
            .unwrap();
        let a = find_path(&s, Position::new(0, 0, 0), Position::new(3, 3, 0)).unwrap();
        let b = find_path(&s, Position::new(0, 0, 0), Position::new(3, 3, 0)).unwrap();
        assert_eq!(a, b);
    }
}
