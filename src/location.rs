use serde::{Deserialize, Serialize};
use std::fmt;

/// Bits per axis in a packed position.
const PACK_BITS: u32 = 21;
const PACK_MASK: u64 = (1 << PACK_BITS) - 1;
const PACK_BIAS: i64 = 1 << (PACK_BITS - 1);

/// Face-adjacent offsets (6-connectivity).
pub const NEIGHBORS_6: [(i32, i32, i32); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// An integer cell coordinate in a structure grid. `z` is height.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Position { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The face-adjacent positions, unclipped. Offsets that would leave the
    /// `i32` range are skipped.
    pub fn adjacent(self) -> impl Iterator<Item = Position> {
        NEIGHBORS_6.iter().filter_map(move |&(dx, dy, dz)| {
            Some(Position::new(
                self.x.checked_add(dx)?,
                self.y.checked_add(dy)?,
                self.z.checked_add(dz)?,
            ))
        })
    }

    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan_distance(other) == 1
    }

    pub fn manhattan_distance(self, other: Self) -> u64 {
        self.x.abs_diff(other.x) as u64
            + self.y.abs_diff(other.y) as u64
            + self.z.abs_diff(other.z) as u64
    }

    /// Straight-line distance between cell coordinates.
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        let dz = self.z as f64 - other.z as f64;

        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Packs the coordinates into a single key, 21 bits per axis. Coordinates
    /// outside +/-2^20 alias, which is far beyond any structure grid.
    #[inline]
    pub fn packed_repr(self) -> u64 {
        let pack = |v: i32| ((v as i64 + PACK_BIAS) as u64) & PACK_MASK;

        (pack(self.x) << (2 * PACK_BITS)) | (pack(self.y) << PACK_BITS) | pack(self.z)
    }

    #[inline]
    pub fn from_packed(packed: u64) -> Self {
        let unpack = |v: u64| ((v & PACK_MASK) as i64 - PACK_BIAS) as i32;

        Position {
            x: unpack(packed >> (2 * PACK_BITS)),
            y: unpack(packed >> PACK_BITS),
            z: unpack(packed),
        }
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Position::new(x, y, z)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Euclidean distance between two positions.
pub fn distance(a: Position, b: Position) -> f64 {
    a.distance_to(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_roundtrip_handles_negative_coords() {
        for pos in [
            Position::new(0, 0, 0),
            Position::new(12, 7, 3),
            Position::new(-1, -200, 5),
            Position::new(1_000_000, -1_000_000, 42),
        ] {
            assert_eq!(Position::from_packed(pos.packed_repr()), pos);
        }
    }

    #[test]
    fn packed_keys_are_distinct_per_axis() {
        let a = Position::new(1, 0, 0).packed_repr();
        let b = Position::new(0, 1, 0).packed_repr();
        let c = Position::new(0, 0, 1).packed_repr();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn distances() {
        let a = Position::new(0, 0, 0);
        let b = Position::new(3, 4, 0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(a.manhattan_distance(b), 7);
        assert!(!a.is_adjacent(b));
        assert!(a.is_adjacent(Position::new(0, 0, 1)));
    }

    #[test]
    fn distances_at_coordinate_extremes() {
        let lo = Position::new(i32::MIN, i32::MIN, i32::MIN);
        let hi = Position::new(i32::MAX, i32::MAX, i32::MAX);
        let span = u32::MAX as u64;

        assert_eq!(lo.manhattan_distance(hi), 3 * span);
        assert!(!lo.is_adjacent(hi));
        assert_eq!(
            distance(Position::new(i32::MIN, 0, 0), Position::new(i32::MAX, 0, 0)),
            span as f64
        );
        assert!(distance(lo, hi).is_finite());
        assert_eq!(hi.adjacent().count(), 3);
    }

    #[test]
    fn adjacent_yields_six_faces() {
        let p = Position::new(2, 2, 2);
        let faces: Vec<_> = p.adjacent().collect();
        assert_eq!(faces.len(), 6);
        assert!(faces.iter().all(|f| p.is_adjacent(*f)));
    }
}
