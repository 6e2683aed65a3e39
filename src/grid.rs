use crate::location::*;
use serde::{Deserialize, Serialize};

/// Extent of a structure grid along each axis. Always positive once built
/// through `Dimensions::new`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub depth: i32,
    pub height: i32,
}

impl Dimensions {
    /// Returns `None` unless every axis is positive and the cell count fits
    /// in a `usize`.
    pub fn new(width: i32, depth: i32, height: i32) -> Option<Self> {
        if width <= 0 || depth <= 0 || height <= 0 {
            return None;
        }

        (width as usize)
            .checked_mul(depth as usize)?
            .checked_mul(height as usize)?;

        Some(Dimensions {
            width,
            depth,
            height,
        })
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x)
            && (0..self.depth).contains(&pos.y)
            && (0..self.height).contains(&pos.z)
    }

    pub fn volume(&self) -> usize {
        (self.width as usize) * (self.depth as usize) * (self.height as usize)
    }

    /// Whether the position lies on an x or y face of the volume.
    #[inline]
    pub fn is_side_boundary(&self, pos: Position) -> bool {
        pos.x == 0 || pos.x == self.width - 1 || pos.y == 0 || pos.y == self.depth - 1
    }

    /// Linear index in scan order (x outer, y middle, z inner).
    #[inline]
    pub fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            let h = self.height as usize;
            let d = self.depth as usize;
            Some(((pos.x as usize) * d + pos.y as usize) * h + pos.z as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn position(&self, index: usize) -> Position {
        let h = self.height as usize;
        let d = self.depth as usize;
        Position::new(
            (index / (d * h)) as i32,
            ((index / h) % d) as i32,
            (index % h) as i32,
        )
    }

    /// Every position in scan order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.volume()).map(move |i| self.position(i))
    }
}

/// Dense per-cell storage for a bounded 3D volume, stored flat in scan order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VoxelGrid<T: Clone> {
    dimensions: Dimensions,
    data: Vec<T>,
}

impl<T: Clone> VoxelGrid<T> {
    pub fn new(dimensions: Dimensions, initial: T) -> Self {
        VoxelGrid {
            dimensions,
            data: vec![initial; dimensions.volume()],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.dimensions.index(pos).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        match self.dimensions.index(pos) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    /// Stores `value` and returns the previous one, or hands `value` back
    /// untouched if `pos` is out of bounds.
    pub fn replace(&mut self, pos: Position, value: T) -> Result<T, T> {
        match self.get_mut(pos) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(value),
        }
    }

    /// In-bounds face neighbors of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.adjacent().filter(move |n| self.dimensions.contains(*n))
    }

    /// Every cell in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.dimensions.position(i), v))
    }
}

impl<'de, T: Clone + Deserialize<'de>> Deserialize<'de> for VoxelGrid<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawGrid<T> {
            dimensions: Dimensions,
            data: Vec<T>,
        }

        let raw = RawGrid::<T>::deserialize(deserializer)?;
        let dimensions = Dimensions::new(
            raw.dimensions.width,
            raw.dimensions.depth,
            raw.dimensions.height,
        )
        .ok_or_else(|| serde::de::Error::custom("grid dimensions must be positive"))?;
        if raw.data.len() != dimensions.volume() {
            return Err(serde::de::Error::custom("Invalid voxel grid size"));
        }
        Ok(VoxelGrid {
            dimensions,
            data: raw.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_reject_non_positive() {
        assert!(Dimensions::new(0, 1, 1).is_none());
        assert!(Dimensions::new(1, -3, 1).is_none());
        assert!(Dimensions::new(1, 1, 1).is_some());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn dimensions_reject_overflowing_volume() {
        assert!(Dimensions::new(i32::MAX, i32::MAX, i32::MAX).is_none());
        assert!(Dimensions::new(i32::MAX, i32::MAX, 2).is_some());
    }

    #[test]
    fn index_matches_scan_order() {
        let dims = Dimensions::new(2, 3, 4).unwrap();
        let mut expected = 0;
        for x in 0..2 {
            for y in 0..3 {
                for z in 0..4 {
                    let pos = Position::new(x, y, z);
                    assert_eq!(dims.index(pos), Some(expected));
                    assert_eq!(dims.position(expected), pos);
                    expected += 1;
                }
            }
        }
        assert_eq!(dims.index(Position::new(2, 0, 0)), None);
        assert_eq!(dims.index(Position::new(0, 0, -1)), None);
    }

    #[test]
    fn replace_out_of_bounds_returns_value() {
        let dims = Dimensions::new(2, 2, 2).unwrap();
        let mut grid = VoxelGrid::new(dims, 0u8);
        assert_eq!(grid.replace(Position::new(5, 0, 0), 7), Err(7));
        assert_eq!(grid.replace(Position::new(1, 1, 1), 7), Ok(0));
        assert_eq!(grid.get(Position::new(1, 1, 1)), Some(&7));
    }

    #[test]
    fn neighbors_clip_at_boundaries() {
        let dims = Dimensions::new(3, 3, 3).unwrap();
        let grid = VoxelGrid::new(dims, ());
        assert_eq!(grid.neighbors(Position::new(0, 0, 0)).count(), 3);
        assert_eq!(grid.neighbors(Position::new(1, 1, 1)).count(), 6);
        assert_eq!(grid.neighbors(Position::new(2, 1, 0)).count(), 4);
    }

    #[test]
    fn deserialize_rejects_size_mismatch() {
        let dims = Dimensions::new(1, 1, 2).unwrap();
        let grid = VoxelGrid::new(dims, 3u32);
        let json = serde_json::to_string(&grid).unwrap();
        let restored: VoxelGrid<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);

        let bad = r#"{"dimensions":{"width":1,"depth":1,"height":2},"data":[1]}"#;
        assert!(serde_json::from_str::<VoxelGrid<u32>>(bad).is_err());
    }
}
