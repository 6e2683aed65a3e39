//! The structure under evaluation: a bounded grid of optional pieces plus the
//! anchors and loot rooms an importer attached to it.
//!
//! All grid writes go through `Structure::set`, which keeps the piece count
//! and upkeep totals in step with the grid contents.

use crate::constants::*;
use crate::error::StructureError;
use crate::grid::*;
use crate::location::*;
use crate::piece::*;
use serde::{Deserialize, Serialize};

/// A high-value target inside the structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootRoom {
    pub position: Position,
    /// Estimated loot value.
    pub value: f64,
    /// 1-10, higher is more important.
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub containers: u32,
}

impl LootRoom {
    pub fn new(position: Position, value: f64) -> Self {
        LootRoom {
            position,
            value,
            priority: 1,
            containers: 1,
        }
    }
}

/// Upkeep amounts per resource.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpkeepTotals {
    amounts: [u32; UpkeepResource::COUNT],
}

impl UpkeepTotals {
    pub fn get(&self, resource: UpkeepResource) -> u32 {
        self.amounts[resource.index()]
    }

    pub fn total(&self) -> u32 {
        self.amounts.iter().sum()
    }

    /// Non-zero entries in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (UpkeepResource, u32)> + '_ {
        UpkeepResource::ALL
            .iter()
            .map(move |&r| (r, self.get(r)))
            .filter(|(_, amount)| *amount > 0)
    }

    fn add_piece(&mut self, piece: &Piece) {
        if let Some((resource, amount)) = upkeep(piece) {
            self.amounts[resource.index()] += amount;
        }
    }

    fn remove_piece(&mut self, piece: &Piece) {
        if let Some((resource, amount)) = upkeep(piece) {
            let slot = &mut self.amounts[resource.index()];
            *slot = slot.saturating_sub(amount);
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMetadata {
    pub upkeep: UpkeepTotals,
    pub piece_count: usize,
}

/// A fortified structure snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "StructureRecord")]
pub struct Structure {
    id: String,
    name: String,
    grid: VoxelGrid<Option<Piece>>,
    /// Utility anchors (tool cupboards).
    pub tool_cupboards: Vec<Position>,
    /// Spawn anchors (beds).
    pub beds: Vec<Position>,
    pub loot_rooms: Vec<LootRoom>,
    metadata: StructureMetadata,
}

/// Wire shape of a structure; metadata is always rebuilt on load.
#[derive(Deserialize)]
struct StructureRecord {
    id: String,
    name: String,
    grid: VoxelGrid<Option<Piece>>,
    #[serde(default)]
    tool_cupboards: Vec<Position>,
    #[serde(default)]
    beds: Vec<Position>,
    #[serde(default)]
    loot_rooms: Vec<LootRoom>,
}

impl TryFrom<StructureRecord> for Structure {
    type Error = StructureError;

    fn try_from(record: StructureRecord) -> Result<Self, Self::Error> {
        let mut structure = Structure {
            id: record.id,
            name: record.name,
            grid: record.grid,
            tool_cupboards: record.tool_cupboards,
            beds: record.beds,
            loot_rooms: record.loot_rooms,
            metadata: StructureMetadata::default(),
        };
        structure.metadata = structure.recompute_metadata();
        Ok(structure)
    }
}

impl Structure {
    /// Create an empty structure. Every dimension must be positive.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: i32,
        depth: i32,
        height: i32,
    ) -> Result<Self, StructureError> {
        let dimensions = Dimensions::new(width, depth, height).ok_or(
            StructureError::InvalidDimensions {
                width,
                depth,
                height,
            },
        )?;

        Ok(Structure {
            id: id.into(),
            name: name.into(),
            grid: VoxelGrid::new(dimensions, None),
            tool_cupboards: Vec::new(),
            beds: Vec::new(),
            loot_rooms: Vec::new(),
            metadata: StructureMetadata::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    pub fn metadata(&self) -> &StructureMetadata {
        &self.metadata
    }

    pub fn piece_count(&self) -> usize {
        self.metadata.piece_count
    }

    pub fn upkeep_totals(&self) -> &UpkeepTotals {
        &self.metadata.upkeep
    }

    #[inline]
    pub fn is_valid(&self, pos: Position) -> bool {
        self.dimensions().contains(pos)
    }

    /// The piece at `pos`, or `None` if the cell is empty or out of bounds.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&Piece> {
        self.grid.get(pos).and_then(|cell| cell.as_ref())
    }

    /// Destroy cost of the piece at `pos`, if any.
    #[inline]
    pub fn destroy_cost_at(&self, pos: Position) -> Option<u32> {
        self.get(pos).map(destroy_cost)
    }

    /// Replace the cell at `pos`, returning the piece that was there.
    ///
    /// Out-of-bounds positions fail without touching the structure.
    pub fn set(
        &mut self,
        pos: Position,
        piece: Option<Piece>,
    ) -> Result<Option<Piece>, StructureError> {
        let previous = self
            .grid
            .replace(pos, piece)
            .map_err(|_| StructureError::OutOfBounds(pos))?;

        if let Some(old) = &previous {
            self.metadata.upkeep.remove_piece(old);
            self.metadata.piece_count -= 1;
        }
        if let Some(new) = &piece {
            self.metadata.upkeep.add_piece(new);
            self.metadata.piece_count += 1;
        }

        Ok(previous)
    }

    pub fn place(&mut self, pos: Position, piece: Piece) -> Result<Option<Piece>, StructureError> {
        self.set(pos, Some(piece))
    }

    pub fn remove(&mut self, pos: Position) -> Result<Option<Piece>, StructureError> {
        self.set(pos, None)
    }

    /// In-bounds face neighbors of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.grid.neighbors(pos)
    }

    /// Whether any tool cupboard lies within `radius` of `pos`.
    pub fn has_coverage(&self, pos: Position, radius: f64) -> bool {
        has_coverage(pos, &self.tool_cupboards, radius)
    }

    /// `has_coverage` at the standard cupboard range.
    pub fn has_utility_coverage(&self, pos: Position) -> bool {
        self.has_coverage(pos, UTILITY_COVERAGE_RADIUS)
    }

    /// Occupied cells in scan order (x outer, y middle, z inner).
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Piece)> + '_ {
        self.grid
            .iter()
            .filter_map(|(pos, cell)| cell.as_ref().map(|piece| (pos, piece)))
    }

    /// Every cell on an x or y face of the volume, occupied or not, in scan order.
    pub fn boundary_cells(&self) -> impl Iterator<Item = Position> {
        let dims = self.dimensions();
        dims.positions()
            .filter(move |pos| dims.is_side_boundary(*pos))
    }

    /// Side faces plus the ground layer.
    pub fn is_boundary_layer(&self, pos: Position) -> bool {
        self.is_valid(pos) && (self.dimensions().is_side_boundary(pos) || pos.z == 0)
    }

    /// Piece count and upkeep derived from the grid contents.
    pub fn recompute_metadata(&self) -> StructureMetadata {
        let mut metadata = StructureMetadata::default();
        for (_, piece) in self.iter() {
            metadata.upkeep.add_piece(piece);
            metadata.piece_count += 1;
        }
        metadata
    }

    /// Upkeep totals derived from the grid contents.
    pub fn recompute_upkeep(&self) -> UpkeepTotals {
        self.recompute_metadata().upkeep
    }

    pub fn add_loot_room(&mut self, room: LootRoom) {
        self.loot_rooms.push(room);
    }
}

/// True if any anchor lies within `radius` of `pos`.
pub fn has_coverage(pos: Position, anchors: &[Position], radius: f64) -> bool {
    anchors.iter().any(|anchor| pos.distance_to(*anchor) <= radius)
}
