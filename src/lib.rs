//! Raid cost analysis and defensive scoring for voxel-grid structures.
//!
//! A `Structure` is a bounded grid of building pieces. `simulate_raid` finds
//! the cheapest breach route to every loot room and `evaluate` folds the
//! result, together with visibility, upkeep and anchor redundancy, into one
//! weighted score.

pub mod config;
pub mod constants;
pub mod constraints;
pub mod error;
pub mod grid;
pub mod location;
pub mod pathfinder;
pub mod piece;
pub mod raid;
pub mod scoring;
pub mod splash;
pub mod structure;

pub use config::*;
pub use constraints::*;
pub use error::*;
pub use grid::Dimensions;
pub use location::*;
pub use pathfinder::*;
pub use piece::*;
pub use raid::*;
pub use scoring::*;
pub use splash::*;
pub use structure::*;
