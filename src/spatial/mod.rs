//! Grid addressing and cell occupancy.

mod index;

pub use index::{movable_tiles, GridCoord, TileGrid};
