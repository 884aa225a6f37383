#![warn(missing_docs)]

//! Tile-grid addressing, tile flip decoding, sprite animation, actor
//! collision and camera helpers for Macroquad.

pub mod actor;
pub mod camera;
pub mod collision;
pub mod config;
pub mod entity;
mod error;
/// Map and atlas file decoding.
pub mod loader {
    pub mod json_loader;
}
pub mod map;
pub mod render;
pub mod spatial;
pub mod sprite;
pub mod tile_id;
pub mod trigger;
pub mod world;

pub use actor::{Actor, Direction, Intent};
pub use camera::Camera;
pub use config::GameConfig;
pub use entity::{Collidable, Contact, Drawable, EntityId, Identity, Positioned, SpriteFrame, Updatable};
pub use error::{MapError, ParseKeyError, SpriteError};
pub use map::{Level, TileAtlas, TileDraw, TileLayer, TileMap};
pub use spatial::{movable_tiles, GridCoord, TileGrid};
pub use sprite::SpriteSheet;
pub use tile_id::{decode, Orientation, TileRef};
pub use trigger::Trigger;
pub use world::World;
