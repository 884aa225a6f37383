//! Tile maps, atlases and per-tile draw lists.

use crate::camera::Camera;
use crate::error::MapError;
use crate::loader::json_loader::{decode_atlas_file, decode_map_file};
use crate::render::cull::visible_cells;
use crate::spatial::GridCoord;
use crate::tile_id::TileRef;
use anyhow::Context;
use macroquad::math::{vec2, Affine2, Rect, Vec2};
use std::path::{Path, PathBuf};

/// One tile layer: a row-major grid of packed tile references.
#[derive(Debug, Clone)]
pub struct TileLayer {
    /// Layer name from the map file.
    pub name: String,
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Hidden layers are skipped by the renderer.
    pub visible: bool,
    /// Row-major, `width * height` entries.
    pub data: Vec<TileRef>,
}

impl TileLayer {
    /// The tile at `(col, row)`, or an empty ref outside the layer.
    pub fn get(&self, col: i32, row: i32) -> TileRef {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return TileRef::default();
        }
        (row as usize)
            .checked_mul(self.width)
            .and_then(|i| i.checked_add(col as usize))
            .and_then(|i| self.data.get(i))
            .copied()
            .unwrap_or_default()
    }

    /// Non-empty cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, TileRef)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(move |(i, t)| {
                let at = GridCoord::new((i % width) as i32, (i / width) as i32);
                (at, *t)
            })
    }
}

/// The tile layers of one map.
#[derive(Debug, Clone)]
pub struct TileMap {
    /// Tile width declared by the map; 0 when the map leaves it to the atlas.
    pub tile_w: u32,
    /// Tile height declared by the map; 0 when left to the atlas.
    pub tile_h: u32,
    /// Tile layers, bottom first.
    pub layers: Vec<TileLayer>,
}

impl TileMap {
    /// Size in tiles, the largest extent over all layers.
    pub fn size_in_tiles(&self) -> (usize, usize) {
        self.layers.iter().fold((0, 0), |(w, h), l| {
            (w.max(l.width), h.max(l.height))
        })
    }
}

/// A regular grid of tiles cut from one image.
#[derive(Debug, Clone)]
pub struct TileAtlas {
    /// Atlas image, resolved against the atlas file.
    pub image: PathBuf,
    /// Image width in pixels (0 if the file omits it).
    pub image_w: u32,
    /// Image height in pixels.
    pub image_h: u32,
    /// Tiles per row.
    pub columns: u32,
    /// Tile rows, `image_h / tile_h`.
    pub rows: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Highest valid sprite index.
    pub tilecount: u32,
    /// Pixels between tiles.
    pub spacing: u32,
    /// Pixels around the tile block.
    pub margin: u32,
}

impl TileAtlas {
    /// Atlas sub-rectangle for a 1-based sprite index; `None` for 0 and for
    /// indices past the last tile.
    pub fn source_rect(&self, index: u32) -> Option<Rect> {
        if index == 0 || index > self.tilecount {
            return None;
        }
        let local = index - 1;
        let col = local % self.columns;
        let row = local / self.columns;
        let sx = self.margin + col * (self.tile_w + self.spacing);
        let sy = self.margin + row * (self.tile_h + self.spacing);
        Some(Rect::new(
            sx as f32,
            sy as f32,
            self.tile_w as f32,
            self.tile_h as f32,
        ))
    }
}

/// Everything the renderer needs for one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDraw {
    /// Cell the tile sits in.
    pub at: GridCoord,
    /// Atlas sub-rectangle.
    pub source: Rect,
    /// Maps the `tile_w x tile_h` quad at the origin to screen space.
    pub transform: Affine2,
}

/// A tile map together with the atlas it draws from.
#[derive(Debug, Clone)]
pub struct Level {
    /// The layers.
    pub map: TileMap,
    /// The atlas they index into.
    pub atlas: TileAtlas,
}

impl Level {
    /// Loads and cross-checks a map and its atlas. Any failure is fatal for
    /// the level; nothing is partially loaded.
    pub fn load(map_path: impl AsRef<Path>, atlas_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let map_path = map_path.as_ref();
        let atlas_path = atlas_path.as_ref();
        let map = decode_map_file(map_path)
            .with_context(|| format!("Loading map {}", map_path.display()))?;
        let atlas = decode_atlas_file(atlas_path)
            .with_context(|| format!("Loading atlas {}", atlas_path.display()))?;
        Self::new(map, atlas)
            .with_context(|| format!("Checking {} against its atlas", map_path.display()))
    }

    /// Pairs a map with its atlas, checking layer sizes and sprite indices.
    pub fn new(mut map: TileMap, atlas: TileAtlas) -> Result<Self, MapError> {
        if map.tile_w == 0 || map.tile_h == 0 {
            map.tile_w = atlas.tile_w;
            map.tile_h = atlas.tile_h;
        }
        for (i, layer) in map.layers.iter().enumerate() {
            let expected = layer.width.checked_mul(layer.height);
            if expected != Some(layer.data.len()) {
                return Err(MapError::InvalidLayerSize {
                    layer: i,
                    len: layer.data.len(),
                    expected: expected.unwrap_or(usize::MAX),
                });
            }
            if let Some(bad) = layer.data.iter().find(|t| t.index() > atlas.tilecount) {
                return Err(MapError::InvalidTileIndex {
                    layer: i,
                    index: bad.index(),
                    max_index: atlas.tilecount,
                });
            }
        }
        Ok(Level { map, atlas })
    }

    /// Tile size in pixels.
    pub fn tile_size(&self) -> (u32, u32) {
        (self.map.tile_w, self.map.tile_h)
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        let (w, h) = self.map.size_in_tiles();
        vec2(
            w as f32 * self.map.tile_w as f32,
            h as f32 * self.map.tile_h as f32,
        )
    }

    fn tile_draw(&self, at: GridCoord, tile: TileRef, camera: &Camera) -> Option<TileDraw> {
        let (index, orientation) = tile.decode();
        let source = self.atlas.source_rect(index)?;
        let (tw, th) = (self.map.tile_w as f32, self.map.tile_h as f32);
        let cell = vec2(at.col as f32 * tw, at.row as f32 * th);
        let mut transform = Affine2::from_translation(camera.to_screen(cell));
        if !orientation.is_identity() {
            transform = transform * orientation.transform(tw, th);
        }
        Some(TileDraw {
            at,
            source,
            transform,
        })
    }

    /// Draw list for one layer, every non-empty tile, ignoring the viewport.
    pub fn layer_draws(&self, layer: usize, camera: &Camera) -> Vec<TileDraw> {
        let Some(l) = self.map.layers.get(layer) else {
            return Vec::new();
        };
        l.cells()
            .filter_map(|(at, t)| self.tile_draw(at, t, camera))
            .collect()
    }

    /// Draw list for one layer restricted to the cells the camera can see.
    pub fn visible_draws(&self, layer: usize, camera: &Camera) -> Vec<TileDraw> {
        let Some(l) = self.map.layers.get(layer) else {
            return Vec::new();
        };
        let view = camera.view_rect();
        let (min, max) = visible_cells(
            view.point(),
            view.point() + view.size(),
            self.map.tile_w,
            self.map.tile_h,
        );
        let mut out = Vec::new();
        for row in min.row.max(0)..=max.row.min(l.height as i32 - 1) {
            for col in min.col.max(0)..=max.col.min(l.width as i32 - 1) {
                let t = l.get(col, row);
                if t.is_empty() {
                    continue;
                }
                if let Some(d) = self.tile_draw(GridCoord::new(col, row), t, camera) {
                    out.push(d);
                }
            }
        }
        out
    }
}
