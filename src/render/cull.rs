//! Which cells a viewport can see.

use crate::spatial::GridCoord;
use macroquad::math::{vec2, Vec2};

const CULL_MARGIN_CELLS: i32 = 1;

/// Inclusive cell range covering the world rectangle `view_min..view_max`,
/// padded by one cell on every side.
pub fn visible_cells(view_min: Vec2, view_max: Vec2, tile_w: u32, tile_h: u32) -> (GridCoord, GridCoord) {
    let tw = tile_w.max(1) as i32;
    let th = tile_h.max(1) as i32;

    let mut cx_min = (view_min.x.floor() as i32).div_euclid(tw);
    let mut cy_min = (view_min.y.floor() as i32).div_euclid(th);
    let mut cx_max = (view_max.x.floor() as i32).div_euclid(tw);
    let mut cy_max = (view_max.y.floor() as i32).div_euclid(th);

    if cx_min > cx_max {
        std::mem::swap(&mut cx_min, &mut cx_max);
    }
    if cy_min > cy_max {
        std::mem::swap(&mut cy_min, &mut cy_max);
    }

    (
        GridCoord::new(cx_min - CULL_MARGIN_CELLS, cy_min - CULL_MARGIN_CELLS),
        GridCoord::new(cx_max + CULL_MARGIN_CELLS, cy_max + CULL_MARGIN_CELLS),
    )
}

/// World-space rectangle of a cell range, for debug overlays.
pub fn cells_extent(min: GridCoord, max: GridCoord, tile_w: u32, tile_h: u32) -> (Vec2, Vec2) {
    let (tw, th) = (tile_w as f32, tile_h as f32);
    (
        vec2(min.col as f32 * tw, min.row as f32 * th),
        vec2((max.col + 1) as f32 * tw, (max.row + 1) as f32 * th),
    )
}
