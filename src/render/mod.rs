//! Hands tile and sprite draw data to Macroquad.
//!
//! Everything here needs a live Macroquad context except [`tile_quad`].

pub mod cull;

use crate::camera::Camera;
use crate::entity::SpriteFrame;
use crate::map::{Level, TileDraw};
use macroquad::color::WHITE;
use macroquad::math::{vec2, Affine2, Rect, Vec2};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::texture::{draw_texture_ex, DrawTextureParams, Texture2D};

/// Screen-space corners of a transformed `w x h` quad, clockwise from the
/// top-left of the source image.
pub fn tile_quad(transform: Affine2, w: f32, h: f32) -> [Vec2; 4] {
    [
        transform.transform_point2(vec2(0.0, 0.0)),
        transform.transform_point2(vec2(w, 0.0)),
        transform.transform_point2(vec2(w, h)),
        transform.transform_point2(vec2(0.0, h)),
    ]
}

fn uv_rect(source: Rect, tex_w: f32, tex_h: f32) -> [Vec2; 4] {
    let (u0, v0) = (source.x / tex_w, source.y / tex_h);
    let (u1, v1) = ((source.x + source.w) / tex_w, (source.y + source.h) / tex_h);
    [vec2(u0, v0), vec2(u1, v0), vec2(u1, v1), vec2(u0, v1)]
}

/// Draws one tile, applying its flip/rotation transform.
pub fn draw_tile(texture: &Texture2D, draw: &TileDraw) {
    let corners = tile_quad(draw.transform, draw.source.w, draw.source.h);
    let uvs = uv_rect(draw.source, texture.width(), texture.height());
    let vertices = corners
        .iter()
        .zip(uvs.iter())
        .map(|(p, uv)| Vertex::new(p.x, p.y, 0.0, uv.x, uv.y, WHITE))
        .collect();
    draw_mesh(&Mesh {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
        texture: Some(texture.clone()),
    });
}

/// Draws the visible part of every visible layer, bottom layer first.
pub fn draw_level(texture: &Texture2D, level: &Level, camera: &Camera) {
    for (i, layer) in level.map.layers.iter().enumerate() {
        if !layer.visible {
            continue;
        }
        for d in level.visible_draws(i, camera) {
            draw_tile(texture, &d);
        }
    }
}

/// Draws one animation frame at its world position.
pub fn draw_frame(texture: &Texture2D, frame: &SpriteFrame, camera: &Camera) {
    let dest = camera.to_screen(frame.dest);
    draw_texture_ex(
        texture,
        dest.x,
        dest.y,
        WHITE,
        DrawTextureParams {
            source: Some(frame.source),
            dest_size: Some(frame.source.size() * frame.scale),
            ..Default::default()
        },
    );
}
