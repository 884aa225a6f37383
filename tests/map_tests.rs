// tests/map_tests.rs

use macroquad::math::{vec2, Rect, Vec2};
use macroquad_tilegrid::loader::json_loader::{decode_atlas_str, decode_map_str};
use macroquad_tilegrid::{decode, movable_tiles, Camera, GridCoord, Level, TileRef};
use std::path::Path;

fn level(map: &str) -> Level {
    let map = decode_map_str(map).expect("map decodes");
    let atlas = decode_atlas_str(
        r#"{"columns":4,"image":"t.png","imageheight":64,"imagewidth":64,
            "tilewidth":16,"tileheight":16}"#,
        Path::new("assets"),
    )
    .expect("atlas decodes");
    Level::new(map, atlas).expect("level is consistent")
}

#[test]
fn draw_list_carries_source_and_flip_transform() {
    // index 6 with V set at (1, 0), index 1 rotated (D) at (0, 1)
    let lvl = level(
        r#"{"layers":[{"width":2,"height":2,"data":[0, 1073741830, 536870913, 0]}]}"#,
    );
    assert_eq!(lvl.tile_size(), (16, 16));
    let draws = lvl.layer_draws(0, &Camera::with_viewport(64.0, 64.0));
    assert_eq!(draws.len(), 2);

    let v = draws[0];
    assert_eq!(v.at, GridCoord::new(1, 0));
    assert_eq!(v.source, Rect::new(16.0, 16.0, 16.0, 16.0));
    assert_eq!(v.transform.transform_point2(Vec2::ZERO), vec2(16.0, 16.0));
    assert_eq!(v.transform.transform_point2(vec2(16.0, 16.0)), vec2(32.0, 0.0));

    let d = draws[1];
    assert_eq!(d.at, GridCoord::new(0, 1));
    assert_eq!(d.source, Rect::new(0.0, 0.0, 16.0, 16.0));
    // rotated quad still covers its own cell
    let a = d.transform.transform_point2(Vec2::ZERO);
    let b = d.transform.transform_point2(vec2(16.0, 16.0));
    assert!((a.min(b) - vec2(0.0, 16.0)).length() < 1e-4);
    assert!((a.max(b) - vec2(16.0, 32.0)).length() < 1e-4);
}

#[test]
fn decode_reports_ops_and_index() {
    let raw = 0x8000_0000 | 0x4000_0000 | 7;
    let (index, o) = decode(raw);
    assert_eq!(index, 7);
    assert!(o.flip_h && o.flip_v && !o.flip_d);
    assert_eq!(TileRef(raw).ops(), 0b1100);
    assert!(TileRef(0).is_empty());
}

#[test]
fn grid_keys_round_trip_through_text() {
    for at in [GridCoord::new(0, 0), GridCoord::new(12, 3), GridCoord::new(-4, 9)] {
        let key = at.key();
        assert_eq!(GridCoord::parse_key(&key).expect("valid key"), at);
    }
    assert_eq!(GridCoord::new(5, 2).key(), "5:2");
    assert!(GridCoord::parse_key("5-2").is_err());
}

#[test]
fn movable_tiles_form_a_diamond() {
    let origin = GridCoord::new(3, 3);
    let cells = movable_tiles(origin, 2);
    assert_eq!(cells.len(), 13);
    assert!(cells.iter().all(|c| c.manhattan(origin) <= 2));
    assert!(cells.contains(&GridCoord::new(5, 3)));
    assert!(!cells.contains(&GridCoord::new(5, 4)));
}
