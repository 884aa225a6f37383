// tests/load_tests.rs

use macroquad_tilegrid::{Level, MapError};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const MAP_JSON: &str = r#"{
    "width": 3, "height": 2,
    "tilewidth": 16, "tileheight": 16,
    "layers": [
        {"type": "tilelayer", "name": "floor", "width": 3, "height": 2,
         "data": [1, 2, 3, 23, 0, 2147483649]},
        {"type": "objectgroup", "name": "spawns", "objects": []}
    ]
}"#;

const ATLAS_JSON: &str = r#"{
    "columns": 22, "image": "TilesetFloor.png",
    "imageheight": 416, "imagewidth": 352,
    "tilewidth": 16, "tileheight": 16,
    "margin": 0, "spacing": 0, "tilecount": 572
}"#;

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mq_tilegrid_load_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

#[test]
fn loads_level_from_map_and_atlas_files() {
    let dir = temp_dir();
    let map_path = dir.join("level.tmj");
    let atlas_path = dir.join("floor.tsj");
    fs::write(&map_path, MAP_JSON).expect("failed to write map");
    fs::write(&atlas_path, ATLAS_JSON).expect("failed to write atlas");

    let level = Level::load(&map_path, &atlas_path).expect("level loads");
    assert_eq!(level.map.layers.len(), 1);
    assert_eq!(level.tile_size(), (16, 16));
    assert_eq!(level.atlas.image, dir.join("TilesetFloor.png"));

    let layer = &level.map.layers[0];
    assert_eq!(layer.data.iter().filter(|t| !t.is_empty()).count(), 5);
    assert!(layer.get(2, 1).flip_h());
    assert_eq!(layer.get(2, 1).index(), 1);

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn index_past_atlas_surfaces_typed_error() {
    let dir = temp_dir();
    let map_path = dir.join("level.json");
    let atlas_path = dir.join("floor.tsj");
    fs::write(
        &map_path,
        r#"{"tilewidth":16,"tileheight":16,"layers":[{"width":1,"height":1,"data":[9000]}]}"#,
    )
    .expect("failed to write map");
    fs::write(&atlas_path, ATLAS_JSON).expect("failed to write atlas");

    let err = Level::load(&map_path, &atlas_path)
        .err()
        .expect("expected load error");
    match err.downcast_ref::<MapError>() {
        Some(MapError::InvalidTileIndex {
            layer: 0,
            index: 9000,
            max_index: 572,
        }) => {}
        other => panic!("expected InvalidTileIndex, got {:?}", other),
    }

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn missing_atlas_is_an_io_error_with_context() {
    let dir = temp_dir();
    let map_path = dir.join("level.json");
    fs::write(&map_path, MAP_JSON).expect("failed to write map");

    let err = Level::load(&map_path, dir.join("nowhere.tsj"))
        .err()
        .expect("expected load error");
    assert!(format!("{err:#}").contains("Loading atlas"));
    assert!(matches!(
        err.downcast_ref::<MapError>(),
        Some(MapError::Io { .. })
    ));

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn unsupported_map_format_is_rejected() {
    let err = Level::load("foo.tmx", "floor.tsj")
        .err()
        .expect("expected load error");
    assert!(matches!(
        err.downcast_ref::<MapError>(),
        Some(MapError::InvalidMap(_))
    ));
}
