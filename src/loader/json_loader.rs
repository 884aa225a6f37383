// src/loader/json_loader.rs
//! Serde decoding of Tiled-style map and tileset JSON.

use crate::error::MapError;
use crate::map::{TileAtlas, TileLayer, TileMap};
use crate::tile_id::TileRef;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAP_EXTENSIONS: &[&str] = &["json", "tmj"];
const ATLAS_EXTENSIONS: &[&str] = &["json", "tsj"];

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default)]
    name: String,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct JsonMap {
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    layers: Vec<JsonLayer>,
}

#[derive(Deserialize)]
struct JsonAtlas {
    columns: u32,
    image: String,
    imageheight: u32,
    #[serde(default)]
    imagewidth: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    tilecount: Option<u32>,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
}

fn check_extension(p: &Path, allowed: &[&str], what: &str) -> Result<(), MapError> {
    match p.extension().and_then(|e| e.to_str()) {
        Some(ext) if allowed.contains(&ext) => Ok(()),
        _ => Err(MapError::InvalidMap(format!(
            "{what} file must be one of {allowed:?}: {}",
            p.display()
        ))),
    }
}

fn read(p: &Path) -> Result<String, MapError> {
    std::fs::read_to_string(p).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })
}

fn map_from_json(j: JsonMap) -> Result<TileMap, MapError> {
    let mut layers = Vec::with_capacity(j.layers.len());
    for (i, l) in j.layers.into_iter().enumerate() {
        if l.kind.as_deref().unwrap_or("tilelayer") != "tilelayer" {
            debug!("skipping non-tile layer {} ({:?})", i, l.name);
            continue;
        }
        let Some(expected) = l.width.checked_mul(l.height) else {
            return Err(MapError::InvalidMap(format!(
                "layer {} is too large: {}x{}",
                i, l.width, l.height
            )));
        };
        if l.data.len() != expected {
            return Err(MapError::InvalidLayerSize {
                layer: i,
                len: l.data.len(),
                expected,
            });
        }
        layers.push(TileLayer {
            name: l.name,
            width: l.width,
            height: l.height,
            visible: l.visible,
            data: l.data.into_iter().map(TileRef).collect(),
        });
    }

    Ok(TileMap {
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        layers,
    })
}

fn atlas_from_json(j: JsonAtlas, base_dir: &Path) -> Result<TileAtlas, MapError> {
    if j.columns == 0 || j.tilewidth == 0 || j.tileheight == 0 {
        return Err(MapError::InvalidAtlas(format!(
            "columns ({}) and tile size ({}x{}) must be non-zero",
            j.columns, j.tilewidth, j.tileheight
        )));
    }
    let rows = j.imageheight / j.tileheight;
    if rows == 0 {
        return Err(MapError::InvalidAtlas(format!(
            "image height {} is smaller than one tile ({})",
            j.imageheight, j.tileheight
        )));
    }

    Ok(TileAtlas {
        image: base_dir.join(&j.image),
        image_w: j.imagewidth,
        image_h: j.imageheight,
        columns: j.columns,
        rows,
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        tilecount: j.tilecount.unwrap_or(j.columns * rows),
        spacing: j.spacing,
        margin: j.margin,
    })
}

/// Parses tile-map JSON held in memory.
pub fn decode_map_str(txt: &str) -> Result<TileMap, MapError> {
    let j: JsonMap = serde_json::from_str(txt).map_err(MapError::Parse)?;
    map_from_json(j)
}

/// Reads a `.json`/`.tmj` map file.
pub fn decode_map_file(path: &Path) -> Result<TileMap, MapError> {
    check_extension(path, MAP_EXTENSIONS, "Map")?;
    let txt = read(path)?;
    let j: JsonMap = serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let map = map_from_json(j)?;
    debug!(
        "loaded map {} ({} tile layers)",
        path.display(),
        map.layers.len()
    );
    Ok(map)
}

/// Parses atlas JSON held in memory; the image path is resolved against `base_dir`.
pub fn decode_atlas_str(txt: &str, base_dir: &Path) -> Result<TileAtlas, MapError> {
    let j: JsonAtlas = serde_json::from_str(txt).map_err(MapError::Parse)?;
    atlas_from_json(j, base_dir)
}

/// Reads a `.json`/`.tsj` atlas file; the image path is resolved next to it.
pub fn decode_atlas_file(path: &Path) -> Result<TileAtlas, MapError> {
    check_extension(path, ATLAS_EXTENSIONS, "Atlas")?;
    let txt = read(path)?;
    let j: JsonAtlas = serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));
    let atlas = atlas_from_json(j, &base_dir)?;
    debug!(
        "loaded atlas {} ({}x{} tiles of {}x{})",
        path.display(),
        atlas.columns,
        atlas.rows,
        atlas.tile_w,
        atlas.tile_h
    );
    Ok(atlas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_tilegrid_loader_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn keeps_flag_bits_in_layer_data() {
        let map = decode_map_str(
            r#"{"layers":[{"data":[1, 2147483649, 0, 536870915],"width":2,"height":2}]}"#,
        )
        .expect("decode");
        let layer = &map.layers[0];
        assert_eq!(layer.data[1].index(), 1);
        assert!(layer.data[1].flip_h());
        assert!(layer.data[3].flip_d());
        assert_eq!(layer.data[3].index(), 3);
    }

    #[test]
    fn ignores_unknown_fields_and_object_layers() {
        let map = decode_map_str(
            r#"{
              "compressionlevel": -1,
              "tilewidth": 16, "tileheight": 16,
              "layers": [
                {"type":"tilelayer","name":"floor","data":[1,1],"width":2,"height":1,"opacity":1},
                {"type":"objectgroup","name":"spawns","objects":[]}
              ]
            }"#,
        )
        .expect("decode");
        assert_eq!(map.layers.len(), 1);
        assert_eq!(map.layers[0].name, "floor");
        assert_eq!((map.tile_w, map.tile_h), (16, 16));
    }

    #[test]
    fn returns_typed_error_for_layer_size_mismatch() {
        let err = decode_map_str(r#"{"layers":[{"data":[1,2,3],"width":2,"height":2}]}"#)
            .err()
            .expect("expected decode error");
        assert!(matches!(
            err,
            MapError::InvalidLayerSize {
                layer: 0,
                len: 3,
                expected: 4
            }
        ));
    }

    #[test]
    fn returns_typed_error_for_oversized_layer() {
        let err = decode_map_str(
            r#"{"layers":[{"data":[1],"width":4294967296,"height":4294967296}]}"#,
        )
        .err()
        .expect("expected decode error");
        assert!(matches!(err, MapError::InvalidMap(_)));
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        fs::write(&map_path, "{ not json").expect("failed to write map");

        let err = decode_map_file(&map_path)
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_file() {
        let dir = temp_dir();
        let err = decode_atlas_file(&dir.join("missing.tsj"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = decode_map_file(Path::new("level.tmx"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::InvalidMap(_)));
    }

    #[test]
    fn atlas_rows_come_from_image_height() {
        let dir = temp_dir();
        let ts_path = dir.join("tileset.tsj");
        fs::write(
            &ts_path,
            r#"{"columns":22,"image":"TilesetFloor.png","imageheight":416,"imagewidth":352,
                "tilewidth":16,"tileheight":16,"margin":0,"tilecount":572,"tiles":[]}"#,
        )
        .expect("failed to write tileset");

        let atlas = decode_atlas_file(&ts_path).expect("decode");
        assert_eq!(atlas.rows, 26);
        assert_eq!(atlas.columns, 22);
        assert_eq!(atlas.tilecount, 572);
        assert_eq!(atlas.image, dir.join("TilesetFloor.png"));
    }

    #[test]
    fn rejects_atlas_without_columns() {
        let err = decode_atlas_str(
            r#"{"columns":0,"image":"a.png","imageheight":16,"tilewidth":16,"tileheight":16}"#,
            Path::new("."),
        )
        .err()
        .expect("expected decode error");
        assert!(matches!(err, MapError::InvalidAtlas(_)));
    }
}
