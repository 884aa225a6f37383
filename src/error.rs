use serde_json::Error as SerdeError;
use std::path::PathBuf;
use std::{error, fmt, io};

/// Errors raised while loading maps, atlases and config files.
#[derive(Debug)]
pub enum MapError {
    /// The file could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is not valid JSON for the expected shape.
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        source: SerdeError,
    },
    /// In-memory JSON that does not match the expected shape.
    Parse(SerdeError),
    /// The map is structurally unusable (wrong extension, zero tile size, ...).
    InvalidMap(String),
    /// A layer's data length does not match `width * height`.
    InvalidLayerSize {
        /// Position of the layer in the map's layer list.
        layer: usize,
        /// Number of entries found in `data`.
        len: usize,
        /// `width * height`.
        expected: usize,
    },
    /// A layer references a sprite index past the end of the atlas.
    InvalidTileIndex {
        /// Position of the layer in the map's layer list.
        layer: usize,
        /// Offending sprite index (flags stripped).
        index: u32,
        /// Highest index the atlas can resolve.
        max_index: u32,
    },
    /// The atlas description cannot address any tile.
    InvalidAtlas(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            MapError::Json { path, source } => {
                write!(f, "Failed to parse JSON in {}: {}", path.display(), source)
            }
            MapError::Parse(e) => write!(f, "Failed to parse JSON: {}", e),
            MapError::InvalidMap(msg) => write!(f, "Invalid map: {}", msg),
            MapError::InvalidLayerSize {
                layer,
                len,
                expected,
            } => write!(
                f,
                "Invalid layer size for layer {}: {} tiles, expected {}",
                layer, len, expected
            ),
            MapError::InvalidTileIndex {
                layer,
                index,
                max_index,
            } => write!(
                f,
                "Layer {} references sprite {} but the atlas only has {}",
                layer, index, max_index
            ),
            MapError::InvalidAtlas(msg) => write!(f, "Invalid atlas: {}", msg),
        }
    }
}

impl error::Error for MapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            MapError::Parse(source) => Some(source),
            _ => None,
        }
    }
}

/// Errors raised by [`SpriteSheet`](crate::SpriteSheet) configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    /// The requested animation state was never registered.
    UnknownAnimation(String),
    /// A frame list is empty or has an odd number of coordinates.
    InvalidFrames {
        /// Animation state key.
        key: String,
        /// Length of the flat offset list.
        len: usize,
    },
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteError::UnknownAnimation(key) => write!(f, "Unknown animation state '{}'", key),
            SpriteError::InvalidFrames { key, len } => write!(
                f,
                "Animation '{}' needs a non-empty list of x,y pairs, got {} values",
                key, len
            ),
        }
    }
}

impl error::Error for SpriteError {}

/// A grid key that is not of the form `"col:row"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed grid key '{}', expected \"col:row\"", self.0)
    }
}

impl error::Error for ParseKeyError {}
