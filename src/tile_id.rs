//! Packed tile references as stored in Tiled layer data.
//!
//! The top three bits of every entry carry flip flags; the rest is a 1-based
//! sprite index into the atlas, with 0 meaning "no tile".

use macroquad::math::{vec2, Affine2};
use std::f32::consts::FRAC_PI_2;

/// Horizontal flip flag.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Diagonal flip flag (rotate 90 degrees).
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// All three flags.
pub const FLIP_ALL: u32 = FLIP_H | FLIP_V | FLIP_D;
/// Bits left for the sprite index.
pub const INDEX_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits

const OPS_SHIFT: u32 = 28;

/// One raw entry of a layer's `data` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileRef(pub u32);

impl TileRef {
    /// Sprite index with the flag bits stripped.
    #[inline]
    pub fn index(self) -> u32 {
        self.0 & INDEX_MASK
    }
    /// `true` for index 0, whatever the flags.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.index() == 0
    }
    /// Bit 31.
    #[inline]
    pub fn flip_h(self) -> bool {
        (self.0 & FLIP_H) != 0
    }
    /// Bit 30.
    #[inline]
    pub fn flip_v(self) -> bool {
        (self.0 & FLIP_V) != 0
    }
    /// Bit 29.
    #[inline]
    pub fn flip_d(self) -> bool {
        (self.0 & FLIP_D) != 0
    }
    /// The raw flag nibble, `(raw & FLIP_ALL) >> 28`.
    #[inline]
    pub fn ops(self) -> u32 {
        (self.0 & FLIP_ALL) >> OPS_SHIFT
    }

    /// The flag bits as an [`Orientation`].
    pub fn orientation(self) -> Orientation {
        Orientation {
            flip_h: self.flip_h(),
            flip_v: self.flip_v(),
            flip_d: self.flip_d(),
        }
    }

    /// Index and orientation in one call.
    pub fn decode(self) -> (u32, Orientation) {
        (self.index(), self.orientation())
    }
}

impl From<u32> for TileRef {
    fn from(raw: u32) -> Self {
        TileRef(raw)
    }
}

/// Splits a raw layer entry into its sprite index and orientation.
#[inline]
pub fn decode(raw: u32) -> (u32, Orientation) {
    TileRef(raw).decode()
}

/// The flip flags of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Orientation {
    /// Mirror along x.
    pub flip_h: bool,
    /// Mirror along y.
    pub flip_v: bool,
    /// Swap axes.
    pub flip_d: bool,
}

impl Orientation {
    /// No flag set.
    pub fn is_identity(self) -> bool {
        !(self.flip_h || self.flip_v || self.flip_d)
    }

    /// Local transform that maps a `tile_w x tile_h` quad at the origin onto
    /// its flipped/rotated placement inside the same cell.
    ///
    /// Steps are post-applied in a fixed order: diagonal, horizontal, vertical.
    /// Reordering them changes the result.
    pub fn transform(self, tile_w: f32, tile_h: f32) -> Affine2 {
        let mut m = Affine2::IDENTITY;

        if self.flip_d {
            m = Affine2::from_angle(FRAC_PI_2) * m;
            m = Affine2::from_translation(vec2(tile_w, 0.0)) * m;
        }

        if self.flip_h {
            m = Affine2::from_scale(vec2(-1.0, 1.0)) * m;
            m = Affine2::from_translation(vec2(tile_w, 0.0)) * m;
        }

        if self.flip_v {
            m = Affine2::from_scale(vec2(1.0, -1.0)) * m;
            m = Affine2::from_translation(vec2(0.0, tile_h)) * m;
        }

        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::Vec2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn decode_masks_index_and_reads_each_flag() {
        let samples = [
            0u32,
            1,
            42,
            INDEX_MASK,
            FLIP_H | 7,
            FLIP_V | 7,
            FLIP_D | 7,
            FLIP_ALL,
            u32::MAX,
            0x9000_0001,
        ];
        for raw in samples.into_iter().chain((0..2000u32).map(|i| i.wrapping_mul(2_654_435_761))) {
            let (index, o) = decode(raw);
            assert_eq!(index, raw & 0x1FFF_FFFF);
            assert_eq!(o.flip_h, raw & 0x8000_0000 != 0);
            assert_eq!(o.flip_v, raw & 0x4000_0000 != 0);
            assert_eq!(o.flip_d, raw & 0x2000_0000 != 0);
        }
    }

    #[test]
    fn zero_index_is_empty_even_with_flags() {
        assert!(TileRef(0).is_empty());
        assert!(TileRef(FLIP_ALL).is_empty());
        assert!(!TileRef(FLIP_H | 1).is_empty());
    }

    #[test]
    fn ops_returns_flag_nibble() {
        assert_eq!(TileRef(FLIP_H | 3).ops(), 0b1000);
        assert_eq!(TileRef(FLIP_V).ops(), 0b0100);
        assert_eq!(TileRef(FLIP_D).ops(), 0b0010);
        assert_eq!(TileRef(5).ops(), 0);
    }

    #[test]
    fn identity_when_no_flags() {
        assert!(TileRef(3).orientation().is_identity());
        assert!(!TileRef(FLIP_D | 3).orientation().is_identity());
        let m = TileRef(3).orientation().transform(16.0, 16.0);
        assert!(close(m.transform_point2(vec2(5.0, 9.0)), vec2(5.0, 9.0)));
    }

    #[test]
    fn horizontal_flip_mirrors_inside_cell() {
        let m = TileRef(FLIP_H | 1).orientation().transform(16.0, 8.0);
        assert!(close(m.transform_point2(vec2(0.0, 0.0)), vec2(16.0, 0.0)));
        assert!(close(m.transform_point2(vec2(16.0, 8.0)), vec2(0.0, 8.0)));
    }

    #[test]
    fn vertical_flip_mirrors_inside_cell() {
        let m = TileRef(FLIP_V | 1).orientation().transform(16.0, 8.0);
        assert!(close(m.transform_point2(vec2(0.0, 0.0)), vec2(0.0, 8.0)));
        assert!(close(m.transform_point2(vec2(16.0, 8.0)), vec2(16.0, 0.0)));
    }

    #[test]
    fn diagonal_flip_rotates_then_shifts() {
        let m = TileRef(FLIP_D | 1).orientation().transform(16.0, 16.0);
        assert!(close(m.transform_point2(vec2(0.0, 0.0)), vec2(16.0, 0.0)));
        assert!(close(m.transform_point2(vec2(1.0, 0.0)), vec2(16.0, 1.0)));
        assert!(close(m.transform_point2(vec2(0.0, 1.0)), vec2(15.0, 0.0)));
    }

    #[test]
    fn diagonal_then_horizontal_is_order_sensitive() {
        let o = TileRef(FLIP_D | FLIP_H | 1).orientation();
        let m = o.transform(16.0, 16.0);
        // rotate: (1,0)->(0,1); +w: (16,1); mirror x: (-16,1); +w: (0,1)
        assert!(close(m.transform_point2(vec2(1.0, 0.0)), vec2(0.0, 1.0)));
        // horizontal before diagonal would land elsewhere
        let swapped = Affine2::from_translation(vec2(16.0, 0.0))
            * Affine2::from_angle(FRAC_PI_2)
            * Affine2::from_translation(vec2(16.0, 0.0))
            * Affine2::from_scale(vec2(-1.0, 1.0));
        assert!(!close(swapped.transform_point2(vec2(1.0, 0.0)), vec2(0.0, 1.0)));
    }
}
