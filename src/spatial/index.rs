use crate::entity::EntityId;
use crate::error::ParseKeyError;
use log::warn;
use macroquad::math::{vec2, Vec2};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A cell of the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    /// Column.
    pub col: i32,
    /// Row.
    pub row: i32,
}

impl GridCoord {
    /// Cell at `(col, row)`.
    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        GridCoord { col, row }
    }

    /// String form `"col:row"`, the inverse of [`GridCoord::parse_key`].
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Parses `"col:row"`.
    pub fn parse_key(key: &str) -> Result<Self, ParseKeyError> {
        let err = || ParseKeyError(key.to_owned());
        let (col, row) = key.split_once(':').ok_or_else(err)?;
        Ok(GridCoord {
            col: col.parse().map_err(|_| err())?,
            row: row.parse().map_err(|_| err())?,
        })
    }

    /// Grid steps between two cells.
    pub fn manhattan(self, other: GridCoord) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.col, self.row)
    }
}

impl FromStr for GridCoord {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridCoord::parse_key(s)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((col, row): (i32, i32)) -> Self {
        GridCoord { col, row }
    }
}

/// Maps grid cells to the entities standing on them.
///
/// Each cell keeps its occupants in insertion order, which is also draw order.
/// The grid does not own the entities; it only stores their ids.
pub struct TileGrid {
    tile_w: u32,
    tile_h: u32,
    cells: HashMap<GridCoord, Vec<EntityId>>,
}

impl TileGrid {
    /// Empty grid; a zero tile size is treated as 1.
    pub fn new(tile_w: u32, tile_h: u32) -> Self {
        TileGrid {
            tile_w: tile_w.max(1),
            tile_h: tile_h.max(1),
            cells: HashMap::new(),
        }
    }

    /// Tile size in pixels.
    #[inline]
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_w, self.tile_h)
    }

    /// Appends `id` to the cell. Adding the same id twice stores it twice.
    pub fn add_at(&mut self, col: i32, row: i32, id: EntityId) {
        self.add(GridCoord::new(col, row), id);
    }

    /// Appends `id` to the cell at `at`.
    pub fn add(&mut self, at: GridCoord, id: EntityId) {
        self.cells.entry(at).or_default().push(id);
    }

    /// Removes the first occurrence of `id`. Returns `false` if it was not there.
    pub fn remove_from(&mut self, col: i32, row: i32, id: EntityId) -> bool {
        self.remove(GridCoord::new(col, row), id)
    }

    /// Removes the first occurrence of `id` at `at`; empty cells are dropped.
    pub fn remove(&mut self, at: GridCoord, id: EntityId) -> bool {
        let Some(seq) = self.cells.get_mut(&at) else {
            return false;
        };
        let Some(pos) = seq.iter().position(|e| *e == id) else {
            return false;
        };
        seq.remove(pos);
        if seq.is_empty() {
            self.cells.remove(&at);
        }
        true
    }

    /// Relocates `id` from one cell to another.
    ///
    /// The add always happens, even when `id` was not found in `from`; the
    /// return value reports whether the removal hit.
    pub fn move_from_to(&mut self, from: GridCoord, to: GridCoord, id: EntityId) -> bool {
        let removed = self.remove(from, id);
        if !removed {
            warn!("move of {:?}: not found at {}, adding at {} anyway", id, from, to);
        }
        self.add(to, id);
        removed
    }

    /// Occupants of a cell; empty for cells nobody stands on.
    pub fn occupants_at(&self, at: GridCoord) -> &[EntityId] {
        self.cells.get(&at).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` if `id` is registered at `at`.
    pub fn contains(&self, at: GridCoord, id: EntityId) -> bool {
        self.occupants_at(at).contains(&id)
    }

    /// Every occupied cell in row-major order.
    pub fn cells(&self) -> Vec<(GridCoord, &[EntityId])> {
        let mut out: Vec<_> = self
            .cells
            .iter()
            .map(|(c, seq)| (*c, seq.as_slice()))
            .collect();
        out.sort_unstable_by_key(|(c, _)| (c.row, c.col));
        out
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// No occupied cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Top-left pixel of a cell.
    #[inline]
    pub fn screen_pos_from_grid(&self, col: i32, row: i32) -> Vec2 {
        vec2(
            col as f32 * self.tile_w as f32,
            row as f32 * self.tile_h as f32,
        )
    }

    /// Cell containing a pixel position (floor division by tile size).
    #[inline]
    pub fn grid_from_screen(&self, p: Vec2) -> GridCoord {
        GridCoord {
            col: (p.x.floor() as i32).div_euclid(self.tile_w as i32),
            row: (p.y.floor() as i32).div_euclid(self.tile_h as i32),
        }
    }
}

/// Cells within Manhattan distance `range` of `origin`, origin row first,
/// then the rows above and below it moving outwards.
pub fn movable_tiles(origin: GridCoord, range: u32) -> Vec<GridCoord> {
    fn row_span(out: &mut Vec<GridCoord>, centre: GridCoord, reach: i32) {
        out.push(centre);
        for i in 1..=reach {
            out.push(GridCoord::new(centre.col + i, centre.row));
            out.push(GridCoord::new(centre.col - i, centre.row));
        }
    }

    let range = range as i32;
    let mut out = Vec::new();
    row_span(&mut out, origin, range);
    for i in 1..=range {
        row_span(&mut out, GridCoord::new(origin.col, origin.row + i), range - i);
        row_span(&mut out, GridCoord::new(origin.col, origin.row - i), range - i);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_round_trips_over_range() {
        for col in (-1000..1000).step_by(7) {
            for row in -1000..1000 {
                let c = GridCoord::new(col, row);
                assert_eq!(GridCoord::parse_key(&c.key()), Ok(c));
            }
        }
        let extreme = GridCoord::new(i32::MIN, i32::MAX);
        assert_eq!(extreme.key().parse::<GridCoord>(), Ok(extreme));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for bad in ["", "1", "1:", ":2", "a:b", "1:2:3", "1;2"] {
            assert!(GridCoord::parse_key(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn add_then_remove_leaves_cell_empty() {
        let mut g = TileGrid::new(16, 16);
        let e = EntityId::next();
        g.add_at(1, 1, e);
        assert!(g.remove_from(1, 1, e));
        assert!(g.occupants_at(GridCoord::new(1, 1)).is_empty());
        assert!(!g.remove_from(1, 1, e));
        assert!(g.is_empty());
    }

    #[test]
    fn occupants_keep_insertion_order_and_duplicates() {
        let mut g = TileGrid::new(16, 16);
        let (a, b) = (EntityId::next(), EntityId::next());
        g.add_at(0, 0, a);
        g.add_at(0, 0, b);
        g.add_at(0, 0, a);
        assert_eq!(g.occupants_at(GridCoord::new(0, 0)), &[a, b, a]);

        g.remove_from(0, 0, a);
        assert_eq!(g.occupants_at(GridCoord::new(0, 0)), &[b, a]);
    }

    #[test]
    fn move_adds_even_when_source_missed() {
        let mut g = TileGrid::new(16, 16);
        let e = EntityId::next();
        let (from, to) = (GridCoord::new(0, 0), GridCoord::new(3, 4));

        assert!(!g.move_from_to(from, to, e));
        assert!(g.contains(to, e));

        assert!(g.move_from_to(to, from, e));
        assert!(g.contains(from, e));
        assert!(!g.contains(to, e));
    }

    #[test]
    fn screen_and_grid_are_inverse_on_grid_points() {
        let g = TileGrid::new(16, 16);
        for c in 0..64 {
            for r in 0..64 {
                let p = g.screen_pos_from_grid(c, r);
                assert_eq!(g.grid_from_screen(p), GridCoord::new(c, r));
            }
        }
    }

    #[test]
    fn screen_pos_does_not_overflow_for_far_cells() {
        let g = TileGrid::new(16, 16);
        assert_eq!(g.screen_pos_from_grid(200_000_000, 0), vec2(3.2e9, 0.0));
        assert_eq!(g.screen_pos_from_grid(-3, 2), vec2(-48.0, 32.0));
    }

    #[test]
    fn grid_from_screen_floors_negative_positions() {
        let g = TileGrid::new(16, 8);
        assert_eq!(g.grid_from_screen(vec2(15.9, 7.9)), GridCoord::new(0, 0));
        assert_eq!(g.grid_from_screen(vec2(-0.5, -1.0)), GridCoord::new(-1, -1));
        assert_eq!(g.grid_from_screen(vec2(-16.0, 8.0)), GridCoord::new(-1, 1));
    }

    #[test]
    fn cells_are_row_major() {
        let mut g = TileGrid::new(16, 16);
        let e = EntityId::next();
        g.add_at(5, 1, e);
        g.add_at(0, 2, e);
        g.add_at(2, 1, e);
        let coords: Vec<_> = g.cells().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            coords,
            vec![GridCoord::new(2, 1), GridCoord::new(5, 1), GridCoord::new(0, 2)]
        );
    }

    #[test]
    fn movable_tiles_is_a_diamond() {
        let origin = GridCoord::new(5, 5);
        let tiles = movable_tiles(origin, 2);
        assert_eq!(tiles.len(), 13);
        assert_eq!(tiles[0], origin);

        let unique: HashSet<_> = tiles.iter().copied().collect();
        assert_eq!(unique.len(), tiles.len());
        assert!(tiles.iter().all(|t| t.manhattan(origin) <= 2));
        assert_eq!(movable_tiles(origin, 0), vec![origin]);
    }
}
