//! Hex board geometry with cube coordinates
//!
//! The board is an arena of [`Cell`]s stored row by row. Every cell also
//! belongs to three straight lines (one per cube axis); the lines are kept
//! as index lists so the flip engine can walk them without owning pointers.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::game::Player;

/// Smallest board that still has room for the opening pattern
pub const MIN_SIDE_LENGTH: usize = 2;

/// Largest supported board (a little over three million cells)
pub const MAX_SIDE_LENGTH: usize = 1024;

/// Opening discs around the blank centre cell, as (q, r) pairs
const DARK_OPENING: [(i32, i32); 3] = [(0, -1), (1, 0), (-1, 1)];
const LIGHT_OPENING: [(i32, i32); 3] = [(1, -1), (0, 1), (-1, 0)];

// ============================================================================
// COORDINATES
// ============================================================================

/// Cube coordinate; `s` is always `-q - r`, computed in `i64` so that any
/// pair of `i32` components has a valid third axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub q: i32,
    pub r: i32,
}

impl Coordinate {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub const fn s(&self) -> i64 {
        -(self.q as i64) - self.r as i64
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Coordinate) -> i64 {
        let dq = (self.q as i64 - other.q as i64).abs();
        let dr = (self.r as i64 - other.r as i64).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    pub fn is_adjacent(&self, other: Coordinate) -> bool {
        self.distance_to(other) == 1
    }

    /// Value of this coordinate on the given axis
    fn component(&self, axis: Axis) -> i64 {
        match axis {
            Axis::Q => self.q as i64,
            Axis::R => self.r as i64,
            Axis::S => self.s(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s())
    }
}

/// The three cube axes; a line holds every cell sharing one axis value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Q,
    R,
    S,
}

pub const AXES: [Axis; 3] = [Axis::Q, Axis::R, Axis::S];

// ============================================================================
// CELLS
// ============================================================================

/// Occupancy of a board position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellStatus {
    #[default]
    Blank,
    Dark,
    Light,
}

impl CellStatus {
    pub fn is_blank(self) -> bool {
        self == CellStatus::Blank
    }

    /// Owner of the disc, if any
    pub fn player(self) -> Option<Player> {
        match self {
            CellStatus::Blank => None,
            CellStatus::Dark => Some(Player::Dark),
            CellStatus::Light => Some(Player::Light),
        }
    }

    /// Glyph used by the text view
    pub fn glyph(self) -> char {
        match self {
            CellStatus::Blank => '_',
            CellStatus::Dark => 'X',
            CellStatus::Light => 'O',
        }
    }
}

impl From<Player> for CellStatus {
    fn from(player: Player) -> Self {
        match player {
            Player::Dark => CellStatus::Dark,
            Player::Light => CellStatus::Light,
        }
    }
}

/// Stable handle of a cell inside its board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

/// Where a cell sits on one of its colinear lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSlot {
    pub line: usize,
    pub slot: usize,
}

/// A board position
#[derive(Clone, Debug)]
pub struct Cell {
    coordinate: Coordinate,
    status: CellStatus,
    /// q-line, r-line, s-line
    lines: [LineSlot; 3],
}

impl Cell {
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    /// The three colinear groups this cell belongs to
    pub fn lines(&self) -> &[LineSlot; 3] {
        &self.lines
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Regular hexagon of cells, built once from its side length
#[derive(Clone, Debug)]
pub struct Board {
    side_length: usize,
    /// Row-major cell storage
    cells: Vec<Cell>,
    /// Start offset of each row in `cells` (plus a trailing end marker)
    row_starts: Vec<usize>,
    /// Colinear groups, each ordered along its line
    lines: Vec<Vec<CellId>>,
    index: FxHashMap<Coordinate, CellId>,
}

impl Board {
    /// Build a blank board with `2 * side_length - 1` rows
    pub fn new(side_length: usize) -> Result<Self> {
        if !(MIN_SIDE_LENGTH..=MAX_SIDE_LENGTH).contains(&side_length) {
            return Err(GameError::InvalidSideLength(side_length));
        }

        let (cells, row_starts) = build_rows(side_length);
        let mut board = Self {
            side_length,
            cells,
            row_starts,
            lines: Vec::new(),
            index: FxHashMap::default(),
        };
        board.link_lines();
        Ok(board)
    }

    /// Fill in every cell's colinear groups (all cells must exist first)
    fn link_lines(&mut self) {
        let mut line_ids: FxHashMap<(Axis, i64), usize> = FxHashMap::default();

        for id in 0..self.cells.len() {
            let coordinate = self.cells[id].coordinate;
            self.index.insert(coordinate, CellId(id));

            for (axis_idx, &axis) in AXES.iter().enumerate() {
                let key = (axis, coordinate.component(axis));
                let line = *line_ids.entry(key).or_insert_with(|| {
                    self.lines.push(Vec::new());
                    self.lines.len() - 1
                });
                let slot = self.lines[line].len();
                self.lines[line].push(CellId(id));
                self.cells[id].lines[axis_idx] = LineSlot { line, slot };
            }
        }
    }

    /// Place the three-and-three opening pattern around the centre
    pub(crate) fn seed_opening(&mut self) -> Result<()> {
        for &(q, r) in &DARK_OPENING {
            let id = self.find(Coordinate::new(q, r))?;
            self.set_status(id, CellStatus::Dark);
        }
        for &(q, r) in &LIGHT_OPENING {
            let id = self.find(Coordinate::new(q, r))?;
            self.set_status(id, CellStatus::Light);
        }
        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn side_length(&self) -> usize {
        self.side_length
    }

    pub fn row_count(&self) -> usize {
        self.row_starts.len() - 1
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells of one row, left to right
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        let start = *self.row_starts.get(index)?;
        let end = *self.row_starts.get(index + 1)?;
        Some(&self.cells[start..end])
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.row_starts
            .windows(2)
            .map(move |w| &self.cells[w[0]..w[1]])
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    /// Cells of a colinear group, in line order
    pub fn line(&self, line: usize) -> &[CellId] {
        &self.lines[line]
    }

    /// Handle of the cell at `coordinate`
    pub fn find(&self, coordinate: Coordinate) -> Result<CellId> {
        self.index
            .get(&coordinate)
            .copied()
            .ok_or(GameError::NoSuchCoordinate(coordinate))
    }

    pub fn cell_at(&self, coordinate: Coordinate) -> Result<&Cell> {
        self.find(coordinate).map(|id| self.cell(id))
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.index.contains_key(&coordinate)
    }

    /// The six corners, derived from the side length alone
    pub fn corners(&self) -> [Coordinate; 6] {
        corners(self.side_length)
    }

    /// Number of cells with the given status
    pub fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|c| c.status.is_blank())
    }

    pub(crate) fn set_status(&mut self, id: CellId, status: CellStatus) {
        self.cells[id.0].status = status;
    }
}

/// Corner coordinates of a board with the given side length
pub fn corners(side_length: usize) -> [Coordinate; 6] {
    let k = i32::try_from(side_length.saturating_sub(1)).unwrap_or(i32::MAX);
    [
        Coordinate::new(0, -k),
        Coordinate::new(k, -k),
        Coordinate::new(-k, 0),
        Coordinate::new(k, 0),
        Coordinate::new(-k, k),
        Coordinate::new(0, k),
    ]
}

/// Total number of cells on a board of the given side length
pub fn cell_count(side_length: usize) -> usize {
    // 3n(n - 1) + 1, saturating for sizes no board can have
    side_length
        .saturating_mul(side_length.saturating_sub(1))
        .saturating_mul(3)
        .saturating_add(1)
}

/// Lay out rows: widths grow from `n` while the row offset is negative, then shrink.
/// Only called with a side length already checked against `MAX_SIDE_LENGTH`.
fn build_rows(side_length: usize) -> (Vec<Cell>, Vec<usize>) {
    let n = side_length as i32;
    let row_count = 2 * side_length - 1;
    let mut cells = Vec::with_capacity(cell_count(side_length));
    let mut row_starts = Vec::with_capacity(row_count + 1);

    let mut r = 1 - n;
    let mut q_start = 0;
    let mut width = n;

    for _ in 0..row_count {
        row_starts.push(cells.len());
        for offset in 0..width {
            cells.push(Cell {
                coordinate: Coordinate::new(q_start + offset, r),
                status: CellStatus::Blank,
                lines: [LineSlot { line: 0, slot: 0 }; 3],
            });
        }
        if r < 0 {
            q_start -= 1;
            width += 1;
        } else {
            width -= 1;
        }
        r += 1;
    }
    row_starts.push(cells.len());

    (cells, row_starts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_dimensions() {
        for n in 2..=8 {
            let board = Board::new(n).unwrap();
            assert_eq!(board.row_count(), 2 * n - 1);
            assert_eq!(board.len(), cell_count(n));
            assert_eq!(board.len(), 3 * n * n - 3 * n + 1);

            let widths: Vec<usize> = board.rows().map(|row| row.len()).collect();
            for (i, &w) in widths.iter().enumerate() {
                let from_edge = i.min(2 * n - 2 - i);
                assert_eq!(w, n + from_edge);
            }
        }
    }

    #[test]
    fn test_side_length_too_small() {
        assert_eq!(Board::new(1).unwrap_err(), GameError::InvalidSideLength(1));
        assert_eq!(Board::new(0).unwrap_err(), GameError::InvalidSideLength(0));
    }

    #[test]
    fn test_side_length_too_large() {
        assert_eq!(
            Board::new(MAX_SIDE_LENGTH + 1).unwrap_err(),
            GameError::InvalidSideLength(MAX_SIDE_LENGTH + 1)
        );
        assert_eq!(
            Board::new(usize::MAX).unwrap_err(),
            GameError::InvalidSideLength(usize::MAX)
        );
        // Free helpers clamp instead of wrapping
        assert_eq!(cell_count(usize::MAX), usize::MAX);
        assert_eq!(corners(usize::MAX)[1], Coordinate::new(i32::MAX, -i32::MAX));
    }

    #[test]
    fn test_cells_within_hexagon() {
        let board = Board::new(4).unwrap();
        for cell in board.cells() {
            let c = cell.coordinate();
            assert_eq!(c.q as i64 + c.r as i64 + c.s(), 0);
            assert!(c.distance_to(Coordinate::new(0, 0)) <= 3);
        }
    }

    #[test]
    fn test_first_row_coordinates() {
        let board = Board::new(4).unwrap();
        let row: Vec<Coordinate> = board.row(0).unwrap().iter().map(|c| c.coordinate()).collect();
        assert_eq!(
            row,
            vec![
                Coordinate::new(0, -3),
                Coordinate::new(1, -3),
                Coordinate::new(2, -3),
                Coordinate::new(3, -3),
            ]
        );
        assert!(board.row(7).is_none());
    }

    #[test]
    fn test_lines_are_straight_and_ordered() {
        let board = Board::new(5).unwrap();
        for cell in board.cells() {
            for (axis_idx, slot) in cell.lines().iter().enumerate() {
                let line = board.line(slot.line);
                assert_eq!(board.cell(line[slot.slot]).coordinate(), cell.coordinate());

                let axis = AXES[axis_idx];
                let value = cell.coordinate().component(axis);
                for pair in line.windows(2) {
                    let a = board.cell(pair[0]).coordinate();
                    let b = board.cell(pair[1]).coordinate();
                    assert_eq!(a.component(axis), value);
                    assert_eq!(b.component(axis), value);
                    assert!(a.is_adjacent(b));
                }
            }
        }
    }

    #[test]
    fn test_line_count() {
        // 2n - 1 lines per axis
        let board = Board::new(4).unwrap();
        assert_eq!(board.lines.len(), 3 * 7);
    }

    #[test]
    fn test_corners_on_board() {
        for n in 2..=6 {
            let board = Board::new(n).unwrap();
            for corner in board.corners() {
                assert!(board.contains(corner), "corner {} missing for n={}", corner, n);
                assert_eq!(corner.distance_to(Coordinate::new(0, 0)), n as i64 - 1);
            }
        }
    }

    #[test]
    fn test_lookup_missing_coordinate() {
        let board = Board::new(3).unwrap();
        let missing = Coordinate::new(5, 0);
        assert_eq!(board.find(missing), Err(GameError::NoSuchCoordinate(missing)));
    }

    #[test]
    fn test_seed_opening() {
        let mut board = Board::new(2).unwrap();
        board.seed_opening().unwrap();
        assert_eq!(board.count(CellStatus::Dark), 3);
        assert_eq!(board.count(CellStatus::Light), 3);
        assert_eq!(board.cell_at(Coordinate::new(0, 0)).unwrap().status(), CellStatus::Blank);
        assert!(!board.is_full());
    }

    #[test]
    fn test_distance() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.distance_to(Coordinate::new(1, 0)), 1);
        assert_eq!(origin.distance_to(Coordinate::new(2, -1)), 2);
        assert!(Coordinate::new(3, -3).is_adjacent(Coordinate::new(2, -2)));
        assert!(!Coordinate::new(3, -3).is_adjacent(Coordinate::new(1, -1)));
    }

    #[test]
    fn test_extreme_coordinates() {
        let low = Coordinate::new(i32::MIN, 0);
        assert_eq!(low.s(), 2_147_483_648);
        assert_eq!(low.to_string(), "(-2147483648, 0, 2147483648)");

        let high = Coordinate::new(i32::MAX, i32::MAX);
        assert_eq!(high.s(), -2 * i32::MAX as i64);
        assert_eq!(low.distance_to(high), 3 * i32::MAX as i64 + 1);
        assert!(!low.is_adjacent(Coordinate::new(0, 0)));

        let board = Board::new(3).unwrap();
        assert_eq!(board.find(low), Err(GameError::NoSuchCoordinate(low)));
    }
}
