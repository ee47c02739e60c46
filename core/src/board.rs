use alloc::vec;
use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The grid of cells for one game, indexed by `(x, y)`.
///
/// Only the cells are serialized, the counters are rebuilt and checked
/// against them when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardCells")]
pub struct Board {
    cells: Array2<Cell>,
    #[serde(skip_serializing)]
    mine_count: CellCount,
    #[serde(skip_serializing)]
    revealed_count: CellCount,
    #[serde(skip_serializing)]
    flagged_count: CellCount,
}

#[derive(Deserialize)]
struct BoardCells {
    cells: Array2<Cell>,
}

impl TryFrom<BoardCells> for Board {
    type Error = GameError;

    fn try_from(BoardCells { cells }: BoardCells) -> Result<Self> {
        Self::from_cells(cells)
    }
}

impl Board {
    /// Builds the grid for `layout`, computing every safe cell's adjacency count.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let mut cells: Array2<Cell> = Array2::default(layout.size().to_nd_index());

        for ((x, y), cell) in cells.indexed_iter_mut() {
            // indices are bounded by the layout size
            let coords = (x as Coord, y as Coord);
            let content = if layout.contains_mine(coords) {
                Content::Mine
            } else {
                Content::Clear(layout.adjacent_mine_count(coords))
            };
            *cell = Cell::new(content);
        }

        Self {
            cells,
            mine_count: layout.mine_count(),
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    /// Rebuilds a board from previously played cells.
    ///
    /// Refuses grids whose adjacency counts disagree with their mines, that
    /// leave no safe cell, or that have a cell both revealed and flagged.
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let size = size_of_grid(&cells)?;

        let (mut mine_count, mut revealed_count, mut flagged_count) = (0, 0, 0);
        for cell in cells.iter() {
            if cell.is_revealed() && cell.is_flagged() {
                return Err(ConfigIssue::InconsistentState.into());
            }
            // at most 255 * 255 cells, so no count overflows
            mine_count += CellCount::from(cell.is_mine());
            revealed_count += CellCount::from(cell.is_revealed());
            flagged_count += CellCount::from(cell.is_flagged());
        }
        GameConfig::new(size, mine_count)?;

        let board = Self {
            cells,
            mine_count,
            revealed_count,
            flagged_count,
        };
        let adjacency_holds = board.iter().all(|(coords, cell)| match cell.content() {
            Content::Mine => true,
            Content::Clear(count) => count == board.neighbor_mine_count(coords),
        });
        if !adjacency_holds {
            return Err(ConfigIssue::InconsistentState.into());
        }

        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.cells.dim();
        // checked to fit in `Coord` on construction
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (size_x, size_y) = self.size();
        mult(size_x, size_y)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    /// Number of revealed cells, a triggered mine included.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn count_flags(&self) -> CellCount {
        self.flagged_count
    }

    pub fn all_safe_revealed(&self) -> bool {
        self.revealed_count == self.safe_cell_count()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                x: coords.0,
                y: coords.1,
            })
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        in_bounds(coords, self.size()).then(|| self[coords])
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        let (size_x, size_y) = self.size();
        (0..size_y)
            .flat_map(move |y| (0..size_x).map(move |x| (x, y)))
            .map(move |coords| (coords, self[coords]))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    fn neighbor_mine_count(&self, coords: Coord2) -> u8 {
        // never more than the 8 neighbours
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    /// Game-over rendering that also shows unflagged mines.
    pub fn exposed(&self) -> Exposed<'_> {
        Exposed(self)
    }

    pub(crate) fn reveal_mine(&mut self, coords: Coord2) {
        debug_assert!(self[coords].is_mine());
        self.cells[coords.to_nd_index()].reveal();
        self.revealed_count += 1;
    }

    /// Reveals `start` and, through zero cells, the whole region around it.
    ///
    /// Flagged cells and mines are never opened. Returns how many cells were
    /// newly revealed.
    pub(crate) fn flood_reveal(&mut self, start: Coord2) -> CellCount {
        let mut newly_revealed = 0;
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            let cell = self[coords];
            if cell.is_revealed() || cell.is_flagged() || cell.is_mine() {
                continue;
            }

            self.cells[coords.to_nd_index()].reveal();
            newly_revealed += 1;

            if cell.content() == Content::Clear(0) {
                to_visit.extend(self.iter_neighbors(coords).filter(|&pos| {
                    let neighbor = self[pos];
                    neighbor.is_unrevealed() && !neighbor.is_flagged()
                }));
            }
        }

        log::trace!("Revealed {} cells from {:?}", newly_revealed, start);
        self.revealed_count += newly_revealed;
        newly_revealed
    }

    /// Flips the flag on an unrevealed cell, revealed ones are left alone.
    pub(crate) fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_revealed() {
            return MarkOutcome::NoChange;
        }

        cell.toggle_flag();
        if cell.is_flagged() {
            self.flagged_count += 1;
            MarkOutcome::Flagged
        } else {
            self.flagged_count -= 1;
            MarkOutcome::Unflagged
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, view: fn(Cell) -> CellView) -> fmt::Result {
        let (size_x, size_y) = self.size();
        for y in 0..size_y {
            for x in 0..size_x {
                fmt::Write::write_char(f, view(self[(x, y)]).glyph())?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// One row per line, `#` covered, `F` flag, `*` mine, `.` blank, digits for counts.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, Cell::view)
    }
}

/// See [`Board::exposed`].
#[derive(Copy, Clone, Debug)]
pub struct Exposed<'a>(&'a Board);

impl fmt::Display for Exposed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, Cell::exposed_view)
    }
}
