//! Minesweeper board engine: mine placement, adjacency counts, flood-fill
//! reveal, flags and win/loss detection.
//!
//! Every player action takes a [`Game`] snapshot by reference and hands back a
//! new one, leaving the input untouched.

#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self { size, mines };
        config.validate()?;
        Ok(config)
    }

    /// Checks the board has at least one cell and leaves at least one of them safe.
    ///
    /// Configs built through [`GameConfig::new`] are always valid, this is for
    /// ones that came in through deserialization or direct construction.
    pub fn validate(&self) -> Result<()> {
        let (size_x, size_y) = self.size;
        if size_x == 0 {
            return Err(ConfigIssue::ZeroWidth.into());
        }
        if size_y == 0 {
            return Err(ConfigIssue::ZeroHeight.into());
        }
        if self.mines >= self.total_cells() {
            return Err(ConfigIssue::TooManyMines {
                mines: self.mines,
                cells: self.total_cells(),
            }
            .into());
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Where the mines are. Produced by a [`MinefieldGenerator`] and turned into a
/// playable [`Board`].
///
/// Only the mask is serialized; deserializing runs it back through
/// [`MineLayout::from_mine_mask`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineMask")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    #[serde(skip_serializing)]
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct MineMask {
    mine_mask: Array2<bool>,
}

impl TryFrom<MineMask> for MineLayout {
    type Error = GameError;

    fn try_from(MineMask { mine_mask }: MineMask) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let size = size_of_grid(&mine_mask)?;
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .map_err(|_| ConfigIssue::TooLarge)?;

        GameConfig::new(size, mine_count)?;

        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::OutOfBounds {
                    x: coords.0,
                    y: coords.1,
                });
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.mine_mask.dim();
        // checked to fit in `Coord` on construction
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (size_x, size_y) = self.size();
        mult(size_x, size_y)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // never more than the 8 neighbours
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            // indices are bounded by `size`, which fits in `Coord`
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }
}

/// Board size of a grid, refusing grids that do not fit the coordinate type.
pub(crate) fn size_of_grid<T>(grid: &Array2<T>) -> Result<Coord2> {
    let (dim_x, dim_y) = grid.dim();
    let size_x = Coord::try_from(dim_x).map_err(|_| ConfigIssue::TooLarge)?;
    let size_y = Coord::try_from(dim_y).map_err(|_| ConfigIssue::TooLarge)?;
    Ok((size_x, size_y))
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Safe reveal that left the game going, with how many cells it opened.
    Revealed(CellCount),
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_and_full_boards() {
        assert_eq!(
            GameConfig::new((0, 3), 0),
            Err(GameError::InvalidConfiguration(ConfigIssue::ZeroWidth))
        );
        assert_eq!(
            GameConfig::new((3, 0), 0),
            Err(GameError::InvalidConfiguration(ConfigIssue::ZeroHeight))
        );
        assert_eq!(
            GameConfig::new((3, 3), 9),
            Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines {
                mines: 9,
                cells: 9
            }))
        );
        assert!(GameConfig::new((3, 3), 8).is_ok());
        assert!(GameConfig::new((1, 1), 0).is_ok());
    }

    #[test]
    fn config_loads_from_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "size": [16, 16], "mines": 40 }"#).unwrap();

        assert_eq!(config, GameConfig::new((16, 16), 40).unwrap());
        assert_eq!(config.safe_cells(), 216);
    }

    #[test]
    fn deserialized_config_still_needs_validation() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "size": [2, 2], "mines": 4 }"#).unwrap();

        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines { .. }))
        ));
    }

    #[test]
    fn layout_counts_adjacent_mines() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 0);
        assert_eq!(layout.iter_mines().collect::<alloc::vec::Vec<_>>(), [(0, 0), (2, 2)]);
    }

    #[test]
    fn layout_rejects_out_of_bounds_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((3, 3), &[(3, 0)]),
            Err(GameError::OutOfBounds { x: 3, y: 0 })
        );
    }

    #[test]
    fn layout_must_leave_a_safe_cell() {
        let result = MineLayout::from_mine_coords((1, 2), &[(0, 0), (0, 1)]);

        assert!(matches!(
            result,
            Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines { .. }))
        ));
    }

    #[test]
    fn layout_json_recounts_mines() {
        let layout = MineLayout::from_mine_coords((2, 1), &[(0, 0)]).unwrap();
        let mut json = serde_json::to_value(&layout).unwrap();
        json["mine_count"] = serde_json::json!(0);

        let restored: MineLayout = serde_json::from_value(json).unwrap();

        assert_eq!(restored.mine_count(), 1);
        assert_eq!(restored, layout);
    }

    #[test]
    fn layout_json_with_wrong_dimensions_is_rejected() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut json = serde_json::to_value(&layout).unwrap();
        json["mine_mask"]["dim"] = serde_json::json!([5, 5]);

        assert!(serde_json::from_value::<MineLayout>(json).is_err());
    }

    #[test]
    fn layout_json_full_of_mines_is_rejected() {
        use alloc::string::ToString;

        let json = serde_json::json!({
            "mine_mask": { "v": 1, "dim": [1, 2], "data": [true, true] }
        });

        let err = serde_json::from_value::<MineLayout>(json).unwrap_err();
        assert!(err.to_string().contains("no safe cell"), "{err}");
    }

    #[test]
    fn outcomes_report_updates() {
        assert!(!RevealOutcome::NoChange.has_update());
        assert!(RevealOutcome::HitMine.has_update());
        assert!(RevealOutcome::Revealed(1).has_update());
        assert!(MarkOutcome::Unflagged.has_update());
    }
}
