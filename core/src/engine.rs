use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Ongoing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::Ongoing)
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }

    pub const fn is_lost(self) -> bool {
        matches!(self, Self::Lost)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A board together with its game state.
///
/// Actions never modify `self`: they return the next snapshot alongside an
/// outcome telling the caller whether anything changed. Starting over means
/// building a new `Game`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameSnapshot")]
pub struct Game {
    board: Board,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

#[derive(Deserialize)]
struct GameSnapshot {
    board: Board,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

/// A saved game must have the state its board implies: lost with exactly the
/// one revealed mine recorded as triggered, otherwise won once every safe cell
/// is open, otherwise ongoing.
impl TryFrom<GameSnapshot> for Game {
    type Error = GameError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self> {
        let GameSnapshot {
            board,
            state,
            triggered_mine,
        } = snapshot;

        let mut revealed_mines = board
            .iter()
            .filter(|(_, cell)| cell.is_mine() && cell.is_revealed())
            .map(|(coords, _)| coords);
        let expected = match (revealed_mines.next(), revealed_mines.next()) {
            (Some(_), Some(_)) => return Err(ConfigIssue::InconsistentState.into()),
            (Some(mine), None) => (GameState::Lost, Some(mine)),
            (None, _) if board.all_safe_revealed() => (GameState::Won, None),
            (None, _) => (GameState::Ongoing, None),
        };
        drop(revealed_mines);

        if (state, triggered_mine) != expected {
            return Err(ConfigIssue::InconsistentState.into());
        }

        Ok(Self {
            board,
            state,
            triggered_mine,
        })
    }
}

impl Game {
    /// New game with mines placed at random from `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::generate(config, RandomMinefieldGenerator::new(seed))
    }

    pub fn generate(config: GameConfig, generator: impl MinefieldGenerator) -> Result<Self> {
        config.validate()?;
        let layout = generator.generate(config)?;
        Self::from_layout(layout)
    }

    pub fn from_layout(layout: MineLayout) -> Result<Self> {
        layout.game_config().validate()?;
        log::debug!(
            "New game, size {:?}, {} mines",
            layout.size(),
            layout.mine_count()
        );
        Ok(Self {
            board: Board::from_layout(&layout),
            state: GameState::Ongoing,
            triggered_mine: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            size: self.board.size(),
            mines: self.board.mine_count(),
        }
    }

    pub fn count_flags(&self) -> CellCount {
        self.board.count_flags()
    }

    /// Mines minus flags, negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.board.count_flags() as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.board[coords])
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn reveal(&self, coords: Coord2) -> Result<(Self, RevealOutcome)> {
        let coords = self.board.validate_coords(coords)?;
        let mut next = self.clone();
        let outcome = next.apply_reveal(coords);
        Ok((next, outcome))
    }

    pub fn toggle_flag(&self, coords: Coord2) -> Result<(Self, MarkOutcome)> {
        let coords = self.board.validate_coords(coords)?;
        let mut next = self.clone();
        let outcome = next.apply_toggle_flag(coords);
        Ok((next, outcome))
    }

    fn apply_reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.board[coords];
        if !self.state.is_ongoing() || cell.is_revealed() || cell.is_flagged() {
            return RevealOutcome::NoChange;
        }

        if cell.is_mine() {
            self.board.reveal_mine(coords);
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }

        let opened = self.board.flood_reveal(coords);
        if self.board.all_safe_revealed() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed(opened)
        }
    }

    fn apply_toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.state.is_ongoing() {
            self.board.toggle_flag(coords)
        } else {
            MarkOutcome::NoChange
        }
    }

    fn end_game(&mut self, won: bool) {
        self.state = if won { GameState::Won } else { GameState::Lost };
        log::debug!("Game over: {:?}", self.state);
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finished() {
            fmt::Display::fmt(&self.board.exposed(), f)
        } else {
            fmt::Display::fmt(&self.board, f)
        }
    }
}
