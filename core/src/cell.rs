use serde::{Deserialize, Serialize};

/// What a cell holds, fixed when the board is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    Mine,
    /// Safe cell with the number of mines among its neighbours.
    Clear(u8),
}

impl Default for Content {
    fn default() -> Self {
        Self::Clear(0)
    }
}

/// One grid position as seen by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    content: Content,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub const MINE_ADJACENCY: i8 = -1;

    pub(crate) const fn new(content: Content) -> Self {
        Self {
            content,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn content(self) -> Content {
        self.content
    }

    pub const fn is_mine(self) -> bool {
        matches!(self.content, Content::Mine)
    }

    /// Adjacency count, or [`Cell::MINE_ADJACENCY`] when the cell holds a mine.
    pub const fn adjacency(self) -> i8 {
        match self.content {
            Content::Mine => Self::MINE_ADJACENCY,
            // at most 8 neighbours
            Content::Clear(count) => count as i8,
        }
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_unrevealed(self) -> bool {
        !self.revealed
    }

    pub(crate) fn reveal(&mut self) {
        debug_assert!(!self.flagged, "flagged cells are never revealed");
        self.revealed = true;
    }

    pub(crate) fn toggle_flag(&mut self) {
        debug_assert!(!self.revealed, "revealed cells are never flagged");
        self.flagged = !self.flagged;
    }

    /// What the player is allowed to see of this cell.
    pub const fn view(self) -> CellView {
        if self.flagged {
            CellView::Flagged
        } else if self.revealed {
            self.content_view()
        } else {
            CellView::Covered
        }
    }

    /// Game-over overlay: like [`Cell::view`] but unflagged mines are shown.
    pub const fn exposed_view(self) -> CellView {
        match self.view() {
            CellView::Covered if self.is_mine() => CellView::Mine,
            view => view,
        }
    }

    const fn content_view(self) -> CellView {
        match self.content {
            Content::Mine => CellView::Mine,
            Content::Clear(0) => CellView::Blank,
            Content::Clear(count) => CellView::Number(count),
        }
    }
}

/// Rendering contract handed to the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Covered,
    Flagged,
    Mine,
    Blank,
    Number(u8),
}

impl CellView {
    pub const fn glyph(self) -> char {
        match self {
            Self::Covered => '#',
            Self::Flagged => 'F',
            Self::Mine => '*',
            Self::Blank => '.',
            // counts are 1..=8
            Self::Number(count) => (b'0' + count) as char,
        }
    }
}
