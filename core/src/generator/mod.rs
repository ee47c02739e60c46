use crate::*;
pub use random::*;

mod random;

/// Source of mine placements for a new game.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// A fixed layout generates itself, as long as it matches the requested board.
impl MinefieldGenerator for MineLayout {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        if self.game_config() == config {
            Ok(self)
        } else {
            Err(ConfigIssue::LayoutMismatch.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_layout_must_match_config() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(1, 1)]).unwrap();

        assert_eq!(
            layout.clone().generate(GameConfig::new((3, 3), 1).unwrap()),
            Ok(layout.clone())
        );
        assert_eq!(
            layout.generate(GameConfig::new((3, 3), 2).unwrap()),
            Err(GameError::InvalidConfiguration(ConfigIssue::LayoutMismatch))
        );
    }
}
