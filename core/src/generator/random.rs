use alloc::vec::Vec;

use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;

/// Boards at or above this mine density (as `numerator / denominator`) are
/// filled by shuffling instead of rejection sampling.
const DENSE_RATIO: (u32, u32) = (4, 5);

/// Uniformly random placement, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mine_mask = place_mines(config, &mut rng);
        MineLayout::from_mine_mask(mine_mask)
    }
}

/// Places `config.mines` mines uniformly at random on an empty mask.
///
/// `config` must already be validated, in particular it must leave a safe cell.
pub fn place_mines<R: Rng>(config: GameConfig, rng: &mut R) -> Array2<bool> {
    let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
    let total_cells = usize::from(config.total_cells());
    let mine_count = usize::from(config.mines);

    if is_dense(config) {
        log::debug!(
            "Placing {} mines on {} cells by partial shuffle",
            mine_count,
            total_cells
        );
        let mut cells: Vec<usize> = (0..total_cells).collect();
        for i in 0..mine_count {
            let pick = rng.random_range(i..total_cells);
            cells.swap(i, pick);
            mines[unflatten(cells[i], config.size).to_nd_index()] = true;
        }
    } else {
        log::debug!(
            "Placing {} mines on {} cells by rejection sampling",
            mine_count,
            total_cells
        );
        let mut mines_placed = 0;
        while mines_placed < mine_count {
            let pick = unflatten(rng.random_range(0..total_cells), config.size);
            let tile = &mut mines[pick.to_nd_index()];
            if !*tile {
                *tile = true;
                mines_placed += 1;
            }
        }
    }

    mines
}

fn is_dense(config: GameConfig) -> bool {
    let (numerator, denominator) = DENSE_RATIO;
    u32::from(config.mines) * denominator >= u32::from(config.total_cells()) * numerator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(size: Coord2, mines: CellCount, seed: u64) -> MineLayout {
        let config = GameConfig::new(size, mines).unwrap();
        RandomMinefieldGenerator::new(seed).generate(config).unwrap()
    }

    #[test]
    fn places_exact_mine_count() {
        for seed in 0..32 {
            let layout = generate((9, 9), 10, seed);
            assert_eq!(layout.mine_count(), 10);
            assert_eq!(layout.iter_mines().count(), 10);
        }
    }

    #[test]
    fn dense_boards_terminate_with_exact_count() {
        for seed in 0..32 {
            assert_eq!(generate((5, 5), 24, seed).mine_count(), 24);
            assert_eq!(generate((5, 5), 20, seed).mine_count(), 20);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(generate((16, 16), 40, 7), generate((16, 16), 40, 7));
    }

    #[test]
    fn different_seeds_differ() {
        let first = generate((16, 16), 40, 100);

        assert!((0..8).any(|seed| generate((16, 16), 40, seed) != first));
    }

    #[test]
    fn zero_mines_is_valid() {
        let layout = generate((4, 3), 0, 1);

        assert_eq!(layout.mine_count(), 0);
        assert_eq!(layout.size(), (4, 3));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig {
            size: (3, 3),
            mines: 9,
        };

        assert!(matches!(
            RandomMinefieldGenerator::new(0).generate(config),
            Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines { .. }))
        ));
    }

    #[test]
    fn density_threshold() {
        assert!(!is_dense(GameConfig::new((5, 5), 19).unwrap()));
        assert!(is_dense(GameConfig::new((5, 5), 20).unwrap()));
    }

    #[test]
    fn every_cell_can_receive_a_mine() {
        let mut hits = Array2::<bool>::default((4, 4));
        for seed in 0..200 {
            for coords in generate((4, 4), 3, seed).iter_mines() {
                hits[coords.to_nd_index()] = true;
            }
        }

        assert!(hits.iter().all(|&hit| hit));
    }
}
