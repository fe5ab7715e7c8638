use std::collections::HashSet;

use rand::Rng;

use super::config::Difficulty;
use super::grid::{Grid, Position};

/// Share of the board covered by obstacles on Medium
const BASE_COVERAGE: f64 = 0.02;
const MAX_PER_LINE: usize = 3;
/// Cells closer than this to the centre stay clear for the starting snake
const SPAWN_CLEARANCE: i32 = 3;
const ATTEMPTS_PER_OBSTACLE: usize = 50;

/// Static wall blocks scattered over the board for one round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Obstacles {
    cells: HashSet<Position>,
}

impl Obstacles {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: impl IntoIterator<Item = Position>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Lays out a fresh set of obstacles.
    ///
    /// No row or column gets more than three blocks, the area around the
    /// centre is left open, and cells in `reserved` are never used. Placement
    /// gives up on a block after a bounded number of random attempts, so
    /// crowded boards may end up with fewer blocks than requested.
    pub fn generate<R: Rng + ?Sized>(
        grid: &Grid,
        difficulty: Difficulty,
        reserved: &HashSet<Position>,
        rng: &mut R,
    ) -> Self {
        let target = Self::target_count(grid, difficulty);
        let center = grid.center();
        let mut obstacles = Self::none();

        for _ in 0..target {
            for _ in 0..ATTEMPTS_PER_OBSTACLE {
                let pos = Position::new(
                    rng.gen_range(0..grid.width() as i32),
                    rng.gen_range(0..grid.height() as i32),
                );
                if reserved.contains(&pos)
                    || obstacles.cells.contains(&pos)
                    || pos.manhattan_distance(center) < SPAWN_CLEARANCE
                    || obstacles.row_count(pos.y) >= MAX_PER_LINE
                    || obstacles.column_count(pos.x) >= MAX_PER_LINE
                {
                    continue;
                }
                obstacles.cells.insert(pos);
                break;
            }
        }

        obstacles
    }

    pub fn target_count(grid: &Grid, difficulty: Difficulty) -> usize {
        (grid.cell_count() as f64 * BASE_COVERAGE * difficulty.obstacle_density()).round() as usize
    }

    fn row_count(&self, y: i32) -> usize {
        self.cells.iter().filter(|pos| pos.y == y).count()
    }

    fn column_count(&self, x: i32) -> usize {
        self.cells.iter().filter(|pos| pos.x == x).count()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_density_scales_with_difficulty() {
        let grid = Grid::new(20, 20, false);
        assert_eq!(Obstacles::target_count(&grid, Difficulty::Easy), 4);
        assert_eq!(Obstacles::target_count(&grid, Difficulty::Medium), 8);
        assert_eq!(Obstacles::target_count(&grid, Difficulty::Hard), 12);
    }

    #[test]
    fn test_placement_rules_hold() {
        let grid = Grid::new(20, 20, false);
        let reserved: HashSet<Position> = (0..20).map(|x| Position::new(x, 0)).collect();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let obstacles = Obstacles::generate(&grid, Difficulty::Hard, &reserved, &mut rng);

            assert!(obstacles.len() <= Obstacles::target_count(&grid, Difficulty::Hard));
            for pos in obstacles.cells() {
                assert!(grid.is_in_bounds(pos));
                assert!(!reserved.contains(&pos));
                assert!(pos.manhattan_distance(grid.center()) >= SPAWN_CLEARANCE);
                assert!(obstacles.row_count(pos.y) <= MAX_PER_LINE);
                assert!(obstacles.column_count(pos.x) <= MAX_PER_LINE);
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let grid = Grid::new(30, 20, false);
        let a = Obstacles::generate(&grid, Difficulty::Medium, &HashSet::new(), &mut StdRng::seed_from_u64(9));
        let b = Obstacles::generate(&grid, Difficulty::Medium, &HashSet::new(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
