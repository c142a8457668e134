use std::collections::{HashSet, VecDeque};

use super::state::{GridPos, Owner, TileGrid};

/// Upper bound on cells dequeued by one search.
pub const DEFAULT_EXPANSION_CAP: usize = 1000;

/// Breadth-first search over walkable cells. Exhausting the frontier or the
/// expansion cap both answer "unreachable".
pub fn is_reachable(
    grid: &TileGrid,
    from: GridPos,
    to: GridPos,
    walker: Owner,
    cap: usize,
) -> bool {
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();

    queue.push_back(from);
    visited.insert(from);

    let mut expansions = 0;
    while expansions < cap {
        let Some(current) = queue.pop_front() else {
            return false;
        };
        expansions += 1;

        if current == to {
            return true;
        }

        for neighbor in current.neighbors() {
            if !visited.contains(&neighbor) && grid.is_walkable(neighbor, walker) {
                visited.insert(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    false
}

/// Closest empty tile by Manhattan distance that `walker` can actually get
/// to. Equal distances keep column scan order (x outer, y inner).
pub fn find_nearest_reachable_empty(
    grid: &TileGrid,
    from: GridPos,
    walker: Owner,
    cap: usize,
) -> Option<GridPos> {
    let (width, height) = grid.get_grid_dimensions();
    let mut candidates: Vec<GridPos> = (0..width as i32)
        .flat_map(|x| (0..height as i32).map(move |y| GridPos::new(x, y)))
        .filter(|pos| grid.owner_at(*pos) == Some(Owner::Empty))
        .collect();

    if candidates.is_empty() {
        tracing::debug!("[{}] No empty tiles left on the board", walker);
        return None;
    }

    candidates.sort_by_key(|pos| pos.distance(&from));

    let found = candidates
        .iter()
        .copied()
        .find(|candidate| is_reachable(grid, from, *candidate, walker, cap));

    if found.is_none() {
        tracing::debug!(
            "[{}] {} empty tiles but none are reachable from {:?}",
            walker,
            candidates.len(),
            from
        );
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32) -> TileGrid {
        TileGrid::new(width, height, 1.0).unwrap()
    }

    /// Vertical wall of AgentA tiles at x = 2 with an optional gap row.
    fn walled_grid(gap: Option<i32>) -> TileGrid {
        let mut grid = grid(5, 5);
        for y in 0..5 {
            if Some(y) != gap {
                grid.claim(GridPos::new(2, y), Owner::AgentA);
            }
        }
        grid
    }

    #[test]
    fn test_reachable_on_open_grid() {
        let grid = grid(5, 5);
        assert!(is_reachable(
            &grid,
            GridPos::new(0, 0),
            GridPos::new(4, 4),
            Owner::AgentB,
            DEFAULT_EXPANSION_CAP
        ));
        assert!(is_reachable(
            &grid,
            GridPos::new(3, 3),
            GridPos::new(3, 3),
            Owner::AgentB,
            DEFAULT_EXPANSION_CAP
        ));
    }

    #[test]
    fn test_foreign_wall_blocks() {
        let grid = walled_grid(None);
        assert!(!is_reachable(
            &grid,
            GridPos::new(0, 0),
            GridPos::new(4, 0),
            Owner::AgentB,
            DEFAULT_EXPANSION_CAP
        ));
        // The wall's owner walks straight through it
        assert!(is_reachable(
            &grid,
            GridPos::new(0, 0),
            GridPos::new(4, 0),
            Owner::AgentA,
            DEFAULT_EXPANSION_CAP
        ));
    }

    #[test]
    fn test_gap_in_wall_is_found() {
        let grid = walled_grid(Some(4));
        assert!(is_reachable(
            &grid,
            GridPos::new(0, 0),
            GridPos::new(4, 0),
            Owner::Controlled,
            DEFAULT_EXPANSION_CAP
        ));
    }

    #[test]
    fn test_out_of_bounds_target_is_unreachable() {
        let grid = grid(3, 3);
        assert!(!is_reachable(
            &grid,
            GridPos::new(0, 0),
            GridPos::new(5, 5),
            Owner::AgentA,
            DEFAULT_EXPANSION_CAP
        ));
    }

    #[test]
    fn test_cap_exhaustion_means_unreachable() {
        let grid = grid(40, 40);
        let from = GridPos::new(0, 0);
        let to = GridPos::new(39, 39);

        assert!(!is_reachable(&grid, from, to, Owner::AgentA, 10));
        assert!(is_reachable(&grid, from, to, Owner::AgentA, 40 * 40));
    }

    #[test]
    fn test_reachability_is_symmetric_on_uniform_grid() {
        let mut grid = grid(6, 6);
        for pos in [
            GridPos::new(1, 0),
            GridPos::new(1, 1),
            GridPos::new(1, 2),
            GridPos::new(3, 5),
            GridPos::new(3, 4),
            GridPos::new(3, 3),
            GridPos::new(4, 1),
            GridPos::new(5, 1),
        ] {
            grid.claim(pos, Owner::AgentC);
        }

        let open: Vec<GridPos> = grid.tiles_by_owner(Owner::Empty).map(|tile| tile.pos()).collect();
        for a in &open {
            for b in &open {
                for walker in [Owner::Controlled, Owner::AgentA] {
                    assert_eq!(
                        is_reachable(&grid, *a, *b, walker, DEFAULT_EXPANSION_CAP),
                        is_reachable(&grid, *b, *a, walker, DEFAULT_EXPANSION_CAP),
                        "{:?} <-> {:?} for {}",
                        a,
                        b,
                        walker
                    );
                }
            }
        }
    }

    #[test]
    fn test_nearest_empty_is_deterministic() {
        let mut grid = grid(10, 10);
        let from = GridPos::new(0, 0);
        grid.claim(from, Owner::AgentA);

        // (0,1) and (1,0) tie; the x = 0 column is scanned first
        let first = find_nearest_reachable_empty(&grid, from, Owner::AgentA, DEFAULT_EXPANSION_CAP);
        assert_eq!(first, Some(GridPos::new(0, 1)));

        for _ in 0..5 {
            assert_eq!(
                find_nearest_reachable_empty(&grid, from, Owner::AgentA, DEFAULT_EXPANSION_CAP),
                first
            );
        }
    }

    #[test]
    fn test_nearest_ties_scan_columns_first() {
        let mut grid = grid(10, 10);
        let from = GridPos::new(5, 5);
        grid.claim(from, Owner::AgentB);

        assert_eq!(
            find_nearest_reachable_empty(&grid, from, Owner::AgentB, DEFAULT_EXPANSION_CAP),
            Some(GridPos::new(4, 5))
        );

        grid.claim(GridPos::new(4, 5), Owner::AgentB);
        assert_eq!(
            find_nearest_reachable_empty(&grid, from, Owner::AgentB, DEFAULT_EXPANSION_CAP),
            Some(GridPos::new(5, 4))
        );
    }

    #[test]
    fn test_nearest_skips_blocked_tiles() {
        let mut grid = grid(10, 10);
        let from = GridPos::new(0, 0);
        grid.claim(from, Owner::AgentA);
        grid.claim(GridPos::new(1, 0), Owner::AgentB);

        assert_eq!(
            find_nearest_reachable_empty(&grid, from, Owner::AgentA, DEFAULT_EXPANSION_CAP),
            Some(GridPos::new(0, 1))
        );
    }

    #[test]
    fn test_nearest_prefers_reachable_over_closer() {
        let mut grid = walled_grid(None);
        // Left of the wall is all ours
        for y in 0..5 {
            for x in 0..2 {
                grid.claim(GridPos::new(x, y), Owner::AgentB);
            }
        }
        grid.claim(GridPos::new(3, 0), Owner::AgentB);

        // Every empty tile is behind AgentA's wall
        assert_eq!(
            find_nearest_reachable_empty(&grid, GridPos::new(1, 0), Owner::AgentB, DEFAULT_EXPANSION_CAP),
            None
        );
        // AgentA walks its own wall; (3,1) and (4,0) tie and column x = 3 scans first
        assert_eq!(
            find_nearest_reachable_empty(&grid, GridPos::new(2, 0), Owner::AgentA, DEFAULT_EXPANSION_CAP),
            Some(GridPos::new(3, 1))
        );
    }

    #[test]
    fn test_no_empty_tiles() {
        let mut grid = grid(2, 2);
        for y in 0..2 {
            for x in 0..2 {
                grid.claim(GridPos::new(x, y), Owner::Controlled);
            }
        }
        assert_eq!(
            find_nearest_reachable_empty(&grid, GridPos::new(0, 0), Owner::Controlled, 1000),
            None
        );
    }
}
