//! Enemy AI. Turrets hold their ground; little robots kite the player
//! using A* over the level grid.

pub mod robot;
pub mod turret;

use crate::components::{Direction, GridPos};
use crate::plugins::level::GridWorld;

/// Full A* path from `start` to `goal`, both endpoints included.
/// Occupied cells are impassable except for the goal itself, so a path
/// can terminate on the player even though the player sits in the grid.
/// Returns None when the goal is unreachable.
pub fn find_path(grid: &GridWorld, start: GridPos, goal: GridPos) -> Option<Vec<GridPos>> {
    let path = pathfinding::prelude::astar(
        &start,
        |pos| {
            walkable_neighbors(grid, *pos, goal)
                .into_iter()
                .map(|n| (n, 1u32))
        },
        |pos| manhattan(pos, &goal),
        |pos| *pos == goal,
    );
    path.map(|(steps, _cost)| steps)
}

/// In-bounds neighbor cells an enemy may step into, scanned in a fixed
/// Up, Down, Left, Right order so path choice is deterministic.
fn walkable_neighbors(grid: &GridWorld, pos: GridPos, goal: GridPos) -> Vec<GridPos> {
    [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]
    .into_iter()
    .map(|dir| pos.offset(dir))
    .filter(|n| grid.in_grid(*n) && (*n == goal || !grid.is_occupied(*n)))
    .collect()
}

/// Manhattan distance heuristic.
pub fn manhattan(a: &GridPos, b: &GridPos) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// Straight-line distance in cells.
pub fn grid_distance(a: GridPos, b: GridPos) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Single step that closes the gap between two cells, preferring the
/// vertical axis when both differ. Returns None when the cells match.
pub fn step_toward(from: GridPos, to: GridPos) -> Option<Direction> {
    if from.y > to.y {
        Some(Direction::Up)
    } else if from.y < to.y {
        Some(Direction::Down)
    } else if from.x > to.x {
        Some(Direction::Left)
    } else if from.x < to.x {
        Some(Direction::Right)
    } else {
        None
    }
}
