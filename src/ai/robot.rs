//! Little robot AI: keep the player at arm's length. Too close and the
//! robot backs off, inside the comfort band it holds still and shoots,
//! and beyond the band it paths toward the player.

use crate::components::{Direction, GridPos};
use crate::plugins::level::GridWorld;

/// Below this many cells the robot retreats.
pub const MINIMUM_DISTANCE: f32 = 3.5;

/// Below this many cells (but above the minimum) the robot holds.
pub const DESIRED_DISTANCE: f32 = 4.5;

pub fn choose_move(enemy: GridPos, player: GridPos, grid: &GridWorld) -> Option<Direction> {
    let dist = super::grid_distance(enemy, player);
    if dist < MINIMUM_DISTANCE {
        // Step the way the player would step to reach us, i.e. away.
        super::step_toward(player, enemy)
    } else if dist < DESIRED_DISTANCE {
        None
    } else {
        let path = super::find_path(grid, enemy, player)?;
        let next = *path.get(1)?;
        super::step_toward(enemy, next)
    }
}
