//! Turret AI: turrets are bolted down. They never move, only shoot;
//! fire cadence is handled by `ShotClock`, not the AI module.

use crate::components::{Direction, GridPos};
use crate::plugins::level::GridWorld;

pub fn choose_move(_enemy: GridPos, _player: GridPos, _grid: &GridWorld) -> Option<Direction> {
    None
}
