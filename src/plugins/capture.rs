//! Capture-the-flag: pick the flag up, carry it, deliver it to the goal.

use bevy::prelude::*;

use crate::app_state::AppState;
use crate::components::{Bounds, Carried, Flag, HeldFlag, Player};
use crate::events::{FlagCaptured, GoalReached};
use crate::plugins::level::GridWorld;
use crate::resources::GameStats;
use crate::GameSet;

pub struct CapturePlugin;

impl Plugin for CapturePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, carry_flag.in_set(GameSet::Level));
        app.add_observer(on_flag_captured);
        app.add_observer(on_goal_reached);
    }
}

/// Pick up a free-standing flag: drop it from the grid table so it no
/// longer collides, and attach it to the player.
fn on_flag_captured(
    trigger: On<FlagCaptured>,
    mut commands: Commands,
    grid: Option<ResMut<GridWorld>>,
    mut players: Query<&mut HeldFlag, With<Player>>,
    flags: Query<(), (With<Flag>, Without<Carried>)>,
) {
    let flag = trigger.event().flag;
    let Ok(mut held) = players.single_mut() else {
        return;
    };
    if held.0.is_some() || flags.get(flag).is_err() {
        return;
    }
    if let Some(mut grid) = grid {
        grid.remove(flag);
    }
    commands.entity(flag).insert(Carried);
    held.0 = Some(flag);
    info!("flag captured");
}

/// Reaching the goal only counts while carrying the flag; otherwise
/// the player just walks across it.
fn on_goal_reached(
    _trigger: On<GoalReached>,
    players: Query<&HeldFlag, With<Player>>,
    state: Res<State<AppState>>,
    stats: Option<ResMut<GameStats>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    // The win can only be claimed once per run.
    if *state.get() != AppState::InGame {
        return;
    }
    let Ok(held) = players.single() else {
        return;
    };
    if held.0.is_none() {
        return;
    }
    if let Some(mut stats) = stats {
        stats.levels_cleared += 1;
    }
    info!("flag delivered, game won");
    next_state.set(AppState::Victory);
}

/// A carried flag rides along on the player's position.
fn carry_flag(
    players: Query<(&Bounds, &HeldFlag), With<Player>>,
    mut flags: Query<&mut Bounds, (With<Carried>, Without<Player>)>,
) {
    let Ok((player_bounds, held)) = players.single() else {
        return;
    };
    let Some(flag) = held.0 else {
        return;
    };
    if let Ok(mut bounds) = flags.get_mut(flag) {
        bounds.x = player_bounds.x;
        bounds.y = player_bounds.y;
    }
}
