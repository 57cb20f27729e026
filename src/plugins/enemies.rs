//! Enemy behavior: reflected-laser deaths, fire cadence, and movement.
//!
//! Each enemy is processed once per tick in a fixed order. A dead
//! enemy skips the rest of its turn, so it can neither shoot nor move
//! on the tick it dies.

use bevy::prelude::*;
use rand::Rng;

use crate::ai;
use crate::components::{
    Bounds, Carried, Enemy, Laser, LittleRobot, ObjectKind, Player, ShotClock, Speed,
};
use crate::events::EnemyDestroyed;
use crate::plugins::level::{GridWorld, LevelEntity, Z_OVERLAY};
use crate::plugins::movement::{try_move, Obstacle};
use crate::resources::GameStats;
use crate::GameSet;

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, enemy_update.in_set(GameSet::Enemies));
        app.add_observer(on_enemy_destroyed);
    }
}

const LASER_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);
const LASER_VISUAL_SIZE: f32 = 10.0;

/// Tick the fire cadence and roll the per-tick coin. A won roll resets
/// the clock and returns the laser aimed from `origin` at `target`.
///
/// A lost flip leaves the clock running, so the next tick flips again
/// rather than waiting out a whole new interval.
fn try_shoot(
    clock: &mut ShotClock,
    dt: f32,
    origin: Vec2,
    target: Vec2,
    rng: &mut impl Rng,
) -> Option<Laser> {
    clock.tick(dt);
    if !clock.ready() || !rng.gen_bool(0.5) {
        return None;
    }
    clock.reset();
    Laser::fire(origin, target)
}

/// One pass over every enemy: die to reflected lasers, maybe shoot,
/// then move (robots only). The first query of the set is a read-only
/// snapshot of collision candidates taken before any enemy moves.
#[allow(clippy::type_complexity)]
fn enemy_update(
    mut commands: Commands,
    time: Res<Time>,
    grid: Option<ResMut<GridWorld>>,
    players: Query<&Bounds, (With<Player>, Without<Enemy>)>,
    lasers: Query<(&Laser, &Bounds), Without<Enemy>>,
    mut set: ParamSet<(
        Query<(Entity, &Bounds, &ObjectKind), Without<Carried>>,
        Query<
            (
                Entity,
                &mut Bounds,
                &mut ShotClock,
                Option<&Speed>,
                Has<LittleRobot>,
            ),
            With<Enemy>,
        >,
    )>,
) {
    let Some(mut grid) = grid else {
        return;
    };
    let Ok(player_bounds) = players.single() else {
        return;
    };
    let player_bounds = *player_bounds;
    let dt = time.delta_secs();

    let reflected: Vec<Bounds> = lasers
        .iter()
        .filter(|(laser, _)| laser.reflected)
        .map(|(_, b)| *b)
        .collect();

    let mut snapshot: Vec<Obstacle> = set
        .p0()
        .iter()
        .map(|(e, b, k)| Obstacle {
            entity: e,
            bounds: *b,
            kind: *k,
        })
        .collect();

    let mut rng = rand::thread_rng();
    for (entity, mut bounds, mut clock, speed, is_robot) in &mut set.p1() {
        // Reflected lasers kill on contact.
        if reflected.iter().any(|laser| laser.intersects(&bounds)) {
            commands.entity(entity).despawn();
            grid.remove(entity);
            snapshot.retain(|o| o.entity != entity);
            commands.trigger(EnemyDestroyed);
            continue;
        }

        if let Some(laser) = try_shoot(
            &mut clock,
            dt,
            bounds.center_vec(),
            player_bounds.center_vec(),
            &mut rng,
        ) {
            let laser_bounds = laser.bounds();
            commands.spawn((
                laser,
                laser_bounds,
                LevelEntity,
                Sprite::from_color(LASER_COLOR, Vec2::splat(LASER_VISUAL_SIZE)),
                Transform::from_xyz(0.0, 0.0, Z_OVERLAY),
            ));
        }

        let enemy_cell = bounds.center_cell();
        let player_cell = player_bounds.center_cell();
        let direction = if is_robot {
            ai::robot::choose_move(enemy_cell, player_cell, &grid)
        } else {
            ai::turret::choose_move(enemy_cell, player_cell, &grid)
        };
        let step = speed.map(|s| s.0).unwrap_or(0);
        if step == 0 {
            continue;
        }
        if let Some(direction) = direction {
            try_move(
                &mut grid,
                entity,
                &mut bounds,
                direction,
                step,
                &snapshot,
                &[],
            );
            // Keep later enemies colliding against where this one
            // actually is, not where it started the tick. A blocked
            // move still shifts the bounds through the snap.
            if let Some(own) = snapshot.iter_mut().find(|o| o.entity == entity) {
                own.bounds = *bounds;
            }
        }
    }
}

fn on_enemy_destroyed(_trigger: On<EnemyDestroyed>, stats: Option<ResMut<GameStats>>) {
    if let Some(mut stats) = stats {
        stats.enemies_destroyed += 1;
        info!("enemy destroyed: total={}", stats.enemies_destroyed);
    }
}
