//! Laser flight and the sword.
//!
//! Lasers fly in straight lines until they leave the level. A swinging
//! sword covers one quadrant around the wielder's hand; any hostile
//! laser entering it is turned around and becomes a weapon against the
//! enemies that fired it.

use bevy::prelude::*;

use crate::components::{Bounds, Facing, Laser, Player, Sword};
use crate::events::{LaserDeflected, PlayerHit};
use crate::plugins::level::GridWorld;
use crate::resources::GameStats;
use crate::GameSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (advance_lasers, update_sword, deflect_lasers, player_laser_hits)
                .chain()
                .in_set(GameSet::Projectiles),
        );
        app.add_observer(on_laser_deflected);
        app.add_observer(on_player_hit);
    }
}

/// Move every laser along its trajectory and cull the ones that have
/// left the level entirely.
fn advance_lasers(
    mut commands: Commands,
    time: Res<Time>,
    grid: Option<Res<GridWorld>>,
    mut lasers: Query<(Entity, &mut Laser, &mut Bounds)>,
) {
    let Some(grid) = grid else {
        return;
    };
    for (entity, mut laser, mut bounds) in &mut lasers {
        laser.advance(time.delta_secs());
        *bounds = laser.bounds();
        if !grid.in_bounds(&bounds) {
            commands.entity(entity).despawn();
        }
    }
}

/// Advance the swing arc of any sword mid-swing.
fn update_sword(time: Res<Time>, mut swords: Query<&mut Sword>) {
    for mut sword in &mut swords {
        sword.update(time.delta_secs());
    }
}

/// Turn around hostile lasers caught in the swing arc. Each laser is
/// reflected at most once; a reflected laser passing back through the
/// sword keeps going.
fn deflect_lasers(
    mut commands: Commands,
    players: Query<(&Bounds, &Facing, &Sword), With<Player>>,
    mut lasers: Query<&mut Laser>,
) {
    let Ok((bounds, facing, sword)) = players.single() else {
        return;
    };
    if !sword.swinging {
        return;
    }
    let hand = Sword::hand_position(bounds, facing.0);
    let arc = Sword::bounding_rect(hand, facing.0);
    for mut laser in &mut lasers {
        if !laser.reflected && laser.bounds().intersects(&arc) {
            laser.reflect();
            commands.trigger(LaserDeflected);
        }
    }
}

/// Hostile lasers that reach the player are spent on impact. Reflected
/// lasers are friendly and pass through.
fn player_laser_hits(
    mut commands: Commands,
    players: Query<&Bounds, With<Player>>,
    lasers: Query<(Entity, &Laser, &Bounds), Without<Player>>,
) {
    let Ok(player_bounds) = players.single() else {
        return;
    };
    for (entity, laser, bounds) in &lasers {
        if !laser.reflected && bounds.intersects(player_bounds) {
            commands.entity(entity).despawn();
            commands.trigger(PlayerHit);
        }
    }
}

fn on_laser_deflected(_trigger: On<LaserDeflected>, stats: Option<ResMut<GameStats>>) {
    if let Some(mut stats) = stats {
        stats.lasers_deflected += 1;
        info!("laser deflected: total={}", stats.lasers_deflected);
    }
}

fn on_player_hit(_trigger: On<PlayerHit>, stats: Option<ResMut<GameStats>>) {
    if let Some(mut stats) = stats {
        stats.hits_taken += 1;
        warn!("player hit: total={}", stats.hits_taken);
    }
}
