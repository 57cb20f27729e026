use bevy::prelude::*;

/// The player walked into a flag that nobody is carrying.
#[derive(Event)]
pub struct FlagCaptured {
    pub flag: Entity,
}

/// The player walked into a goal zone. Only wins the game if a flag is
/// being carried at the time.
#[derive(Event)]
pub struct GoalReached;

/// The player stepped into an activated teleporter.
#[derive(Event)]
pub struct TeleporterUsed;

/// An enemy was destroyed by a reflected laser.
#[derive(Event)]
pub struct EnemyDestroyed;

/// A hostile laser reached the player.
#[derive(Event)]
pub struct PlayerHit;

/// The sword turned a hostile laser around.
#[derive(Event)]
pub struct LaserDeflected;
