//! Pixel movement with snap-to-border collision resolution.
//!
//! Movers travel in whole pixels. A blocked move leaves the mover
//! flush against the obstacle with zero gap and zero overlap, instead
//! of rejecting the move outright.

use bevy::prelude::*;

use crate::components::{
    Bounds, Carried, Direction, Facing, HeldFlag, ObjectKind, Player, Speed, Sword, Teleporter,
};
use crate::events::{FlagCaptured, GoalReached, TeleporterUsed};
use crate::plugins::level::{pixel_to_world, GridWorld};
use crate::GameSet;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, player_input.in_set(GameSet::Input));
        app.add_systems(Update, sync_transforms.in_set(GameSet::Presentation));
    }
}

/// A collision candidate captured from the world before moving.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub entity: Entity,
    pub bounds: Bounds,
    pub kind: ObjectKind,
}

/// Attempt to move `mover` by `step` pixels in `direction`.
///
/// On a clean move the bounds advance and the grid table is re-keyed.
/// Colliding with an allowed kind commits the move anyway and reports
/// the contact. Any other collision snaps the mover flush against the
/// obstacle along the movement axis; the tentative cell is never
/// entered. Returns the obstacle that was touched, if any.
pub fn try_move(
    grid: &mut GridWorld,
    mover: Entity,
    bounds: &mut Bounds,
    direction: Direction,
    step: i32,
    obstacles: &[Obstacle],
    allowed: &[ObjectKind],
) -> Option<Obstacle> {
    let (dx, dy) = direction.delta();
    let tentative = bounds.translated(dx * step, dy * step);
    let old_cell = bounds.grid_pos();

    let hit = obstacles
        .iter()
        .find(|o| o.entity != mover && tentative.intersects(&o.bounds))
        .copied();

    match hit {
        None => {
            *bounds = tentative;
            grid.move_entity(mover, old_cell, bounds.grid_pos());
            None
        }
        Some(obstacle) if allowed.contains(&obstacle.kind) => {
            *bounds = tentative;
            grid.move_entity(mover, old_cell, bounds.grid_pos());
            Some(obstacle)
        }
        Some(obstacle) => {
            match direction {
                Direction::Up => bounds.y = obstacle.bounds.bottom(),
                Direction::Down => bounds.y = obstacle.bounds.top() - bounds.h,
                Direction::Left => bounds.x = obstacle.bounds.right(),
                Direction::Right => bounds.x = obstacle.bounds.left() - bounds.w,
            }
            grid.move_entity(mover, old_cell, bounds.grid_pos());
            Some(obstacle)
        }
    }
}

/// WASD movement and Space to swing the sword. Each held key produces
/// an independent move, so diagonals are two axis moves per tick.
#[allow(clippy::type_complexity)]
fn player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    grid: Option<ResMut<GridWorld>>,
    mut players: Query<
        (
            Entity,
            &mut Bounds,
            &mut Facing,
            &Speed,
            &HeldFlag,
            &mut Sword,
        ),
        With<Player>,
    >,
    obstacles: Query<(Entity, &Bounds, &ObjectKind), (Without<Player>, Without<Carried>)>,
    teleporters: Query<&Teleporter>,
) {
    let Some(mut grid) = grid else {
        return;
    };
    let Ok((entity, mut bounds, mut facing, speed, held, mut sword)) = players.single_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Space) {
        sword.start_swing(facing.0);
    }

    // Flags and goals never block; teleporters stop blocking once the
    // level is cleared.
    let mut allowed = vec![ObjectKind::Flag, ObjectKind::Goal];
    if teleporters.iter().any(|t| t.activated) {
        allowed.push(ObjectKind::Teleporter);
    }

    let snapshot: Vec<Obstacle> = obstacles
        .iter()
        .map(|(e, b, k)| Obstacle {
            entity: e,
            bounds: *b,
            kind: *k,
        })
        .collect();

    for (key, direction) in [
        (KeyCode::KeyW, Direction::Up),
        (KeyCode::KeyA, Direction::Left),
        (KeyCode::KeyS, Direction::Down),
        (KeyCode::KeyD, Direction::Right),
    ] {
        if !keyboard.pressed(key) {
            continue;
        }
        facing.0 = direction;
        let contact = try_move(
            &mut grid,
            entity,
            &mut bounds,
            direction,
            speed.0,
            &snapshot,
            &allowed,
        );
        let Some(obstacle) = contact else {
            continue;
        };
        match obstacle.kind {
            ObjectKind::Flag => {
                if held.0.is_none() {
                    commands.trigger(FlagCaptured {
                        flag: obstacle.entity,
                    });
                }
            }
            // A goal or teleporter contact ends the level; stop the
            // key loop so a second axis move cannot report it again.
            ObjectKind::Goal => {
                commands.trigger(GoalReached);
                break;
            }
            ObjectKind::Teleporter => {
                commands.trigger(TeleporterUsed);
                break;
            }
            _ => {}
        }
    }
}

/// Mirror pixel bounds into render transforms. Z is assigned at spawn
/// and left alone here.
fn sync_transforms(grid: Option<Res<GridWorld>>, mut query: Query<(&Bounds, &mut Transform)>) {
    let Some(grid) = grid else {
        return;
    };
    for (bounds, mut transform) in &mut query {
        let world = pixel_to_world(bounds, &grid);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GridPos;

    struct Fixture {
        world: World,
        grid: GridWorld,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: World::new(),
                grid: GridWorld::new(8, 8),
            }
        }

        fn mover(&mut self, bounds: Bounds) -> Entity {
            let e = self.world.spawn_empty().id();
            self.grid.insert(bounds.grid_pos(), e);
            e
        }

        fn obstacle(&mut self, bounds: Bounds, kind: ObjectKind) -> Obstacle {
            let e = self.world.spawn_empty().id();
            self.grid.insert(bounds.grid_pos(), e);
            Obstacle {
                entity: e,
                bounds,
                kind,
            }
        }
    }

    #[test]
    fn clean_move_commits_and_rekeys() {
        let mut fx = Fixture::new();
        let mut bounds = Bounds::tile(32, 32);
        let mover = fx.mover(bounds);

        let hit = try_move(
            &mut fx.grid,
            mover,
            &mut bounds,
            Direction::Right,
            32,
            &[],
            &[],
        );
        assert!(hit.is_none());
        assert_eq!(bounds, Bounds::tile(64, 32));
        assert!(!fx.grid.is_occupied(GridPos::new(1, 1)));
        assert_eq!(fx.grid.entity_at(GridPos::new(2, 1)), Some(mover));
    }

    #[test]
    fn sub_cell_moves_keep_the_same_key() {
        let mut fx = Fixture::new();
        let mut bounds = Bounds::tile(32, 32);
        let mover = fx.mover(bounds);

        for _ in 0..31 {
            try_move(&mut fx.grid, mover, &mut bounds, Direction::Right, 1, &[], &[]);
        }
        assert_eq!(bounds.x, 63);
        assert_eq!(fx.grid.entity_at(GridPos::new(1, 1)), Some(mover));

        // The 32nd pixel crosses the cell boundary.
        try_move(&mut fx.grid, mover, &mut bounds, Direction::Right, 1, &[], &[]);
        assert_eq!(fx.grid.entity_at(GridPos::new(2, 1)), Some(mover));
        assert!(!fx.grid.is_occupied(GridPos::new(1, 1)));
    }

    #[test]
    fn blocked_move_snaps_flush_with_zero_gap() {
        let mut fx = Fixture::new();
        let wall = fx.obstacle(Bounds::tile(64, 0), ObjectKind::Wall);
        let mut bounds = Bounds::tile(24, 0);
        let mover = fx.mover(bounds);

        let hit = try_move(
            &mut fx.grid,
            mover,
            &mut bounds,
            Direction::Right,
            16,
            &[wall],
            &[],
        );
        assert_eq!(hit.unwrap().entity, wall.entity);
        // Flush: leading edge meets the wall's near edge exactly.
        assert_eq!(bounds.right(), wall.bounds.left());
        assert!(!bounds.intersects(&wall.bounds));
    }

    #[test]
    fn snapping_across_a_cell_boundary_rekeys_the_mover() {
        let mut fx = Fixture::new();
        let wall = fx.obstacle(Bounds::tile(64, 0), ObjectKind::Wall);
        let mut bounds = Bounds::tile(24, 0);
        let mover = fx.mover(bounds);

        try_move(
            &mut fx.grid,
            mover,
            &mut bounds,
            Direction::Right,
            16,
            &[wall],
            &[],
        );

        // The snap lands one cell over from where the move started;
        // the table follows the bounds.
        assert_eq!(bounds.x, 32);
        assert!(!fx.grid.is_occupied(GridPos::new(0, 0)));
        assert_eq!(fx.grid.entity_at(GridPos::new(1, 0)), Some(mover));
    }

    #[test]
    fn snap_works_on_every_axis() {
        let mut fx = Fixture::new();
        let wall = fx.obstacle(Bounds::tile(96, 96), ObjectKind::Wall);

        let mut from_below = Bounds::tile(96, 130);
        let mover = fx.mover(from_below);
        try_move(&mut fx.grid, mover, &mut from_below, Direction::Up, 8, &[wall], &[]);
        assert_eq!(from_below.top(), wall.bounds.bottom());

        let mut from_above = Bounds::tile(96, 62);
        let mover = fx.mover(from_above);
        try_move(&mut fx.grid, mover, &mut from_above, Direction::Down, 8, &[wall], &[]);
        assert_eq!(from_above.bottom(), wall.bounds.top());

        let mut from_right = Bounds::tile(130, 96);
        let mover = fx.mover(from_right);
        try_move(&mut fx.grid, mover, &mut from_right, Direction::Left, 8, &[wall], &[]);
        assert_eq!(from_right.left(), wall.bounds.right());
    }

    #[test]
    fn blocked_move_never_enters_the_tentative_cell() {
        let mut fx = Fixture::new();
        let wall = fx.obstacle(Bounds::tile(64, 32), ObjectKind::Wall);
        // Already flush against the wall.
        let mut bounds = Bounds::tile(32, 32);
        let mover = fx.mover(bounds);

        let hit = try_move(
            &mut fx.grid,
            mover,
            &mut bounds,
            Direction::Right,
            4,
            &[wall],
            &[],
        );
        assert!(hit.is_some());
        assert_eq!(bounds, Bounds::tile(32, 32));
        assert_eq!(fx.grid.entity_at(GridPos::new(1, 1)), Some(mover));
        assert_eq!(fx.grid.entity_at(GridPos::new(2, 1)), Some(wall.entity));
    }

    #[test]
    fn allowed_kinds_pass_through_and_report_contact() {
        let mut fx = Fixture::new();
        let flag = fx.obstacle(Bounds::tile(64, 32), ObjectKind::Flag);
        let mut bounds = Bounds::tile(33, 32);
        let mover = fx.mover(bounds);

        let hit = try_move(
            &mut fx.grid,
            mover,
            &mut bounds,
            Direction::Right,
            1,
            &[flag],
            &[ObjectKind::Flag],
        );
        // The move commits even though the boxes now overlap.
        assert_eq!(hit.unwrap().entity, flag.entity);
        assert_eq!(bounds.x, 34);
        assert!(bounds.intersects(&flag.bounds));
    }

    #[test]
    fn mover_ignores_its_own_snapshot_entry() {
        let mut fx = Fixture::new();
        let mut bounds = Bounds::tile(32, 32);
        let mover = fx.mover(bounds);
        let self_entry = Obstacle {
            entity: mover,
            bounds,
            kind: ObjectKind::Player,
        };

        let hit = try_move(
            &mut fx.grid,
            mover,
            &mut bounds,
            Direction::Down,
            1,
            &[self_entry],
            &[],
        );
        assert!(hit.is_none());
        assert_eq!(bounds.y, 33);
    }
}
