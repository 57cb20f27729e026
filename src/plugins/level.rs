//! Level loading, the collision grid, and level progression.
//!
//! Parses ASCII map files into ECS entities backed by a sparse grid
//! table, and drives the Loading → Playing → Transition loop. Every
//! object is rendered as a colored rectangle.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::app_state::{AppState, PlayingState};
use crate::components::{
    Bounds, Direction, Enemy, Facing, Flag, Goal, GridPos, HeldFlag, LittleRobot, ObjectKind,
    Player, ShotClock, Speed, Sword, Teleporter, Turret, Wall, TILE_SIZE,
};
use crate::events::TeleporterUsed;
use crate::resources::{CurrentLevel, GameStats, LevelManifest};
use crate::GameSet;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(PlayingState::Loading), load_level);
        app.add_systems(
            OnEnter(PlayingState::Transition),
            (despawn_level, advance_level).chain(),
        );
        app.add_systems(Update, update_teleporters.in_set(GameSet::Level));

        // Transition already tears the level down during normal
        // progression, but winning jumps straight out of InGame.
        app.add_systems(OnExit(AppState::InGame), despawn_level);

        app.add_observer(on_teleporter_used);
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const FLOOR_COLOR: Color = Color::srgb(0.07, 0.07, 0.1);
const WALL_COLOR: Color = Color::srgb(0.35, 0.35, 0.4);
const PLAYER_COLOR: Color = Color::srgb(0.2, 0.7, 1.0);
const TURRET_COLOR: Color = Color::srgb(0.8, 0.25, 0.2);
const ROBOT_COLOR: Color = Color::srgb(0.9, 0.5, 0.15);
const TELEPORTER_IDLE_COLOR: Color = Color::srgb(0.3, 0.25, 0.5);
const TELEPORTER_ACTIVE_COLOR: Color = Color::srgb(0.5, 0.9, 0.5);
const FLAG_COLOR: Color = Color::srgb(1.0, 0.85, 0.0);
const GOAL_COLOR: Color = Color::srgb(0.2, 0.8, 0.4);

/// Pixels per tick while a movement key is held.
const PLAYER_SPEED: i32 = 1;
const ROBOT_SPEED: i32 = 1;

// Draw order: floor, static objects, movers, carried flag on top.
const Z_STATIC: f32 = 1.0;
const Z_MOVER: f32 = 2.0;
pub const Z_OVERLAY: f32 = 3.0;

// ---------------------------------------------------------------------------
// Grid table
// ---------------------------------------------------------------------------

/// Sparse cell-to-entity table for the current level.
///
/// One entity per cell; movers are re-keyed as their top-left corner
/// crosses cell boundaries. Lasers and carried objects live outside
/// the table and never block anything.
#[derive(Resource, Debug)]
pub struct GridWorld {
    pub width: i32,
    pub height: i32,
    cells: HashMap<GridPos, Entity>,
}

impl GridWorld {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, pos: GridPos, entity: Entity) {
        self.cells.insert(pos, entity);
    }

    pub fn entity_at(&self, pos: GridPos) -> Option<Entity> {
        self.cells.get(&pos).copied()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Drop an entity from the table wherever it is keyed.
    pub fn remove(&mut self, entity: Entity) {
        self.cells.retain(|_, e| *e != entity);
    }

    /// Re-key a mover in O(1). The caller supplies both cells, derived
    /// from the mover's bounds before and after the committed move.
    pub fn move_entity(&mut self, entity: Entity, from: GridPos, to: GridPos) {
        if from == to {
            return;
        }
        if self.cells.get(&from) == Some(&entity) {
            self.cells.remove(&from);
        }
        self.cells.insert(to, entity);
    }

    /// Whether a cell address lies inside the grid.
    pub fn in_grid(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Pixel rectangle covering the whole level.
    pub fn pixel_bounds(&self) -> Bounds {
        Bounds::new(0, 0, self.width * TILE_SIZE, self.height * TILE_SIZE)
    }

    /// Whether a pixel rectangle still touches the level area.
    pub fn in_bounds(&self, bounds: &Bounds) -> bool {
        bounds.intersects(&self.pixel_bounds())
    }
}

// ---------------------------------------------------------------------------
// Map parsing
// ---------------------------------------------------------------------------

fn kind_from_char(c: char) -> Option<ObjectKind> {
    match c {
        'P' => Some(ObjectKind::Player),
        'X' => Some(ObjectKind::Wall),
        'T' => Some(ObjectKind::Turret),
        'S' => Some(ObjectKind::LittleRobot),
        'D' => Some(ObjectKind::Teleporter),
        'F' => Some(ObjectKind::Flag),
        'O' => Some(ObjectKind::Goal),
        _ => None,
    }
}

pub fn kind_to_char(kind: ObjectKind) -> char {
    match kind {
        ObjectKind::Player => 'P',
        ObjectKind::Wall => 'X',
        ObjectKind::Turret => 'T',
        ObjectKind::LittleRobot => 'S',
        ObjectKind::Teleporter => 'D',
        ObjectKind::Flag => 'F',
        ObjectKind::Goal => 'O',
    }
}

/// A map file reduced to dimensions plus a list of placed objects.
/// Unrecognized characters are empty floor; short rows are padded to
/// the widest row.
#[derive(Debug, Clone)]
pub struct ParsedLevel {
    pub width: i32,
    pub height: i32,
    pub objects: Vec<(GridPos, ObjectKind)>,
}

impl ParsedLevel {
    pub fn parse(text: &str) -> Result<Self, String> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Err("empty map".to_string());
        }

        let height = lines.len();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return Err("map has zero width".to_string());
        }

        let mut objects = Vec::new();
        let mut player_found = false;
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let Some(kind) = kind_from_char(ch) else {
                    continue;
                };
                let pos = GridPos::new(x as i32, y as i32);
                if kind == ObjectKind::Player {
                    if player_found {
                        return Err(format!("multiple player spawns at ({}, {})", x, y));
                    }
                    player_found = true;
                }
                objects.push((pos, kind));
            }
        }

        if !player_found {
            return Err("no player spawn ('P') found in map".to_string());
        }

        Ok(ParsedLevel {
            width: width as i32,
            height: height as i32,
            objects,
        })
    }

    pub fn player_spawn(&self) -> Option<GridPos> {
        self.objects
            .iter()
            .find(|(_, k)| *k == ObjectKind::Player)
            .map(|(p, _)| *p)
    }
}

// ---------------------------------------------------------------------------
// Coordinate conversion
// ---------------------------------------------------------------------------

/// Map a pixel rectangle (top-left origin, y down) to the world-space
/// position of its center (map centered on the origin, y up).
pub fn pixel_to_world(bounds: &Bounds, grid: &GridWorld) -> Vec2 {
    let center = bounds.center_vec();
    let half_w = (grid.width * TILE_SIZE) as f32 / 2.0;
    let half_h = (grid.height * TILE_SIZE) as f32 / 2.0;
    Vec2::new(center.x - half_w, half_h - center.y)
}

/// Marker for entities that belong to the current level.
#[derive(Component, Debug)]
pub struct LevelEntity;

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Spawn every object of a parsed level plus the floor backdrop, and
/// build the matching grid table.
pub fn spawn_level(commands: &mut Commands, parsed: &ParsedLevel) -> GridWorld {
    let mut grid = GridWorld::new(parsed.width, parsed.height);
    let tile = Vec2::splat(TILE_SIZE as f32);

    commands.spawn((
        LevelEntity,
        Sprite::from_color(
            FLOOR_COLOR,
            Vec2::new(
                (parsed.width * TILE_SIZE) as f32,
                (parsed.height * TILE_SIZE) as f32,
            ),
        ),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    for &(pos, kind) in &parsed.objects {
        let bounds = Bounds::at_cell(pos);
        let entity = match kind {
            ObjectKind::Player => commands
                .spawn((
                    Player,
                    kind,
                    bounds,
                    Facing(Direction::Up),
                    Speed(PLAYER_SPEED),
                    HeldFlag::default(),
                    Sword::default(),
                    LevelEntity,
                    Sprite::from_color(PLAYER_COLOR, tile),
                    Transform::from_xyz(0.0, 0.0, Z_MOVER),
                ))
                .id(),
            ObjectKind::Wall => commands
                .spawn((
                    Wall,
                    kind,
                    bounds,
                    LevelEntity,
                    Sprite::from_color(WALL_COLOR, tile),
                    Transform::from_xyz(0.0, 0.0, Z_STATIC),
                ))
                .id(),
            ObjectKind::Turret => commands
                .spawn((
                    Enemy,
                    Turret,
                    kind,
                    bounds,
                    ShotClock::default(),
                    LevelEntity,
                    Sprite::from_color(TURRET_COLOR, tile),
                    Transform::from_xyz(0.0, 0.0, Z_STATIC),
                ))
                .id(),
            ObjectKind::LittleRobot => commands
                .spawn((
                    Enemy,
                    LittleRobot,
                    kind,
                    bounds,
                    ShotClock::default(),
                    Speed(ROBOT_SPEED),
                    LevelEntity,
                    Sprite::from_color(ROBOT_COLOR, tile),
                    Transform::from_xyz(0.0, 0.0, Z_MOVER),
                ))
                .id(),
            ObjectKind::Teleporter => commands
                .spawn((
                    Teleporter::default(),
                    kind,
                    bounds,
                    LevelEntity,
                    Sprite::from_color(TELEPORTER_IDLE_COLOR, tile),
                    Transform::from_xyz(0.0, 0.0, Z_STATIC),
                ))
                .id(),
            ObjectKind::Flag => commands
                .spawn((
                    Flag,
                    kind,
                    bounds,
                    LevelEntity,
                    Sprite::from_color(FLAG_COLOR, tile * 0.5),
                    Transform::from_xyz(0.0, 0.0, Z_OVERLAY),
                ))
                .id(),
            ObjectKind::Goal => commands
                .spawn((
                    Goal,
                    kind,
                    bounds,
                    LevelEntity,
                    Sprite::from_color(GOAL_COLOR, tile),
                    Transform::from_xyz(0.0, 0.0, Z_STATIC),
                ))
                .id(),
        };
        grid.insert(pos, entity);
    }

    grid
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Read and spawn the current level, then hand off to Playing.
fn load_level(
    mut commands: Commands,
    manifest: Res<LevelManifest>,
    level: Res<CurrentLevel>,
    mut next_state: ResMut<NextState<PlayingState>>,
) {
    let entry = manifest
        .level(level.0)
        .unwrap_or_else(|| panic!("level {} missing from manifest", level.0));
    let text = std::fs::read_to_string(&entry.map)
        .unwrap_or_else(|e| panic!("failed to read map file {}: {}", entry.map, e));
    let parsed = ParsedLevel::parse(&text)
        .unwrap_or_else(|e| panic!("failed to parse map file {}: {}", entry.map, e));

    let grid = spawn_level(&mut commands, &parsed);
    info!(
        "level {} loaded: {} ({}x{})",
        level.0, entry.name, grid.width, grid.height
    );
    commands.insert_resource(grid);
    next_state.set(PlayingState::Playing);
}

/// Teleporters light up once the last enemy is gone.
fn update_teleporters(
    enemies: Query<(), With<Enemy>>,
    mut teleporters: Query<(&mut Teleporter, Option<&mut Sprite>)>,
) {
    let cleared = enemies.is_empty();
    for (mut teleporter, sprite) in &mut teleporters {
        if cleared && !teleporter.activated {
            teleporter.activated = true;
            info!("teleporter activated");
            if let Some(mut sprite) = sprite {
                sprite.color = TELEPORTER_ACTIVE_COLOR;
            }
        }
    }
}

/// A used teleporter ends the level.
fn on_teleporter_used(
    _trigger: On<TeleporterUsed>,
    stats: Option<ResMut<GameStats>>,
    mut next_state: ResMut<NextState<PlayingState>>,
) {
    if let Some(mut stats) = stats {
        stats.levels_cleared += 1;
    }
    info!("teleporter used, level complete");
    next_state.set(PlayingState::Transition);
}

/// Despawn everything the level spawned, including lasers and carried
/// flags, and drop the grid table.
fn despawn_level(mut commands: Commands, query: Query<Entity, With<LevelEntity>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<GridWorld>();
}

/// Move on to the next manifest entry, or declare victory after the
/// last one.
fn advance_level(
    manifest: Res<LevelManifest>,
    mut level: ResMut<CurrentLevel>,
    mut next_playing: ResMut<NextState<PlayingState>>,
    mut next_app: ResMut<NextState<AppState>>,
) {
    level.0 += 1;
    if manifest.level(level.0).is_some() {
        next_playing.set(PlayingState::Loading);
    } else {
        next_app.set(AppState::Victory);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
