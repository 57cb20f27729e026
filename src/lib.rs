pub mod ai;
pub mod app_state;
pub mod components;
pub mod events;
pub mod plugins;
pub mod resources;

use bevy::prelude::*;

use app_state::{AppState, PlayingState};
use plugins::camera::CameraPlugin;
use plugins::capture::CapturePlugin;
use plugins::combat::CombatPlugin;
use plugins::enemies::EnemyPlugin;
use plugins::level::LevelPlugin;
use plugins::menu::MenuPlugin;
use plugins::movement::MovementPlugin;
use plugins::victory::VictoryPlugin;
use resources::{CurrentLevel, GameStats, LevelManifest};

/// Path to the level manifest, relative to the working directory.
const LEVEL_MANIFEST_PATH: &str = "assets/levels.json";

/// Fixed per-tick ordering of the gameplay systems. Input moves the
/// player, the level reacts (teleporters, carried flag), enemies act,
/// and projectiles resolve last, before presentation catches up.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Level,
    Enemies,
    Projectiles,
    Presentation,
}

pub struct RipostePlugin;

impl Plugin for RipostePlugin {
    fn build(&self, app: &mut App) {
        // State machine (StatesPlugin comes from DefaultPlugins)
        app.init_state::<AppState>();
        app.add_sub_state::<PlayingState>();

        app.configure_sets(
            Update,
            (
                GameSet::Input,
                GameSet::Level,
                GameSet::Enemies,
                GameSet::Projectiles,
            )
                .chain()
                .run_if(in_state(PlayingState::Playing)),
        );
        app.configure_sets(
            Update,
            GameSet::Presentation
                .after(GameSet::Projectiles)
                .run_if(in_state(AppState::InGame)),
        );

        // Game plugins
        app.add_plugins(CameraPlugin);
        app.add_plugins(LevelPlugin);
        app.add_plugins(MovementPlugin);
        app.add_plugins(EnemyPlugin);
        app.add_plugins(CombatPlugin);
        app.add_plugins(CapturePlugin);
        app.add_plugins(MenuPlugin);
        app.add_plugins(VictoryPlugin);

        // Level manifest is global; per-session resources are inserted
        // fresh each game start and persist through Victory for the
        // stats display.
        app.add_systems(Startup, load_manifest);
        app.add_systems(OnEnter(AppState::InGame), init_game_session);
        app.add_systems(OnExit(AppState::Victory), cleanup_game_session);

        app.add_systems(Update, quit_on_escape);
    }
}

/// Read the level manifest once at startup. A missing or malformed
/// manifest is fatal.
fn load_manifest(mut commands: Commands) {
    let manifest = LevelManifest::load(LEVEL_MANIFEST_PATH)
        .unwrap_or_else(|e| panic!("cannot start without levels: {}", e));
    info!("manifest loaded: {} levels", manifest.len());
    commands.insert_resource(manifest);
}

/// Insert per-game-session resources with fresh defaults.
fn init_game_session(mut commands: Commands) {
    commands.insert_resource(CurrentLevel(1));
    commands.insert_resource(GameStats::default());
}

/// Remove per-game-session resources when leaving the victory screen.
fn cleanup_game_session(mut commands: Commands) {
    commands.remove_resource::<CurrentLevel>();
    commands.remove_resource::<GameStats>();
}

/// Escape quits from anywhere with a clean exit code.
fn quit_on_escape(keyboard: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
