//! Integration tests for state transitions and the shipped level set.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use riposte::app_state::{AppState, PlayingState};
use riposte::plugins::level::ParsedLevel;
use riposte::resources::{CurrentLevel, GameStats, LevelManifest};

fn setup_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.init_state::<AppState>();
    app.add_sub_state::<PlayingState>();
    app.insert_resource(CurrentLevel(1));
    app.init_resource::<GameStats>();
    app
}

fn transition_to(app: &mut App, state: AppState) {
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(state);
    for _ in 0..5 {
        app.update();
    }
}

#[test]
fn app_boots_into_main_menu() {
    let mut app = setup_app();
    app.update();
    let state = app.world().resource::<State<AppState>>();
    assert_eq!(*state.get(), AppState::MainMenu);
    // The playing sub-state does not exist outside InGame.
    assert!(app.world().get_resource::<State<PlayingState>>().is_none());
}

#[test]
fn entering_the_game_starts_in_loading() {
    let mut app = setup_app();
    transition_to(&mut app, AppState::InGame);

    let state = app.world().resource::<State<AppState>>();
    assert_eq!(*state.get(), AppState::InGame);
    let playing = app.world().resource::<State<PlayingState>>();
    assert_eq!(*playing.get(), PlayingState::Loading);
}

#[test]
fn victory_to_main_menu_transition() {
    let mut app = setup_app();
    transition_to(&mut app, AppState::InGame);
    transition_to(&mut app, AppState::Victory);
    assert_eq!(
        *app.world().resource::<State<AppState>>().get(),
        AppState::Victory
    );

    transition_to(&mut app, AppState::MainMenu);
    assert_eq!(
        *app.world().resource::<State<AppState>>().get(),
        AppState::MainMenu
    );
}

#[test]
fn stats_accumulate() {
    let mut stats = GameStats::default();
    stats.enemies_destroyed += 1;
    stats.lasers_deflected += 2;
    stats.enemies_destroyed += 1;
    assert_eq!(stats.enemies_destroyed, 2);
    assert_eq!(stats.lasers_deflected, 2);
}

#[test]
fn shipped_manifest_forms_a_valid_progression() {
    let manifest = LevelManifest::load("assets/levels.json").unwrap();
    assert!(manifest.len() >= 1);

    for number in 1..=manifest.len() {
        let entry = manifest.level(number).unwrap();
        let text = std::fs::read_to_string(&entry.map).unwrap_or_else(|e| {
            panic!("map file {} missing for level {}: {}", entry.map, number, e)
        });
        let parsed = ParsedLevel::parse(&text)
            .unwrap_or_else(|e| panic!("map {} failed to parse: {}", entry.map, e));
        assert!(parsed.player_spawn().is_some(), "{} has no player", entry.map);
    }
}
