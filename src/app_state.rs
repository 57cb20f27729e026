use bevy::prelude::*;

/// Top-level application flow: title screen, the game itself, and the
/// victory screen shown after the last level (or a flag capture).
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    MainMenu,
    InGame,
    Victory,
}

/// Sub-state that only exists while `AppState::InGame` is active.
///
/// `Loading` reads and spawns the current level, `Playing` runs the
/// gameplay systems, and `Transition` tears the level down before the
/// next one loads (or the run ends).
#[derive(SubStates, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[source(AppState = AppState::InGame)]
pub enum PlayingState {
    #[default]
    Loading,
    Playing,
    Transition,
}
