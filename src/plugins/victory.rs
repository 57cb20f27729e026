//! Victory screen: run stats plus a prompt back to the menu.

use bevy::prelude::*;

use crate::app_state::AppState;
use crate::resources::GameStats;

pub struct VictoryPlugin;

impl Plugin for VictoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Victory), spawn_victory);
        app.add_systems(OnExit(AppState::Victory), despawn_victory);
        app.add_systems(
            Update,
            victory_input.run_if(in_state(AppState::Victory)),
        );
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct VictoryRoot;

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn spawn_victory(mut commands: Commands, stats: Res<GameStats>) {
    let lines = [
        format!("Levels Cleared: {}", stats.levels_cleared),
        format!("Enemies Destroyed: {}", stats.enemies_destroyed),
        format!("Lasers Deflected: {}", stats.lasers_deflected),
        format!("Hits Taken: {}", stats.hits_taken),
    ];

    commands
        .spawn((
            VictoryRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.02, 0.05, 0.02)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("YOU WIN"),
                TextColor(Color::srgb(0.5, 0.9, 0.5)),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
            ));

            for line in &lines {
                parent.spawn((
                    Text::new(line.clone()),
                    TextColor(Color::WHITE),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                ));
            }

            parent.spawn((
                Text::new("Press Enter to Return to Menu"),
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
            ));
        });
}

fn despawn_victory(mut commands: Commands, query: Query<Entity, With<VictoryRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn victory_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(AppState::MainMenu);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
