//! Main menu UI: title screen with a blinking start prompt.

use bevy::prelude::*;

use crate::app_state::AppState;

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::MainMenu), spawn_menu);
        app.add_systems(OnExit(AppState::MainMenu), despawn_menu);
        app.add_systems(
            Update,
            (menu_input, blink_prompt).run_if(in_state(AppState::MainMenu)),
        );
    }
}

/// Blink period of the start prompt in seconds.
const BLINK_INTERVAL: f32 = 0.5;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct MenuRoot;

#[derive(Component)]
pub struct BlinkingPrompt;

#[derive(Resource, Deref, DerefMut)]
pub struct BlinkTimer(pub Timer);

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn spawn_menu(mut commands: Commands) {
    commands.insert_resource(BlinkTimer(Timer::from_seconds(
        BLINK_INTERVAL,
        TimerMode::Repeating,
    )));

    commands
        .spawn((
            MenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.02, 0.02, 0.06)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("RIPOSTE"),
                TextColor(Color::srgb(0.2, 0.7, 1.0)),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("Bring a sword to a laser fight"),
                TextColor(Color::srgb(0.7, 0.7, 0.8)),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
            ));
            parent.spawn((
                BlinkingPrompt,
                Text::new("Press Any Key to Start"),
                TextColor(Color::srgb(1.0, 1.0, 1.0)),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
            ));
        });
}

fn despawn_menu(mut commands: Commands, query: Query<Entity, With<MenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<BlinkTimer>();
}

/// Any key starts the game; Escape is handled by the global quit system.
fn menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let pressed = keyboard
        .get_just_pressed()
        .any(|key| *key != KeyCode::Escape);
    if pressed {
        next_state.set(AppState::InGame);
    }
}

/// Toggle prompt visibility every half second.
fn blink_prompt(
    time: Res<Time>,
    mut timer: ResMut<BlinkTimer>,
    mut prompt: Query<&mut Visibility, With<BlinkingPrompt>>,
) {
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }
    for mut visibility in &mut prompt {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Inherited,
            _ => Visibility::Hidden,
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
