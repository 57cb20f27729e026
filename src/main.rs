use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Riposte".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(riposte::RipostePlugin)
        .run();
}
