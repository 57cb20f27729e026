use bevy::prelude::*;

use super::level::GridWorld;
use crate::components::TILE_SIZE;
use crate::GameSet;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
        app.add_systems(Update, fit_camera_to_level.in_set(GameSet::Presentation));
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Scale the camera so the whole level fits with some padding.
fn fit_camera_to_level(
    grid: Option<Res<GridWorld>>,
    windows: Query<&Window>,
    mut cameras: Query<&mut Projection, With<Camera2d>>,
) {
    let Some(grid) = grid else { return };
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok(mut projection) = cameras.single_mut() else {
        return;
    };

    let level_width = (grid.width * TILE_SIZE) as f32;
    let level_height = (grid.height * TILE_SIZE) as f32;

    let padding = TILE_SIZE as f32 * 2.0;
    let total_width = level_width + padding;
    let total_height = level_height + padding;

    let scale_x = total_width / window.width();
    let scale_y = total_height / window.height();

    if let Projection::Orthographic(ref mut ortho) = *projection {
        ortho.scale = scale_x.max(scale_y);
    }
}
