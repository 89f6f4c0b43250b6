use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
    }
}

// Required Components fill in the rest of the 2D camera.
fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
