use bevy::prelude::*;

use crate::assets::CatAssetsPlugin;
use crate::camera::CameraPlugin;
use crate::debug::DebugPlugin;
use crate::drift::DriftPlugin;
use crate::lifecycle::CatLifecyclePlugin;
use crate::session::SessionPlugin;
use crate::spawn::CatSpawnPlugin;
use crate::toggle::CatTogglePlugin;

pub struct CatDriftPlugin;

impl Plugin for CatDriftPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            CameraPlugin,
            CatAssetsPlugin,
            CatTogglePlugin,
            CatSpawnPlugin,
            DriftPlugin,
            CatLifecyclePlugin,
            SessionPlugin,
            DebugPlugin,
        ));
    }
}
