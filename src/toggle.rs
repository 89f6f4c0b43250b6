use bevy::prelude::*;
use bevy::window::WindowOccluded;

use crate::components::{Cat, FadeOut};
use crate::config::CatsConfig;
use crate::lifecycle::visual_alpha;
use crate::spawn::{arm, SpawnTimer};

/// Global animation switch, flipped by Ctrl+Alt+C.
#[derive(Resource, Debug)]
pub struct CatsEnabled(pub bool);

/// Whether the window is currently visible to the user. Folded from
/// occlusion events and polled at each spawn decision; it never interrupts
/// in-flight physics or fades.
#[derive(Resource, Debug)]
pub struct WindowVisible(pub bool);

/// Run condition for everything that stops while the animation is off.
pub fn cats_enabled(enabled: Res<CatsEnabled>) -> bool {
    enabled.0
}

pub fn chord_pressed(keys: &ButtonInput<KeyCode>) -> bool {
    let ctrl = keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight);
    let alt = keys.pressed(KeyCode::AltLeft) || keys.pressed(KeyCode::AltRight);
    ctrl && alt && keys.just_pressed(KeyCode::KeyC)
}

fn init_toggle_state(mut commands: Commands, cfg: Res<CatsConfig>) {
    commands.insert_resource(CatsEnabled(cfg.start_enabled));
    commands.insert_resource(WindowVisible(true));
}

/// Flips the global flag on the chord. Disabling starts a fade on every cat
/// not already mid-fade; enabling re-arms the spawn timer so exactly one
/// attempt is pending.
pub fn toggle_cats(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<CatsConfig>,
    mut enabled: ResMut<CatsEnabled>,
    mut timer: ResMut<SpawnTimer>,
    q_cats: Query<(Entity, Option<&Sprite>, Option<&TextColor>), (With<Cat>, Without<FadeOut>)>,
) {
    if !chord_pressed(&keys) {
        return;
    }
    enabled.0 = !enabled.0;
    if enabled.0 {
        info!("cat drift enabled");
        arm(&mut timer.0, &cfg.spawn.delay, &mut rand::thread_rng());
    } else {
        info!("cat drift disabled; fading {} cats", q_cats.iter().count());
        for (entity, sprite, text) in &q_cats {
            commands
                .entity(entity)
                .insert(FadeOut::new(cfg.lifecycle.fade_out, visual_alpha(sprite, text)));
        }
    }
}

pub fn track_window_occlusion(
    mut events: EventReader<WindowOccluded>,
    mut visible: ResMut<WindowVisible>,
) {
    for ev in events.read() {
        visible.0 = !ev.occluded;
    }
}

pub struct CatTogglePlugin;

impl Plugin for CatTogglePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WindowOccluded>()
            .add_systems(Startup, init_toggle_state)
            .add_systems(Update, (toggle_cats, track_window_occlusion));
    }
}
