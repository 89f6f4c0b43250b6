#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
use crate::components::{Cat, FadeOut};
#[cfg(feature = "debug")]
use crate::toggle::{CatsEnabled, WindowVisible};

#[cfg(feature = "debug")]
#[derive(Resource)]
struct TraceState {
    accum: f32,
    interval: f32,
}

#[cfg(feature = "debug")]
fn trace_population(
    time: Res<Time>,
    mut state: ResMut<TraceState>,
    enabled: Option<Res<CatsEnabled>>,
    visible: Option<Res<WindowVisible>>,
    q_cats: Query<Option<&FadeOut>, With<Cat>>,
) {
    state.accum += time.delta_secs();
    if state.accum < state.interval {
        return;
    }
    state.accum = 0.0;
    let total = q_cats.iter().count();
    let fading = q_cats.iter().filter(|f| f.is_some()).count();
    debug!(
        "CATS t={:.1}s active={} fading={} enabled={} visible={}",
        time.elapsed_secs(),
        total,
        fading,
        enabled.map(|e| e.0).unwrap_or(true),
        visible.map(|v| v.0).unwrap_or(true),
    );
}

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    #[cfg(feature = "debug")]
    fn build(&self, app: &mut App) {
        app.insert_resource(TraceState {
            accum: 0.0,
            interval: 5.0,
        })
        .add_systems(Update, trace_population);
    }

    #[cfg(not(feature = "debug"))]
    fn build(&self, _app: &mut App) {}
}
