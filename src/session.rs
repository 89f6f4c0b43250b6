// Exits the app after `window.autoClose` seconds when > 0. Demos and CI
// runs use it; interactive sessions leave it at 0 (run indefinitely).

use bevy::prelude::*;

use crate::config::CatsConfig;

#[derive(Resource, Deref, DerefMut)]
struct SessionTimer(Timer);

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_session)
            .add_systems(Update, tick_session);
    }
}

fn setup_session(mut commands: Commands, cfg: Res<CatsConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!("session: will exit after {secs} seconds");
        commands.insert_resource(SessionTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn tick_session(
    time: Res<Time>,
    mut timer: Option<ResMut<SessionTimer>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if let Some(t) = timer.as_mut() {
        t.tick(time.delta());
        if t.just_finished() {
            info!("session: auto-close elapsed, exiting");
            ev_exit.write(AppExit::Success);
        }
    }
}
