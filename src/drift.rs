use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::components::{Cat, Drift, FadeOut, ScreenPos};
use crate::config::{CatsConfig, ValueRange};
use crate::spawn::uniform;
use crate::toggle::CatsEnabled;

/// Maps the top-left y-down screen frame into Bevy's centered y-up world.
pub fn screen_to_world(pos: Vec2, view: Vec2) -> Vec2 {
    Vec2::new(pos.x - view.x * 0.5, view.y * 0.5 - pos.y)
}

/// Axis-aligned wander area: `[margin, dim - margin - footprint]` per axis.
#[derive(Debug, Clone, Copy)]
pub struct WanderBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WanderBounds {
    pub fn of(view: Vec2, margin: f32, footprint: f32) -> Self {
        let min = Vec2::splat(margin);
        Self {
            min,
            max: (view - Vec2::splat(margin + footprint)).max(min),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StepOutcome {
    pub bounced_x: bool,
    pub bounced_y: bool,
}

/// One wander step: jittered acceleration, integration, clamp-and-reflect.
/// Clamping to the low bound forces the velocity component positive, the
/// high bound negative; magnitude is preserved either way.
pub fn advance(
    pos: &mut Vec2,
    vel: &mut Vec2,
    jitter: Vec2,
    dt: f32,
    bounds: &WanderBounds,
) -> StepOutcome {
    vel.x += jitter.x * dt;
    vel.y += jitter.y * dt;

    pos.x += vel.x * dt;
    pos.y += vel.y * dt;

    let mut out = StepOutcome::default();
    if pos.x < bounds.min.x {
        pos.x = bounds.min.x;
        vel.x = vel.x.abs();
        out.bounced_x = true;
    } else if pos.x > bounds.max.x {
        pos.x = bounds.max.x;
        vel.x = -vel.x.abs();
        out.bounced_x = true;
    }
    if pos.y < bounds.min.y {
        pos.y = bounds.min.y;
        vel.y = vel.y.abs();
        out.bounced_y = true;
    } else if pos.y > bounds.max.y {
        pos.y = bounds.max.y;
        vel.y = -vel.y.abs();
        out.bounced_y = true;
    }
    out
}

/// Advances every active, non-fading cat once per frame. Window dimensions
/// are read fresh each frame so a resize just re-clamps on the next step.
/// The first step of a cat only records its timestamp.
pub fn step_cats(
    time: Res<Time>,
    cfg: Res<CatsConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut q_cats: Query<(&mut ScreenPos, &mut Drift), (With<Cat>, Without<FadeOut>)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let view = Vec2::new(window.width(), window.height());
    let bounds = WanderBounds::of(view, cfg.drift.edge_margin, cfg.drift.clamp_footprint);
    let jitter_range = ValueRange::new(-cfg.drift.jitter, cfg.drift.jitter);
    let now = time.elapsed_secs();
    let mut rng = rand::thread_rng();

    for (mut pos, mut drift) in &mut q_cats {
        let Some(last) = drift.last_step else {
            drift.last_step = Some(now);
            continue;
        };
        let dt = now - last;
        drift.last_step = Some(now);
        if dt <= 0.0 {
            continue;
        }

        let jitter = Vec2::new(uniform(&mut rng, &jitter_range), uniform(&mut rng, &jitter_range));
        let mut p = pos.0;
        let mut v = drift.velocity;
        advance(&mut p, &mut v, jitter, dt, &bounds);
        pos.0 = p;
        drift.velocity = v;
    }
}

/// Run condition for the stepper: enabled and at least one cat alive.
pub fn stepper_active(enabled: Res<CatsEnabled>, q_cats: Query<(), With<Cat>>) -> bool {
    enabled.0 && !q_cats.is_empty()
}

/// Writes changed screen positions to the render transform.
pub fn sync_transforms(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut q_cats: Query<(&ScreenPos, &mut Transform), (With<Cat>, Changed<ScreenPos>)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let view = Vec2::new(window.width(), window.height());
    for (pos, mut transform) in &mut q_cats {
        let world = screen_to_world(pos.0, view);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

pub struct DriftPlugin;

impl Plugin for DriftPlugin {
    fn build(&self, app: &mut App) {
        // The stepper idles whenever the population is empty or the system
        // is toggled off; the next successful spawn brings it back.
        app.add_systems(
            Update,
            (
                step_cats.run_if(stepper_active),
                sync_transforms,
            )
                .chain(),
        );
    }
}
