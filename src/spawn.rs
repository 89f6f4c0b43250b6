use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;
use std::time::Duration;

use crate::assets::{glyph_visual, CatSprites};
use crate::components::{Cat, Drift, FadeIn, Lifespan, ScreenPos};
use crate::config::{CatsConfig, ValueRange};
use crate::drift::screen_to_world;
use crate::toggle::{cats_enabled, WindowVisible};

/// The single pending spawn attempt. One-shot; every fired attempt re-arms
/// it with a fresh uniform delay, so scheduling is self-perpetuating while
/// the system is enabled.
#[derive(Resource, Deref, DerefMut)]
pub struct SpawnTimer(pub Timer);

pub fn uniform(rng: &mut impl Rng, range: &ValueRange<f32>) -> f32 {
    if range.max > range.min {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

/// Resets the spawn timer with a delay drawn from `spawn.delay`.
pub fn arm(timer: &mut Timer, delay: &ValueRange<f32>, rng: &mut impl Rng) {
    let secs = uniform(rng, delay).max(0.0);
    timer.set_duration(Duration::from_secs_f32(secs));
    timer.reset();
}

/// Where a new cat enters and how fast it moves.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub from_left: bool,
}

/// Entry side uniform; x just outside the chosen edge; y uniform within the
/// vertical margins; speed and heading uniform, heading mirrored by side.
pub fn entry_kinematics(cfg: &CatsConfig, view: Vec2, rng: &mut impl Rng) -> Entry {
    let from_left = rng.gen_bool(0.5);
    let margin = cfg.drift.edge_margin;
    let x = if from_left {
        -cfg.spawn.entry_offset
    } else {
        view.x + cfg.spawn.entry_offset
    };
    let y = uniform(rng, &ValueRange::new(margin, (view.y - margin).max(margin)));

    let speed = uniform(rng, &cfg.drift.speed);
    let heading = uniform(
        rng,
        &ValueRange::new(-cfg.drift.heading_max_deg, cfg.drift.heading_max_deg),
    )
    .to_radians();
    let dir = if from_left { 1.0 } else { -1.0 };
    Entry {
        pos: Vec2::new(x, y),
        velocity: Vec2::new(heading.cos() * speed * dir, heading.sin() * speed),
        from_left,
    }
}

/// Builds one cat entity: kinematics, random footprint, image variant or
/// glyph when no variant is loadable, lifespan armed, entrance fade started.
pub fn spawn_one(
    commands: &mut Commands,
    cfg: &CatsConfig,
    sprites: &CatSprites,
    view: Vec2,
    rng: &mut impl Rng,
) -> Entity {
    let entry = entry_kinematics(cfg, view, rng);
    let width = uniform(rng, &cfg.sprites.width);
    let height = (width * uniform(rng, &cfg.sprites.aspect)).round();

    let mut entity = commands.spawn((
        Cat,
        ScreenPos(entry.pos),
        Drift::new(entry.velocity),
        Lifespan(Timer::from_seconds(cfg.lifecycle.lifespan, TimerMode::Once)),
        FadeIn(Timer::from_seconds(cfg.lifecycle.fade_in, TimerMode::Once)),
        Transform::from_translation(screen_to_world(entry.pos, view).extend(0.0)),
    ));
    match sprites.pick_image(rng) {
        Some(image) => {
            entity.insert(Sprite {
                image,
                custom_size: Some(Vec2::new(width, height)),
                color: Color::WHITE.with_alpha(0.0),
                ..default()
            });
        }
        None => {
            entity.insert(glyph_visual(cfg, rng, width, 0.0));
        }
    }
    let id = entity.id();
    debug!(
        "cat {id} enters from the {} at y={:.0}",
        if entry.from_left { "left" } else { "right" },
        entry.pos.y
    );
    id
}

fn init_spawn_timer(mut commands: Commands, cfg: Res<CatsConfig>) {
    let mut timer = Timer::from_seconds(cfg.spawn.delay.min.max(0.0), TimerMode::Once);
    arm(&mut timer, &cfg.spawn.delay, &mut rand::thread_rng());
    commands.insert_resource(SpawnTimer(timer));
}

/// Ticks the pending attempt while enabled. When it fires it always re-arms;
/// an occluded window or a full population makes the attempt a no-op.
pub fn spawn_cats(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<CatsConfig>,
    mut timer: ResMut<SpawnTimer>,
    visible: Res<WindowVisible>,
    sprites: Res<CatSprites>,
    windows: Query<&Window, With<PrimaryWindow>>,
    q_cats: Query<(), With<Cat>>,
) {
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }
    let mut rng = rand::thread_rng();
    arm(&mut timer.0, &cfg.spawn.delay, &mut rng);

    if !visible.0 {
        return;
    }
    if q_cats.iter().count() >= cfg.spawn.max_active {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let view = Vec2::new(window.width(), window.height());
    spawn_one(&mut commands, &cfg, &sprites, view, &mut rng);
}

pub struct CatSpawnPlugin;

impl Plugin for CatSpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_spawn_timer)
            .add_systems(Update, spawn_cats.run_if(cats_enabled));
    }
}
