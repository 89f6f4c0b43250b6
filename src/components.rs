use bevy::prelude::*;

/// Marker for a live floating cat. Membership of `With<Cat>` queries is the
/// sole authority for "still animating"; the spawn decision counts it.
#[derive(Component)]
pub struct Cat;

/// Position in window pixel coordinates, origin top-left, y down.
/// `sync_transforms` maps it into the render transform whenever it changes.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct ScreenPos(pub Vec2);

/// Wander state: velocity in px/s plus the elapsed-time stamp of the last
/// step. `last_step` starts `None`; the first step only records the stamp.
#[derive(Component, Debug)]
pub struct Drift {
    pub velocity: Vec2,
    pub last_step: Option<f32>,
}

impl Drift {
    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            last_step: None,
        }
    }
}

/// One-shot wandering duration armed at creation; expiry starts the fade.
#[derive(Component, Deref, DerefMut)]
pub struct Lifespan(pub Timer);

/// Entrance fade; alpha ramps 0 -> 1, removed when finished.
#[derive(Component, Deref, DerefMut)]
pub struct FadeIn(pub Timer);

/// Removal fade. Presence of this component IS the write-once `removing`
/// flag: it gates further physics steps and duplicate removal attempts.
/// `from` is the alpha at fade start so an interrupted entrance fades from
/// where it was. The entity despawns when the timer finishes.
#[derive(Component)]
pub struct FadeOut {
    pub timer: Timer,
    pub from: f32,
}

impl FadeOut {
    pub fn new(duration_secs: f32, from: f32) -> Self {
        Self {
            timer: Timer::from_seconds(duration_secs, TimerMode::Once),
            from,
        }
    }
}
