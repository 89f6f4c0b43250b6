use bevy::color::Alpha;
use bevy::prelude::*;

use crate::components::{Cat, FadeIn, FadeOut, Lifespan};
use crate::config::CatsConfig;

/// Alpha of whichever visual the cat carries (image sprite or glyph).
pub fn visual_alpha(sprite: Option<&Sprite>, text: Option<&TextColor>) -> f32 {
    if let Some(s) = sprite {
        s.color.alpha()
    } else if let Some(t) = text {
        t.0.alpha()
    } else {
        1.0
    }
}

fn apply_alpha(sprite: Option<Mut<Sprite>>, text: Option<Mut<TextColor>>, alpha: f32) {
    if let Some(mut s) = sprite {
        s.color.set_alpha(alpha);
    }
    if let Some(mut t) = text {
        t.0.set_alpha(alpha);
    }
}

/// Ticks each cat's wandering duration; expiry starts the removal fade.
/// Cats already fading are filtered out, so a second expiry cannot happen.
pub fn expire_cats(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<CatsConfig>,
    mut q_cats: Query<
        (Entity, &mut Lifespan, Option<&Sprite>, Option<&TextColor>),
        (With<Cat>, Without<FadeOut>),
    >,
) {
    for (entity, mut lifespan, sprite, text) in &mut q_cats {
        lifespan.tick(time.delta());
        if lifespan.just_finished() {
            let from = visual_alpha(sprite, text);
            commands
                .entity(entity)
                .insert(FadeOut::new(cfg.lifecycle.fade_out, from));
            debug!("cat {entity} wandered its full lifespan; fading out");
        }
    }
}

/// Entrance fade: alpha ramps 0 -> 1; the component is dropped when done.
/// A cat already fading out keeps its removal ramp instead.
pub fn fade_in_cats(
    mut commands: Commands,
    time: Res<Time>,
    mut q_cats: Query<
        (Entity, &mut FadeIn, Option<&mut Sprite>, Option<&mut TextColor>),
        Without<FadeOut>,
    >,
) {
    for (entity, mut fade, sprite, text) in &mut q_cats {
        fade.tick(time.delta());
        apply_alpha(sprite, text, fade.fraction());
        if fade.finished() {
            commands.entity(entity).remove::<FadeIn>();
        }
    }
}

/// Removal fade: alpha ramps from its captured start down to zero, then the
/// entity is despawned. Exactly one removal per cat; the `FadeOut` component
/// is only ever inserted through `Without<FadeOut>` filters.
pub fn fade_out_cats(
    mut commands: Commands,
    time: Res<Time>,
    mut q_cats: Query<(
        Entity,
        &mut FadeOut,
        Option<&mut Sprite>,
        Option<&mut TextColor>,
    )>,
) {
    for (entity, mut fade, sprite, text) in &mut q_cats {
        fade.timer.tick(time.delta());
        let alpha = fade.from * (1.0 - fade.timer.fraction());
        apply_alpha(sprite, text, alpha);
        if fade.timer.just_finished() {
            commands.entity(entity).despawn();
            debug!("cat {entity} removed");
        }
    }
}

pub struct CatLifecyclePlugin;

impl Plugin for CatLifecyclePlugin {
    fn build(&self, app: &mut App) {
        // Deliberately not gated on the enabled flag: disabling must still
        // drain the population through its fade.
        app.add_systems(Update, (expire_cats, fade_in_cats, fade_out_cats).chain());
    }
}
