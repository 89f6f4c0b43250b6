use bevy::asset::AssetLoadFailedEvent;
use bevy::prelude::*;
use rand::Rng;
use std::collections::HashSet;

use crate::components::Cat;
use crate::config::CatsConfig;

/// Handles for the image variants plus the ids observed to fail loading.
/// A variant whose id lands in `failed` is never handed out again; the
/// factory goes straight to a glyph for it.
#[derive(Resource, Default)]
pub struct CatSprites {
    pub images: Vec<Handle<Image>>,
    pub failed: HashSet<AssetId<Image>>,
}

impl CatSprites {
    /// Picks a random still-believed-good image handle, if any.
    pub fn pick_image(&self, rng: &mut impl Rng) -> Option<Handle<Image>> {
        let good: Vec<&Handle<Image>> = self
            .images
            .iter()
            .filter(|h| !self.failed.contains(&h.id()))
            .collect();
        if good.is_empty() {
            return None;
        }
        Some(good[rng.gen_range(0..good.len())].clone())
    }
}

/// Weighted glyph size classes for the emoji fallback. The slices are not
/// uniform: a quarter small, a narrow band large, the top tail extra-large.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphSize {
    Base,
    Small,
    Large,
    ExtraLarge,
}

pub fn pick_glyph_size(r: f32) -> GlyphSize {
    if r < 0.25 {
        GlyphSize::Small
    } else if r > 0.8 && r <= 0.95 {
        GlyphSize::Large
    } else if r > 0.95 {
        GlyphSize::ExtraLarge
    } else {
        GlyphSize::Base
    }
}

impl GlyphSize {
    pub fn scale(self, cfg: &CatsConfig) -> f32 {
        match self {
            GlyphSize::Base => 1.0,
            GlyphSize::Small => cfg.sprites.glyph_small_scale,
            GlyphSize::Large => cfg.sprites.glyph_large_scale,
            GlyphSize::ExtraLarge => cfg.sprites.glyph_extra_large_scale,
        }
    }
}

/// Emoji visual for a cat whose image is unavailable: random glyph from the
/// fallback set, random weighted size variant, alpha carried over.
pub fn glyph_visual(
    cfg: &CatsConfig,
    rng: &mut impl Rng,
    base_width: f32,
    alpha: f32,
) -> (Text2d, TextFont, TextColor) {
    let glyphs = &cfg.sprites.glyph_fallback;
    let glyph = if glyphs.is_empty() {
        String::new()
    } else {
        glyphs[rng.gen_range(0..glyphs.len())].clone()
    };
    let scale = pick_glyph_size(rng.gen::<f32>()).scale(cfg);
    (
        Text2d::new(glyph),
        TextFont {
            font_size: base_width * scale,
            ..default()
        },
        TextColor(Color::WHITE.with_alpha(alpha)),
    )
}

pub struct CatAssetsPlugin;

impl Plugin for CatAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CatSprites>()
            .add_event::<AssetLoadFailedEvent<Image>>()
            .add_systems(Startup, load_cat_images)
            .add_systems(Update, watch_load_failures);
    }
}

fn load_cat_images(
    asset_server: Option<Res<AssetServer>>,
    cfg: Res<CatsConfig>,
    mut sprites: ResMut<CatSprites>,
) {
    let Some(asset_server) = asset_server else {
        return;
    };
    sprites.images = cfg
        .sprites
        .variants
        .iter()
        .map(|file| asset_server.load(format!("{}/{}", cfg.sprites.asset_dir, file)))
        .collect();
    info!(
        "loaded {} cat image variants from assets/{}",
        sprites.images.len(),
        cfg.sprites.asset_dir
    );
}

/// Folds load failures into `CatSprites.failed` and swaps every live cat
/// still showing the failed image over to an emoji glyph. No retry; one
/// failed file never affects the other variants.
fn watch_load_failures(
    mut commands: Commands,
    mut events: EventReader<AssetLoadFailedEvent<Image>>,
    cfg: Res<CatsConfig>,
    mut sprites: ResMut<CatSprites>,
    q_cats: Query<(Entity, &Sprite), With<Cat>>,
) {
    let mut rng = rand::thread_rng();
    for ev in events.read() {
        warn!("cat image {} failed to load; using emoji fallback", ev.path);
        sprites.failed.insert(ev.id);
        for (entity, sprite) in q_cats.iter() {
            if sprite.image.id() != ev.id {
                continue;
            }
            let width = sprite.custom_size.map(|s| s.x).unwrap_or(64.0);
            let alpha = sprite.color.alpha();
            commands
                .entity(entity)
                .remove::<Sprite>()
                .insert(glyph_visual(&cfg, &mut rng, width, alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn glyph_size_slices() {
        assert_eq!(pick_glyph_size(0.0), GlyphSize::Small);
        assert_eq!(pick_glyph_size(0.249), GlyphSize::Small);
        assert_eq!(pick_glyph_size(0.25), GlyphSize::Base);
        assert_eq!(pick_glyph_size(0.5), GlyphSize::Base);
        assert_eq!(pick_glyph_size(0.8), GlyphSize::Base);
        assert_eq!(pick_glyph_size(0.81), GlyphSize::Large);
        assert_eq!(pick_glyph_size(0.95), GlyphSize::Large);
        assert_eq!(pick_glyph_size(0.951), GlyphSize::ExtraLarge);
        assert_eq!(pick_glyph_size(1.0), GlyphSize::ExtraLarge);
    }

    #[test]
    fn pick_image_skips_failed_handles() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sprites = CatSprites::default();
        assert!(sprites.pick_image(&mut rng).is_none(), "empty table");

        let good: Handle<Image> = Handle::default();
        sprites.images = vec![good.clone()];
        assert!(sprites.pick_image(&mut rng).is_some());

        sprites.failed.insert(good.id());
        assert!(
            sprites.pick_image(&mut rng).is_none(),
            "all variants failed -> factory must glyph"
        );
    }

    #[test]
    fn glyph_visual_uses_fallback_set() {
        let cfg = CatsConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let (text, font, color) = glyph_visual(&cfg, &mut rng, 80.0, 0.5);
            assert!(cfg.sprites.glyph_fallback.contains(&text.0));
            assert!(font.font_size > 0.0);
            assert!((color.alpha() - 0.5).abs() < 1e-6);
        }
    }
}
