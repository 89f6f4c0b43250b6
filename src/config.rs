use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}
impl<T> ValueRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Cat Drift".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    /// Uniform inter-arrival delay for spawn attempts, seconds.
    pub delay: ValueRange<f32>,
    /// Population cap checked before every spawn decision.
    pub max_active: usize,
    /// How far beyond the side edge a new cat starts, pixels.
    pub entry_offset: f32,
}
impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            delay: ValueRange::new(3.0, 4.2),
            max_active: 5,
            entry_offset: 70.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DriftConfig {
    /// Initial speed magnitude, px/s.
    pub speed: ValueRange<f32>,
    /// Initial heading off the horizontal, degrees either way.
    pub heading_max_deg: f32,
    /// Per-axis random acceleration bound, px/s^2.
    pub jitter: f32,
    /// Inset from the window edges the wander area keeps clear.
    pub edge_margin: f32,
    /// Nominal sprite footprint subtracted from the far clamp bound.
    pub clamp_footprint: f32,
}
impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            speed: ValueRange::new(40.0, 120.0),
            heading_max_deg: 60.0,
            jitter: 10.0,
            edge_margin: 40.0,
            clamp_footprint: 60.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Wandering duration before a cat fades away, seconds.
    pub lifespan: f32,
    /// Entrance fade, seconds.
    pub fade_in: f32,
    /// Removal fade, seconds.
    pub fade_out: f32,
}
impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            lifespan: 10.0,
            fade_in: 0.4,
            fade_out: 0.4,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpriteConfig {
    /// Directory under `assets/` holding the image variants.
    pub asset_dir: String,
    /// Image filenames, one picked uniformly per spawn.
    pub variants: Vec<String>,
    /// Glyphs substituted when an image fails to load.
    pub glyph_fallback: Vec<String>,
    /// Sprite width, pixels.
    pub width: ValueRange<f32>,
    /// Height as a fraction of width.
    pub aspect: ValueRange<f32>,
    /// Scale applied to a fallback glyph drawn in the `small` variant.
    pub glyph_small_scale: f32,
    pub glyph_large_scale: f32,
    pub glyph_extra_large_scale: f32,
}
impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            asset_dir: "cats".into(),
            variants: (1..=7).map(|i| format!("gif{i}.webp")).collect(),
            glyph_fallback: [
                "\u{1F431}",
                "\u{1F638}",
                "\u{1F639}",
                "\u{1F63A}",
                "\u{1F63B}",
                "\u{1F63C}",
                "\u{1F640}",
                "\u{1F63F}",
                "\u{1F63E}",
                "\u{1F408}",
                "\u{1F408}\u{200D}\u{2B1B}",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            width: ValueRange::new(56.0, 100.0),
            aspect: ValueRange::new(0.8, 1.2),
            glyph_small_scale: 0.6,
            glyph_large_scale: 1.5,
            glyph_extra_large_scale: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct CatsConfig {
    pub window: WindowConfig,
    pub spawn: SpawnConfig,
    pub drift: DriftConfig,
    pub lifecycle: LifecycleConfig,
    pub sprites: SpriteConfig,
    /// Whether the animation starts enabled; Ctrl+Alt+C flips it at runtime.
    pub start_enabled: bool,
}
impl Default for CatsConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            spawn: Default::default(),
            drift: Default::default(),
            lifecycle: Default::default(),
            sprites: Default::default(),
            start_enabled: true,
        }
    }
}

impl CatsConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple config layers, later files overriding earlier ones (shallow & deep merge).
    /// Missing files are skipped; returns (config, list_of_layer_paths_used, list_of_errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        let mut replaced = false;
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                let val = incoming.take().unwrap();
                                merge_value(ev, val);
                                replaced = true;
                                break;
                            }
                        }
                        if !replaced {
                            bm.insert(k, incoming.unwrap());
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        if let Some(val) = merged {
            match val.clone().into_rust::<CatsConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => (CatsConfig::default(), used, {
                    let mut evec = errors;
                    evec.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    evec
                }),
            }
        } else {
            (CatsConfig::default(), used, errors)
        }
    }

    /// Validate the configuration returning a list of human-readable warning strings.
    /// These represent suspicious / potentially unintended values but are not hard errors.
    /// Call at startup and log each warning with `warn!`.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        fn check_range_f32(w: &mut Vec<String>, label: &str, r: &ValueRange<f32>) {
            if r.min > r.max {
                w.push(format!(
                    "{label} min ({}) greater than max ({})",
                    r.min, r.max
                ));
            }
        }
        check_range_f32(&mut w, "spawn.delay", &self.spawn.delay);
        if self.spawn.delay.min < 0.0 {
            w.push("spawn.delay.min must be >= 0".into());
        }
        if self.spawn.max_active == 0 {
            w.push("spawn.max_active is 0; nothing will spawn".into());
        }
        if self.spawn.max_active > 100 {
            w.push(format!(
                "spawn.max_active {} very high for an ambient effect",
                self.spawn.max_active
            ));
        }
        if self.spawn.entry_offset < 0.0 {
            w.push("spawn.entry_offset negative -> cats appear inside the window".into());
        }
        check_range_f32(&mut w, "drift.speed", &self.drift.speed);
        if self.drift.speed.min < 0.0 {
            w.push("drift.speed.min must be >= 0".into());
        }
        if !(0.0..=90.0).contains(&self.drift.heading_max_deg) {
            w.push(format!(
                "drift.heading_max_deg {} outside 0..90; entry direction may point backwards",
                self.drift.heading_max_deg
            ));
        }
        if self.drift.jitter < 0.0 {
            w.push("drift.jitter negative".into());
        }
        if self.drift.edge_margin < 0.0 {
            w.push("drift.edge_margin negative".into());
        }
        let usable_w =
            self.window.width - 2.0 * self.drift.edge_margin - self.drift.clamp_footprint;
        let usable_h =
            self.window.height - 2.0 * self.drift.edge_margin - self.drift.clamp_footprint;
        if usable_w <= 0.0 || usable_h <= 0.0 {
            w.push(format!(
                "margins leave no wander area ({usable_w}x{usable_h}); cats will pin to a corner"
            ));
        }
        if self.lifecycle.lifespan <= 0.0 {
            w.push("lifecycle.lifespan must be > 0".into());
        }
        if self.lifecycle.fade_in < 0.0 || self.lifecycle.fade_out < 0.0 {
            w.push("lifecycle fade durations must be >= 0".into());
        }
        if self.sprites.variants.is_empty() && self.sprites.glyph_fallback.is_empty() {
            w.push("sprites: no image variants and no glyph fallback; cats have no visual".into());
        }
        check_range_f32(&mut w, "sprites.width", &self.sprites.width);
        if self.sprites.width.min <= 0.0 {
            w.push("sprites.width.min must be > 0".into());
        }
        check_range_f32(&mut w, "sprites.aspect", &self.sprites.aspect);
        if self.sprites.aspect.min <= 0.0 {
            w.push("sprites.aspect.min must be > 0".into());
        }
        for (label, s) in [
            ("glyph_small_scale", self.sprites.glyph_small_scale),
            ("glyph_large_scale", self.sprites.glyph_large_scale),
            (
                "glyph_extra_large_scale",
                self.sprites.glyph_extra_large_scale,
            ),
        ] {
            if s <= 0.0 {
                w.push(format!("sprites.{label} must be > 0"));
            }
        }
        w
    }
}
