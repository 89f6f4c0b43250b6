use std::path::{Path, PathBuf};

use anyhow::bail;
use bevy::prelude::*;
use clap::Parser;

use cat_drift::{CatDriftPlugin, CatsConfig};

#[derive(Parser, Debug)]
#[command(name = "cat_drift", about = "Floating ambient cat sprites for your desktop")]
struct Cli {
    /// Extra config layer applied over the defaults and the local overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Exit automatically after this many seconds (overrides the config).
    #[arg(long)]
    auto_close: Option<f32>,
    /// Start with the animation disabled; Ctrl+Alt+C turns it on.
    #[arg(long)]
    start_disabled: bool,
}

/// Layer bookkeeping carried into the app so it can be logged once the
/// log plugin is up.
#[derive(Resource)]
struct ConfigReport {
    layers_used: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn report_config(report: Res<ConfigReport>) {
    for layer in &report.layers_used {
        info!("config layer: {layer}");
    }
    for err in &report.errors {
        warn!("config: {err}");
    }
    for w in &report.warnings {
        warn!("config: {w}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut layers = vec![PathBuf::from("assets/config/cats.ron")];
    let local = PathBuf::from("assets/config/cats.local.ron");
    if local.exists() {
        layers.push(local);
    }
    if let Some(extra) = &cli.config {
        layers.push(extra.clone());
    }
    let (mut cfg, layers_used, errors) = CatsConfig::load_layered(&layers);
    if let Some(extra) = &cli.config {
        let loaded = layers_used.iter().any(|u| Path::new(u) == extra.as_path());
        if !loaded {
            bail!("requested config layer {} could not be loaded", extra.display());
        }
    }

    if let Some(secs) = cli.auto_close {
        cfg.window.auto_close = secs;
    }
    if cli.start_disabled {
        cfg.start_enabled = false;
    }
    let warnings = cfg.validate();

    App::new()
        .insert_resource(ConfigReport {
            layers_used,
            errors,
            warnings,
        })
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: cfg.window.title.clone(),
                    resolution: (cfg.window.width, cfg.window.height).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
        )
        .insert_resource(cfg)
        .add_systems(Startup, report_config)
        .add_plugins(CatDriftPlugin)
        .run();

    Ok(())
}
