pub mod app;
pub mod assets;
pub mod camera;
pub mod components;
pub mod config;
pub mod debug;
pub mod drift;
pub mod lifecycle;
pub mod session;
pub mod spawn;
pub mod toggle;

// Curated re-exports
pub use app::CatDriftPlugin;
pub use components::{Cat, Drift, FadeIn, FadeOut, Lifespan, ScreenPos};
pub use config::{CatsConfig, WindowConfig};
