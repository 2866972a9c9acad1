use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Half the length of one side; the room spans `[-half_extent, half_extent]`.
    pub half_extent: f32,
    pub wall_height: f32,
    /// How close the viewpoint may get to a wall.
    pub clamp_pad: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            half_extent: 8.0,
            wall_height: 3.5,
            clamp_pad: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye_height: f32,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye_height: 1.6,
            fov_y_deg: 75.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distance travelled per frame while a move key is held.
    pub speed: f32,
    /// Radians turned per frame while a turn key is held.
    pub turn_rate: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 0.05,
            turn_rate: 0.03,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
    /// North, east, south, west.
    pub wall_textures: [String; 4],
    pub wall_labels: [String; 4],
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            wall_textures: [
                "wall_texture_1.jpg".into(),
                "wall_texture_2.jpg".into(),
                "wall_texture_3.jpg".into(),
                "wall_texture_4.jpg".into(),
            ],
            wall_labels: [
                "Birth".into(),
                "Enlightenment".into(),
                "First Sermon".into(),
                "Parinirvana".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub track: PathBuf,
    pub volume: f32,
    pub volume_step: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            track: PathBuf::from("assets/ambient.mp3"),
            volume: 0.5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub room: RoomConfig,
    pub camera: CameraConfig,
    pub movement: MovementConfig,
    pub assets: AssetConfig,
    pub audio: AudioConfig,
}

impl GalleryConfig {
    pub fn wall_texture_path(&self, wall: usize) -> Option<PathBuf> {
        self.assets
            .wall_textures
            .get(wall)
            .map(|file| self.assets.dir.join(file))
    }

    pub fn from_toml(txt: &str) -> Result<Self> {
        let parsed: GalleryConfig = toml::from_str(txt).context("parse gallery TOML")?;
        Ok(sanitize(parsed))
    }
}

fn default_path() -> PathBuf {
    if let Ok(path) = std::env::var("GALLERY_CONFIG") {
        return PathBuf::from(path);
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/gallery.toml")
}

/// Load the gallery config from the default location, applying env overrides.
pub fn load_default() -> Result<GalleryConfig> {
    let path = default_path();
    let mut cfg = if path.is_file() {
        info!("loading config from {}", path.display());
        let txt =
            std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        GalleryConfig::from_toml(&txt)?
    } else {
        info!("no config at {}, using defaults", path.display());
        GalleryConfig::default()
    };

    if let Ok(v) = std::env::var("GALLERY_SPEED") {
        if let Ok(speed) = v.parse() {
            cfg.movement.speed = speed;
        }
    }
    if let Ok(v) = std::env::var("GALLERY_TURN_RATE") {
        if let Ok(rate) = v.parse() {
            cfg.movement.turn_rate = rate;
        }
    }
    if let Ok(v) = std::env::var("GALLERY_VOLUME") {
        if let Ok(volume) = v.parse() {
            cfg.audio.volume = volume;
        }
    }
    Ok(sanitize(cfg))
}

fn positive_or(value: f32, fallback: f32, name: &str) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("ignoring invalid {name} {value}, using {fallback}");
        fallback
    }
}

fn sanitize(mut cfg: GalleryConfig) -> GalleryConfig {
    let defaults = GalleryConfig::default();

    cfg.room.half_extent = positive_or(cfg.room.half_extent, defaults.room.half_extent, "half_extent");
    cfg.room.wall_height = positive_or(cfg.room.wall_height, defaults.room.wall_height, "wall_height");
    // The legal range must stay non-empty.
    if !cfg.room.clamp_pad.is_finite() {
        cfg.room.clamp_pad = 0.0;
    }
    cfg.room.clamp_pad = cfg.room.clamp_pad.clamp(0.0, cfg.room.half_extent);

    cfg.camera.eye_height = positive_or(cfg.camera.eye_height, defaults.camera.eye_height, "eye_height");
    cfg.camera.fov_y_deg = positive_or(cfg.camera.fov_y_deg, defaults.camera.fov_y_deg, "fov_y_deg").min(179.0);
    cfg.camera.near = positive_or(cfg.camera.near, defaults.camera.near, "near");
    if !(cfg.camera.far > cfg.camera.near) {
        warn!("far plane {} not beyond near plane {}", cfg.camera.far, cfg.camera.near);
        cfg.camera.far = cfg.camera.near + defaults.camera.far;
    }

    cfg.movement.speed = positive_or(cfg.movement.speed, defaults.movement.speed, "speed");
    cfg.movement.turn_rate = positive_or(cfg.movement.turn_rate, defaults.movement.turn_rate, "turn_rate");

    if !cfg.audio.volume.is_finite() {
        cfg.audio.volume = defaults.audio.volume;
    }
    cfg.audio.volume = cfg.audio.volume.clamp(0.0, 1.0);
    cfg.audio.volume_step = positive_or(cfg.audio.volume_step, defaults.audio.volume_step, "volume_step");
    cfg
}
