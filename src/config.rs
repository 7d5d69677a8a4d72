//! Engine configuration.
//!
//! Holds the settings the host loop and the [`World`](crate::world::World)
//! need at startup. A config is built once, optionally loaded from an INI
//! file, and then only ever handed out by shared reference.
//!
//! # INI layout
//!
//! ```ini
//! [window]
//! title = Ambulare
//! width = 1280
//! height = 720
//! vsync = true
//! aspect_ratio_action = false
//!
//! [loop]
//! target_fps = 60
//! target_ups = 60
//! fps_report_interval = 1.0
//!
//! [camera]
//! zoom = 1.0
//! ```

use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

/// Startup defaults
const DEFAULT_WINDOW_TITLE: &str = "Ambulare";
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_ASPECT_RATIO_ACTION: bool = false;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TARGET_UPS: u32 = 60;
const DEFAULT_FPS_REPORT_INTERVAL: f32 = 1.0;
const DEFAULT_CAMERA_ZOOM: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Engine configuration.
///
/// Window, loop timing and initial camera settings. Values that fail to
/// parse or are out of range keep their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Window title.
    pub window_title: String,
    /// Pixels.
    pub window_width: u32,
    /// Pixels.
    pub window_height: u32,
    /// Vertical sync on the host window.
    pub vsync: bool,
    /// Initial aspect-ratio handling mode forwarded to the world shader.
    pub aspect_ratio_action: bool,
    /// Target frames per second when vsync is off.
    pub target_fps: u32,
    /// Target updates per second regardless of vsync.
    pub target_ups: u32,
    /// Seconds between FPS reports when reporting is enabled.
    pub fps_report_interval: f32,
    /// Initial camera zoom.
    pub camera_zoom: f32,
    /// INI file used by load and save.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Configuration with every field at its default.
    pub fn new() -> Self {
        Self {
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            vsync: DEFAULT_VSYNC,
            aspect_ratio_action: DEFAULT_ASPECT_RATIO_ACTION,
            target_fps: DEFAULT_TARGET_FPS,
            target_ups: DEFAULT_TARGET_UPS,
            fps_report_interval: DEFAULT_FPS_REPORT_INTERVAL,
            camera_zoom: DEFAULT_CAMERA_ZOOM,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Defaults, reading and writing `path` instead of `./config.ini`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Reads `config_path` and overrides every key present in it.
    ///
    /// Keys absent from the file keep their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(title) = config.get("window", "title") {
            self.window_title = title;
        }
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            if width > 0 {
                self.window_width = width as u32;
            }
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            if height > 0 {
                self.window_height = height as u32;
            }
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }
        if let Some(action) = config
            .getbool("window", "aspect_ratio_action")
            .ok()
            .flatten()
        {
            self.aspect_ratio_action = action;
        }

        // [loop] section
        if let Some(fps) = config.getuint("loop", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(ups) = config.getuint("loop", "target_ups").ok().flatten() {
            if ups > 0 {
                self.target_ups = ups as u32;
            } else {
                warn!("target_ups must be positive, keeping {}", self.target_ups);
            }
        }
        if let Some(interval) = config.getfloat("loop", "fps_report_interval").ok().flatten() {
            self.fps_report_interval = interval as f32;
        }

        // [camera] section
        if let Some(zoom) = config.getfloat("camera", "zoom").ok().flatten() {
            if zoom > 0.0 && zoom.is_finite() {
                self.camera_zoom = zoom as f32;
            } else {
                warn!("camera zoom must be positive, keeping {}", self.camera_zoom);
            }
        }

        info!(
            "Loaded config: '{}' {}x{} window, fps={}, ups={}, vsync={}",
            self.window_title,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.target_ups,
            self.vsync
        );
    }

    /// Writes every field to `config_path`, creating the file if needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "title", Some(self.window_title.clone()));
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));
        config.set(
            "window",
            "aspect_ratio_action",
            Some(self.aspect_ratio_action.to_string()),
        );

        config.set("loop", "target_fps", Some(self.target_fps.to_string()));
        config.set("loop", "target_ups", Some(self.target_ups.to_string()));
        config.set(
            "loop",
            "fps_report_interval",
            Some(self.fps_report_interval.to_string()),
        );

        config.set("camera", "zoom", Some(self.camera_zoom.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Window aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    /// Fixed simulation step in seconds.
    pub fn update_interval(&self) -> f32 {
        1.0 / self.target_ups.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_globals() {
        let config = EngineConfig::new();
        assert_eq!(config.window_title, "Ambulare");
        assert!(config.vsync);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.target_ups, 60);
        assert_eq!(config.fps_report_interval, 1.0);
    }

    #[test]
    fn load_from_str_overrides_present_keys_only() {
        let mut config = EngineConfig::new();
        config
            .load_from_str("[window]\nwidth = 800\nheight = 400\n\n[camera]\nzoom = 2.5\n")
            .unwrap();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 400);
        assert_eq!(config.camera_zoom, 2.5);
        assert_eq!(config.target_ups, 60);
        assert!((config.aspect_ratio() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let mut config = EngineConfig::new();
        config
            .load_from_str("[loop]\ntarget_ups = 0\n\n[camera]\nzoom = -1.0\n")
            .unwrap();
        assert_eq!(config.target_ups, 60);
        assert_eq!(config.camera_zoom, 1.0);
    }

    #[test]
    fn update_interval_is_inverse_ups() {
        let mut config = EngineConfig::new();
        config.target_ups = 50;
        assert!((config.update_interval() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = EngineConfig::with_path("./definitely/not/here.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config, EngineConfig::with_path("./definitely/not/here.ini"));
    }
}
