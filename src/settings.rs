use std::fmt;
use std::path::{Path, PathBuf};

use crate::canvas::DEFAULT_TILE_SIZE;
use crate::color::Color;
use crate::view::{GAP_SIZE, MAX_VIEWPORT, MAX_ZOOM, MIN_ZOOM, PAN_SPEED, WHEEL_ZOOM_STEP, ZOOM_SENSITIVITY};

/// Largest accepted brush diameter.
pub const MAX_BRUSH_SIZE: u32 = 512;
/// Accepted tile edge range; anything outside is clamped.
pub const MIN_TILE_SIZE: u32 = 8;
pub const MAX_TILE_SIZE: u32 = 4096;

// ============================================================================
// EDITOR SETTINGS — key=value config file
// ============================================================================

/// Tunables of an editor session.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    pub tile_size: u32,
    /// Spacing between tiles, in world pixels.
    pub gap_size: u32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom factor per pixel of pinch distance change.
    pub zoom_sensitivity: f32,
    /// Zoom factor per wheel notch.
    pub wheel_zoom_step: f32,
    /// Screen pixels per keyboard pan step.
    pub pan_speed: f32,
    pub brush_size: u32,
    pub default_color: Color,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            gap_size: GAP_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
            pan_speed: PAN_SPEED,
            brush_size: 6,
            default_color: Color::RED,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/tilepaint/tilepaint.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\tilepaint\tilepaint.cfg
    /// On macOS:   ~/Library/Application Support/tilepaint/tilepaint.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
                .ok()?
                .join("tilepaint");
            return Some(config_dir.join("tilepaint.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(PathBuf::from(appdata).join("tilepaint").join("tilepaint.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("tilepaint")
                    .join("tilepaint.cfg"),
            );
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("tilepaint.cfg")))
        }
    }

    /// Load from the per-user settings file (defaults if missing or unreadable).
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Read { ref source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                crate::log_warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, self.to_config_string()).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse `key=value` lines. Unknown keys, comments and unparsable values
    /// are ignored (the default stays). The result is validated.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "tile_size" => {
                    s.tile_size = val.parse().unwrap_or(s.tile_size);
                }
                "gap_size" => {
                    s.gap_size = val.parse().unwrap_or(s.gap_size);
                }
                "min_zoom" => {
                    s.min_zoom = parse_finite(val).unwrap_or(s.min_zoom);
                }
                "max_zoom" => {
                    s.max_zoom = parse_finite(val).unwrap_or(s.max_zoom);
                }
                "zoom_sensitivity" => {
                    s.zoom_sensitivity = parse_finite(val).unwrap_or(s.zoom_sensitivity);
                }
                "wheel_zoom_step" => {
                    s.wheel_zoom_step = parse_finite(val).unwrap_or(s.wheel_zoom_step);
                }
                "pan_speed" => {
                    s.pan_speed = parse_finite(val).unwrap_or(s.pan_speed);
                }
                "brush_size" => {
                    s.brush_size = val.parse().unwrap_or(s.brush_size);
                }
                "default_color" => {
                    if let Ok(c) = Color::from_hex(val) {
                        s.default_color = c;
                    }
                }
                "viewport_width" => {
                    s.viewport_width = val.parse().unwrap_or(s.viewport_width);
                }
                "viewport_height" => {
                    s.viewport_height = val.parse().unwrap_or(s.viewport_height);
                }
                _ => {}
            }
        }
        s.validated()
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "tile_size={}\n\
             gap_size={}\n\
             min_zoom={}\n\
             max_zoom={}\n\
             zoom_sensitivity={}\n\
             wheel_zoom_step={}\n\
             pan_speed={}\n\
             brush_size={}\n\
             default_color={}\n\
             viewport_width={}\n\
             viewport_height={}\n",
            self.tile_size,
            self.gap_size,
            self.min_zoom,
            self.max_zoom,
            self.zoom_sensitivity,
            self.wheel_zoom_step,
            self.pan_speed,
            self.brush_size,
            self.default_color.to_hex(),
            self.viewport_width,
            self.viewport_height,
        )
    }

    /// Bring every value into its usable range.
    pub fn validated(mut self) -> Self {
        self.tile_size = if self.tile_size == 0 {
            DEFAULT_TILE_SIZE
        } else {
            self.tile_size.clamp(MIN_TILE_SIZE, MAX_TILE_SIZE)
        };
        if self.min_zoom > self.max_zoom {
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }
        if self.min_zoom <= 0.0 {
            self.min_zoom = MIN_ZOOM.min(self.max_zoom);
        }
        if self.max_zoom <= 0.0 {
            self.max_zoom = MAX_ZOOM;
        }
        self.brush_size = self.brush_size.clamp(1, MAX_BRUSH_SIZE);
        self.zoom_sensitivity = self.zoom_sensitivity.abs();
        self.wheel_zoom_step = self.wheel_zoom_step.abs().min(0.9);
        self.viewport_width = self.viewport_width.clamp(1, MAX_VIEWPORT);
        self.viewport_height = self.viewport_height.clamp(1, MAX_VIEWPORT);
        self
    }
}

fn parse_finite(val: &str) -> Option<f32> {
    val.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Failure reading or writing a settings file.
#[derive(Debug)]
pub enum SettingsError {
    Read { path: PathBuf, source: std::io::Error },
    Write { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Read { path, source } => {
                write!(f, "cannot read settings {}: {}", path.display(), source)
            }
            SettingsError::Write { path, source } => {
                write!(f, "cannot write settings {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Read { source, .. } | SettingsError::Write { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gives_defaults() {
        assert_eq!(EditorSettings::parse(""), EditorSettings::default());
    }

    #[test]
    fn known_keys_are_read_and_junk_ignored() {
        let s = EditorSettings::parse(
            "# comment\n\
             tile_size = 64\n\
             brush_size=12\n\
             default_color=#00ff00\n\
             pan_speed=nope\n\
             mystery=1\n\
             no separator here\n",
        );
        assert_eq!(s.tile_size, 64);
        assert_eq!(s.brush_size, 12);
        assert_eq!(s.default_color, Color::GREEN);
        assert_eq!(s.pan_speed, PAN_SPEED);
    }

    #[test]
    fn validation_fixes_bad_values() {
        let s = EditorSettings::parse("tile_size=0\nmin_zoom=5\nmax_zoom=0.5\nbrush_size=0\n");
        assert_eq!(s.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!((s.min_zoom, s.max_zoom), (0.5, 5.0));
        assert_eq!(s.brush_size, 1);

        let big = EditorSettings::parse("brush_size=100000\ntile_size=100000\n");
        assert_eq!(big.brush_size, MAX_BRUSH_SIZE);
        assert_eq!(big.tile_size, MAX_TILE_SIZE);

        let huge = EditorSettings::parse("viewport_width=4294967295\nviewport_height=0\n");
        assert_eq!((huge.viewport_width, huge.viewport_height), (MAX_VIEWPORT, 1));
    }

    #[test]
    fn config_string_reads_back() {
        let mut s = EditorSettings::default();
        s.tile_size = 128;
        s.default_color = Color::from_rgb(1, 2, 3);
        s.max_zoom = 8.0;
        assert_eq!(EditorSettings::parse(&s.to_config_string()), s);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("tilepaint-does-not-exist").join("none.cfg");
        assert!(matches!(
            EditorSettings::load_from(&path),
            Err(SettingsError::Read { .. })
        ));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("tilepaint-settings-{}", uuid::Uuid::new_v4()));
        let path = dir.join("tilepaint.cfg");
        let mut s = EditorSettings::default();
        s.brush_size = 3;
        s.save_to(&path).unwrap();
        assert_eq!(EditorSettings::load_from(&path).unwrap(), s);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
