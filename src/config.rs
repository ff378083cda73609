//! Application configuration.
//!
//! The configuration is loaded from a JSON file
//! (`$XDG_CONFIG_HOME/hyprclick/config.json`).  Every key is optional and
//! falls back to its compiled-in default, so a minimal `{}` file is valid.
//!
//! # Example
//!
//! ```json
//! {
//!   "grid_size": 8,
//!   "overlay_opacity": 0.5,
//!   "grid_color": "#FFFFFF",
//!   "background_color": "#000000",
//!   "font_size": 14,
//!   "smooth_movement": true,
//!   "movement_duration": 0.2,
//!   "double_click_delay_ms": 50,
//!   "hotkeys": {
//!     "show_grid": "cmd",
//!     "dismiss_grid": "esc"
//!   }
//! }
//! ```
//!
//! The configuration is an immutable snapshot: components receive what they
//! need at construction, and a reload produces a new [`Config`].

use crate::grid::{GridError, MAX_GRID_SIZE};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid dimension `n`; the overlay shows `n × n` cells.
    ///
    /// Read as a signed number so that a negative value is rejected by
    /// [`Config::validate`] instead of failing the whole file.
    pub grid_size: i64,
    /// Opacity of the overlay background, `0.0`–`1.0`.
    pub overlay_opacity: f64,
    /// Colour of grid lines, labels, and the mode indicator.
    pub grid_color: Color,
    pub background_color: Color,
    /// Label font size in points.
    pub font_size: u32,
    /// Glide the pointer to the target instead of jumping.
    pub smooth_movement: bool,
    /// Duration of a glide, in seconds.
    pub movement_duration: f64,
    /// Pause between the two presses of a double-click, in milliseconds.
    pub double_click_delay_ms: u32,
    /// Key combos bound by the host for each command.
    pub hotkeys: HotkeyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: 8,
            overlay_opacity: 0.5,
            grid_color: Color::WHITE,
            background_color: Color::BLACK,
            font_size: 14,
            smooth_movement: true,
            movement_duration: 0.2,
            double_click_delay_ms: 50,
            hotkeys: HotkeyConfig::default(),
        }
    }
}

/// Key-combo strings for the host's global hotkeys.
///
/// hyprclick does not bind these itself; the compositor does (e.g. a
/// Hyprland `bind` that writes to the command socket).  They are kept here
/// so the whole setup lives in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub show_grid: String,
    pub dismiss_grid: String,
    pub right_click: String,
    pub middle_click: String,
    pub start_drag: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            show_grid: "cmd".into(),
            dismiss_grid: "esc".into(),
            right_click: "right cmd".into(),
            middle_click: "cmd+m".into(),
            start_drag: "cmd+d".into(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    /// Write the configuration to `path` as pretty-printed JSON, creating
    /// parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(write_err)
    }

    /// The grid dimension as a cell count, if it is within `1..=26`.
    pub fn grid_dimension(&self) -> Result<usize, GridError> {
        match usize::try_from(self.grid_size) {
            Ok(n) if (1..=MAX_GRID_SIZE).contains(&n) => Ok(n),
            _ => Err(GridError::InvalidGrid(self.grid_size)),
        }
    }

    /// Reject values the overlay cannot work with.
    ///
    /// Must pass before the overlay is ever shown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid_dimension()?;
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(ConfigError::Invalid(format!(
                "overlay_opacity must be within 0.0..=1.0, got {}",
                self.overlay_opacity
            )));
        }
        if !self.movement_duration.is_finite() || self.movement_duration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "movement_duration must be a non-negative number of seconds, got {}",
                self.movement_duration
            )));
        }
        if self.font_size == 0 {
            return Err(ConfigError::Invalid("font_size must be positive".into()));
        }
        Ok(())
    }
}

/// Error from loading, saving, or validating a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Whether the error only means that there is no file yet.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

//  Colours

/// An RGBA colour, written as `#RGB`, `#RRGGBB`, or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Components scaled to `0.0`–`1.0`, as `(r, g, b, a)`.
    pub fn to_f64(self) -> (f64, f64, f64, f64) {
        let f = |c: u8| c as f64 / 255.0;
        (f(self.r), f(self.g), f(self.b), f(self.a))
    }
}

/// Parse a hex colour string (case-insensitive, leading `#` required).
pub fn parse_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 0xFF {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_color(&s).ok_or_else(|| DeError::custom(format!("invalid colour: {:?}", s)))
    }
}
