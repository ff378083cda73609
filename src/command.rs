//! Commands and types used throughout hyprclick.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every input the selection state machine reacts
//! to, and [`KeySymbol`] / [`MouseButton`] / [`ActionMode`] /
//! [`ScreenGeometry`] / [`Point`] provide the supporting data types.
//!
//! Host commands arrive as JSON over the command socket; key symbols can
//! arrive either from the overlay window or over the same socket
//! (e.g. `{"Key":"c"}`, `{"Key":"escape"}`).

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An absolute position on the virtual desktop, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Mouse button used for the next pointer action.
///
/// Cycles `Left → Right → Middle → Left` via [`MouseButton::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// The button that follows `self` in the fixed cycle order.
    pub fn next(self) -> Self {
        match self {
            MouseButton::Left => MouseButton::Right,
            MouseButton::Right => MouseButton::Middle,
            MouseButton::Middle => MouseButton::Left,
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => write!(f, "left"),
            MouseButton::Right => write!(f, "right"),
            MouseButton::Middle => write!(f, "middle"),
        }
    }
}

/// What happens at a resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    #[default]
    Click,
    DoubleClick,
    /// Two labels: the first marks the start point, the second performs
    /// press → move → release.
    Drag,
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionMode::Click => write!(f, "click"),
            ActionMode::DoubleClick => write!(f, "double-click"),
            ActionMode::Drag => write!(f, "drag"),
        }
    }
}

/// A decoded key press delivered to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySymbol {
    /// Any printable character, as typed (not case-normalised).
    Char(char),
    Escape,
    Left,
    Right,
    Tab,
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySymbol::Char(c) => write!(f, "{}", c),
            KeySymbol::Escape => write!(f, "escape"),
            KeySymbol::Left => write!(f, "left"),
            KeySymbol::Right => write!(f, "right"),
            KeySymbol::Tab => write!(f, "tab"),
        }
    }
}

/// Parse a key string: a single character, or one of `escape`/`esc`,
/// `left`, `right`, `tab` (case-insensitive).
pub fn parse_key(s: &str) -> Option<KeySymbol> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeySymbol::Char(c));
    }
    match s.trim().to_lowercase().as_str() {
        "escape" | "esc" => Some(KeySymbol::Escape),
        "left" => Some(KeySymbol::Left),
        "right" => Some(KeySymbol::Right),
        "tab" => Some(KeySymbol::Tab),
        _ => None,
    }
}

impl Serialize for KeySymbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeySymbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_key(&s).ok_or_else(|| DeError::custom(format!("invalid key: {:?}", s)))
    }
}

/// Every input the selection state machine reacts to.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations (and by the overlay window for key presses) and consumed
/// by the [`SelectionStateMachine`](crate::selection::SelectionStateMachine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Show the grid if hidden, hide (and reset) it if shown.
    ///
    /// On the wire this is encoded as the JSON string `"ToggleGrid"`.
    ToggleGrid,

    /// Abandon the current gesture and hide the grid.
    Dismiss,

    /// Move the grid to the previous screen (clamped at the first one).
    ScreenLeft,

    /// Move the grid to the next screen (clamped at the last one).
    ScreenRight,

    /// Advance the mouse button `Left → Right → Middle → Left`.
    CycleButton,

    /// Use `button` for the next action.  Accepted while hidden too; the
    /// choice is kept for the next activation.
    SetButton(MouseButton),

    /// Use `mode` for the next action.  Accepted while hidden too.
    SetAction(ActionMode),

    /// Switch to drag mode and show the grid if it is hidden.
    StartDrag,

    /// A decoded key press.
    Key(KeySymbol),
}

/// Geometry of one physical display, in logical pixels on the virtual
/// desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenGeometry {
    /// Name the display server uses for this output (e.g. `"DP-1"`).
    pub name: String,
    /// X position on the virtual desktop.
    pub x: i32,
    /// Y position on the virtual desktop.
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenGeometry {
    pub fn new(name: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner on the virtual desktop.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Sort screens left-to-right, then top-to-bottom, so that screen
/// navigation follows the physical layout.
pub fn order_screens(screens: &mut [ScreenGeometry]) {
    screens.sort_by_key(|s| (s.x, s.y));
}
