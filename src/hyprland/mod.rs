//! Hyprland-specific implementations.
//!
//! This module provides concrete backends for the
//! [`DisplaySurface`](crate::traits::DisplaySurface) and
//! [`PointerDevice`](crate::traits::PointerDevice) traits.  Screens and
//! pointer motion go through Hyprland's IPC socket; button presses are
//! injected with `ydotool`, since Hyprland has no dispatcher for them.
//!
//! Nothing outside this module should reference Hyprland directly.

pub mod display;
pub mod pointer;
mod socket;

/// Errors that can occur when talking to Hyprland or `ydotool`.
#[derive(Debug, thiserror::Error)]
#[error("hyprland error: {0}")]
pub struct HyprlandError(String);
