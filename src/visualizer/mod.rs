//! The grid overlay.
//!
//! [`view`] computes what to draw from an
//! [`OverlayState`](crate::traits::OverlayState) and is always built.
//! When the `overlay-gtk` feature is enabled, [`gtk::run_main_loop`]
//! takes over the main thread and drives both command processing and
//! overlay rendering through the GLib main loop.

#[cfg(feature = "overlay-gtk")]
pub mod gtk;
pub mod view;
