//! **hyprclick**: a keyboard-driven pointer grid.
//!
//! Pressing the toggle hotkey covers the active screen with an `n × n`
//! grid of labelled cells (`A1`, `A2`, … `B1`, …).  Typing a row letter
//! and a column digit moves the pointer to the centre of that cell, along
//! an eased path, and clicks there.  The mouse button and the action
//! (click, double-click or a two-label drag) can be switched while the
//! grid is up, and the grid can be moved between screens.
//!
//! # Architecture
//!
//! The crate is organised around three capability traits:
//!
//! * [`traits::PointerDevice`]: moves the pointer and presses buttons.
//! * [`traits::DisplaySurface`]: lists the screens the grid can cover.
//! * [`traits::CommandSource`]: abstracts the transport that delivers
//!   hotkey commands (a Unix socket, …) so the main loop is not coupled to
//!   any specific IPC mechanism.
//!
//! [`selection::SelectionStateMachine`] consumes [`command::Command`]s and
//! drives an [`dispatcher::ActionDispatcher`], which moves the pointer
//! through [`cursor::EasedCursorController`].  The overlay in
//! [`visualizer`] only mirrors the state it is sent.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC and
//! `ydotool`) and [`ipc`] (Unix-socket command listener).

pub mod command;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod grid;
pub mod hyprland;
pub mod ipc;
pub mod selection;
pub mod traits;
pub mod visualizer;

#[cfg(test)]
pub(crate) mod test_support;
