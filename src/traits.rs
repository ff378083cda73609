//! Core traits that decouple hyprclick from any specific display server,
//! input-injection mechanism, or command transport.
//!
//! Every concrete backend (Hyprland, a Unix-socket listener, a test harness,
//! …) implements one of these traits.  The
//! [`SelectionStateMachine`](crate::selection::SelectionStateMachine) only
//! depends on these abstractions.

use crate::command::{ActionMode, Command, MouseButton, Point, ScreenGeometry};
use crate::grid::Grid;
use std::sync::mpsc;

/// Abstraction over the system pointer.
///
/// An implementation might drive the compositor's cursor and inject button
/// events, or it might be a recording stub used in tests.
pub trait PointerDevice {
    /// The error type produced by this device.
    type Error: std::error::Error + Send + 'static;

    /// Current pointer position on the virtual desktop.
    fn position(&self) -> Result<Point, Self::Error>;

    /// Warp the pointer to `to`.
    fn move_to(&self, to: Point) -> Result<(), Self::Error>;

    /// Press `button` without releasing it.
    fn button_down(&self, button: MouseButton) -> Result<(), Self::Error>;

    /// Release a previously pressed `button`.
    fn button_up(&self, button: MouseButton) -> Result<(), Self::Error>;

    /// Press and release `button` at the current position.
    fn click(&self, button: MouseButton) -> Result<(), Self::Error>;

    /// Two clicks in quick succession at the current position.
    fn double_click(&self, button: MouseButton) -> Result<(), Self::Error>;
}

/// Abstraction over the set of physical displays.
pub trait DisplaySurface {
    /// The error type produced by this surface.
    type Error: std::error::Error + Send + 'static;

    /// Return the available screens, in navigation order.
    fn screens(&self) -> Result<Vec<ScreenGeometry>, Self::Error>;
}

//  Overlay

/// A snapshot of everything the overlay needs in order to render.
#[derive(Debug, Clone)]
pub struct OverlayState {
    /// Cells of the active screen (also carries the screen geometry).
    pub grid: Grid,
    /// Index of the active screen in the screen list.
    pub screen_index: usize,
    pub button: MouseButton,
    pub action: ActionMode,
    /// Row letter typed so far, if any.
    pub pending_letter: Option<char>,
    /// Recorded start point of a drag in progress.
    pub drag_start: Option<Point>,
}

/// Events sent from the
/// [`SelectionStateMachine`](crate::selection::SelectionStateMachine) to an
/// overlay presenter over an [`mpsc`](std::sync::mpsc) channel.
///
/// The presenter owns no logic: it shows, redraws, or hides itself
/// according to these events.
#[derive(Debug, Clone)]
pub enum OverlayEvent {
    /// The overlay became active on the screen described by the state.
    Show(OverlayState),
    /// Something visible changed (letter, button, mode, screen).
    Update(OverlayState),
    /// The overlay became inactive.
    Hide,
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::KeySymbol;
    use crate::test_support::{PointerCall, RecordingPointer};

    #[test]
    fn recording_pointer_tracks_position() {
        let pointer = RecordingPointer::at(Point::new(10, 20));
        assert_eq!(pointer.position().unwrap(), Point::new(10, 20));
        pointer.move_to(Point::new(30, 40)).unwrap();
        pointer.click(MouseButton::Right).unwrap();
        assert_eq!(pointer.position().unwrap(), Point::new(30, 40));
        assert_eq!(
            pointer.calls(),
            vec![
                PointerCall::Move(Point::new(30, 40)),
                PointerCall::Click(MouseButton::Right)
            ]
        );
    }

    /// A test double that emits a fixed sequence of commands.
    struct MockSource {
        commands: Vec<Command>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let _ = sink.send(cmd);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_commands() {
        let mut src = MockSource {
            commands: vec![Command::ToggleGrid, Command::Key(KeySymbol::Char('c'))],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![Command::ToggleGrid, Command::Key(KeySymbol::Char('c'))]
        );
    }
}
