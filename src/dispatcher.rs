//! Pointer actions at a resolved coordinate.
//!
//! [`ActionDispatcher`] moves the pointer to a target (eased or instant,
//! through [`EasedCursorController`]) and performs a click, a double-click,
//! or one half of a drag.
//!
//! A drag takes two calls.  The first only moves to the start point and
//! reports [`DispatchOutcome::DragStarted`]; the caller keeps that point and
//! passes it back with the second target, which presses the button, moves,
//! and releases.

use crate::command::{ActionMode, MouseButton, Point};
use crate::cursor::{EasedCursorController, FramePacer};
use crate::traits::PointerDevice;
use log::{info, warn};

/// Errors from performing a pointer action.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The pointer device failed (e.g. the injection tool is unavailable).
    #[error("pointer device error: {0}")]
    PointerDevice(String),
}

fn device_err(e: impl std::error::Error) -> DispatchError {
    DispatchError::PointerDevice(e.to_string())
}

/// What a successful [`ActionDispatcher::perform`] left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The gesture is finished.
    Completed,
    /// The first half of a drag: the start point was reached and nothing
    /// was pressed.  Pass the point back to finish the drag.
    DragStarted(Point),
}

/// Performs pointer actions on a [`PointerDevice`].
pub struct ActionDispatcher<P: PointerDevice> {
    pointer: P,
    cursor: EasedCursorController,
    pacer: Box<dyn FramePacer>,
}

impl<P: PointerDevice> ActionDispatcher<P> {
    pub fn new(pointer: P, cursor: EasedCursorController, pacer: Box<dyn FramePacer>) -> Self {
        Self {
            pointer,
            cursor,
            pacer,
        }
    }

    /// Perform `action` with `button` at `target`.
    ///
    /// `drag_start` is the point returned by an earlier
    /// [`DispatchOutcome::DragStarted`]; it is only consulted for
    /// [`ActionMode::Drag`].  Nothing is retried: on error the caller is
    /// expected to abandon the gesture.
    pub fn perform(
        &mut self,
        target: Point,
        button: MouseButton,
        action: ActionMode,
        drag_start: Option<Point>,
    ) -> Result<DispatchOutcome, DispatchError> {
        match (action, drag_start) {
            (ActionMode::Click, _) => {
                info!("{} click at {}", button, target);
                self.glide(target)?;
                self.pointer.click(button).map_err(device_err)?;
                Ok(DispatchOutcome::Completed)
            }
            (ActionMode::DoubleClick, _) => {
                info!("{} double-click at {}", button, target);
                self.glide(target)?;
                self.pointer.double_click(button).map_err(device_err)?;
                Ok(DispatchOutcome::Completed)
            }
            (ActionMode::Drag, None) => {
                info!("drag start at {}", target);
                self.glide(target)?;
                Ok(DispatchOutcome::DragStarted(target))
            }
            (ActionMode::Drag, Some(start)) => {
                info!("{} drag {} -> {}", button, start, target);
                self.pointer.button_down(button).map_err(device_err)?;
                let moved = self.glide(target);
                // Release even if the move failed so the button is not left held.
                let released = self.pointer.button_up(button).map_err(device_err);
                if let Err(ref e) = released {
                    warn!("releasing {} after drag failed: {}", button, e);
                }
                moved?;
                released?;
                Ok(DispatchOutcome::Completed)
            }
        }
    }

    fn glide(&mut self, target: Point) -> Result<(), DispatchError> {
        self.cursor
            .move_to(&self.pointer, target, self.pacer.as_mut())
            .map_err(device_err)
    }
}
