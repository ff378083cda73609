//! Recording test doubles for the capability traits.

use crate::command::{MouseButton, Point, ScreenGeometry};
use crate::cursor::FramePacer;
use crate::traits::{DisplaySurface, PointerDevice};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// One call made to a [`RecordingPointer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCall {
    Move(Point),
    Down(MouseButton),
    Up(MouseButton),
    Click(MouseButton),
    DoubleClick(MouseButton),
}

#[derive(Debug, thiserror::Error)]
#[error("pointer device unavailable")]
pub struct PointerUnavailable;

/// Pointer double that records every call and tracks its position.
///
/// Clones share the same log, so a test can keep a handle after moving
/// the pointer into a dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RecordingPointer {
    position: Rc<Cell<Point>>,
    calls: Rc<RefCell<Vec<PointerCall>>>,
    /// When set, button operations fail with [`PointerUnavailable`].
    fail_buttons: Rc<Cell<bool>>,
    /// When set, moves fail and leave the position unchanged.
    fail_moves: Rc<Cell<bool>>,
}

impl RecordingPointer {
    pub fn at(position: Point) -> Self {
        let pointer = Self::default();
        pointer.position.set(position);
        pointer
    }

    pub fn calls(&self) -> Vec<PointerCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn moves(&self) -> Vec<Point> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PointerCall::Move(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_buttons(&self, fail: bool) {
        self.fail_buttons.set(fail);
    }

    pub fn set_fail_moves(&self, fail: bool) {
        self.fail_moves.set(fail);
    }

    fn record_button(&self, call: PointerCall) -> Result<(), PointerUnavailable> {
        if self.fail_buttons.get() {
            return Err(PointerUnavailable);
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl PointerDevice for RecordingPointer {
    type Error = PointerUnavailable;

    fn position(&self) -> Result<Point, PointerUnavailable> {
        Ok(self.position.get())
    }

    fn move_to(&self, to: Point) -> Result<(), PointerUnavailable> {
        if self.fail_moves.get() {
            return Err(PointerUnavailable);
        }
        self.position.set(to);
        self.calls.borrow_mut().push(PointerCall::Move(to));
        Ok(())
    }

    fn button_down(&self, button: MouseButton) -> Result<(), PointerUnavailable> {
        self.record_button(PointerCall::Down(button))
    }

    fn button_up(&self, button: MouseButton) -> Result<(), PointerUnavailable> {
        self.record_button(PointerCall::Up(button))
    }

    fn click(&self, button: MouseButton) -> Result<(), PointerUnavailable> {
        self.record_button(PointerCall::Click(button))
    }

    fn double_click(&self, button: MouseButton) -> Result<(), PointerUnavailable> {
        self.record_button(PointerCall::DoubleClick(button))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("display query failed")]
pub struct DisplayUnavailable;

/// Display double with a fixed, replaceable screen list.
#[derive(Debug, Clone, Default)]
pub struct StaticDisplay {
    screens: Rc<RefCell<Vec<ScreenGeometry>>>,
    failing: Rc<Cell<bool>>,
}

impl StaticDisplay {
    pub fn new(screens: Vec<ScreenGeometry>) -> Self {
        Self {
            screens: Rc::new(RefCell::new(screens)),
            failing: Rc::new(Cell::new(false)),
        }
    }

    /// Two side-by-side screens: 1600×1200 at the origin and 1920×1080
    /// to its right.
    pub fn dual() -> Self {
        Self::new(vec![
            ScreenGeometry::new("DP-1", 0, 0, 1600, 1200),
            ScreenGeometry::new("HDMI-A-1", 1600, 0, 1920, 1080),
        ])
    }

    pub fn set_screens(&self, screens: Vec<ScreenGeometry>) {
        *self.screens.borrow_mut() = screens;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl DisplaySurface for StaticDisplay {
    type Error = DisplayUnavailable;

    fn screens(&self) -> Result<Vec<ScreenGeometry>, DisplayUnavailable> {
        if self.failing.get() {
            return Err(DisplayUnavailable);
        }
        Ok(self.screens.borrow().clone())
    }
}

/// Frame pacer that returns immediately and counts frames.
#[derive(Debug, Clone, Default)]
pub struct CountingPacer {
    frames: Rc<Cell<usize>>,
}

impl CountingPacer {
    pub fn frames(&self) -> usize {
        self.frames.get()
    }
}

impl FramePacer for CountingPacer {
    fn frame(&mut self, _interval: Duration) {
        self.frames.set(self.frames.get() + 1);
    }
}
