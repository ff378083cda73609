//! The selection state machine that turns key presses into pointer actions.
//!
//! [`SelectionStateMachine`] owns the grid of the active screen and reacts
//! to [`Command`]s:
//!
//! ```text
//!            ToggleGrid / StartDrag
//!   Idle ─────────────────────────────▶ Armed ──letter──▶ LetterChosen
//!    ▲  ◀── ToggleGrid / Dismiss ──────   ▲                   │ digit
//!    │                                    │ drag start /      ▼
//!    └────────── action completed ────────┴ unresolved ─── resolve label
//! ```
//!
//! Any key that does not fit the current state is ignored, so a gesture can
//! always be resumed after a stray key press.  Errors from the pointer
//! device abandon the gesture but keep the overlay up.

use crate::command::{
    order_screens, ActionMode, Command, KeySymbol, MouseButton, Point, ScreenGeometry,
};
use crate::dispatcher::{ActionDispatcher, DispatchError, DispatchOutcome};
use crate::grid::{Grid, GridError};
use crate::traits::{DisplaySurface, OverlayEvent, OverlayState, PointerDevice};
use log::{debug, info, warn};
use std::sync::mpsc;

/// Possible errors from the state machine.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// The pointer action failed; the gesture has been reset.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The display surface returned an error.
    #[error("display error: {0}")]
    Display(String),
    #[error("no screens available")]
    NoScreens,
}

/// Mouse button and action used when the next label completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode {
    pub button: MouseButton,
    pub action: ActionMode,
}

/// Where the gesture currently stands.
///
/// Each variant carries only what is meaningful in that state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// Overlay hidden.  `mode` holds a button or action chosen by the host
    /// before activation.
    Idle { mode: Mode },
    /// Overlay shown, waiting for a row letter.
    Armed {
        mode: Mode,
        drag_start: Option<Point>,
    },
    /// Row letter typed, waiting for a column digit.
    LetterChosen {
        mode: Mode,
        drag_start: Option<Point>,
        letter: char,
    },
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::Idle {
            mode: Mode::default(),
        }
    }
}

impl SelectionState {
    pub fn is_active(&self) -> bool {
        !matches!(self, SelectionState::Idle { .. })
    }

    pub fn mode(&self) -> Mode {
        match self {
            SelectionState::Idle { mode }
            | SelectionState::Armed { mode, .. }
            | SelectionState::LetterChosen { mode, .. } => *mode,
        }
    }

    fn mode_mut(&mut self) -> &mut Mode {
        match self {
            SelectionState::Idle { mode }
            | SelectionState::Armed { mode, .. }
            | SelectionState::LetterChosen { mode, .. } => mode,
        }
    }

    pub fn drag_start(&self) -> Option<Point> {
        match self {
            SelectionState::Idle { .. } => None,
            SelectionState::Armed { drag_start, .. }
            | SelectionState::LetterChosen { drag_start, .. } => *drag_start,
        }
    }

    fn clear_drag_start(&mut self) {
        match self {
            SelectionState::Idle { .. } => {}
            SelectionState::Armed { drag_start, .. }
            | SelectionState::LetterChosen { drag_start, .. } => *drag_start = None,
        }
    }

    pub fn letter(&self) -> Option<char> {
        match self {
            SelectionState::LetterChosen { letter, .. } => Some(*letter),
            _ => None,
        }
    }
}

/// Drives the overlay from key presses and host commands.
///
/// Generic over the pointer and display capabilities so it can run against
/// Hyprland or against recording test doubles.
pub struct SelectionStateMachine<P: PointerDevice, D: DisplaySurface> {
    dispatcher: ActionDispatcher<P>,
    display: D,
    grid_size: usize,
    screens: Vec<ScreenGeometry>,
    screen_index: usize,
    grid: Grid,
    state: SelectionState,
    overlay_tx: Option<mpsc::Sender<OverlayEvent>>,
}

impl<P: PointerDevice, D: DisplaySurface> SelectionStateMachine<P, D> {
    /// Create an idle state machine on the first screen reported by
    /// `display`.
    ///
    /// Fails if the display reports no screens or `grid_size` is invalid.
    pub fn new(
        dispatcher: ActionDispatcher<P>,
        display: D,
        grid_size: usize,
    ) -> Result<Self, SelectionError> {
        let mut screens = display
            .screens()
            .map_err(|e| SelectionError::Display(e.to_string()))?;
        order_screens(&mut screens);
        let first = screens.first().cloned().ok_or(SelectionError::NoScreens)?;
        let grid = Grid::new(first, grid_size)?;
        info!(
            "{} screen(s), {}x{} grid on {}",
            screens.len(),
            grid_size,
            grid_size,
            grid.screen().name
        );

        Ok(Self {
            dispatcher,
            display,
            grid_size,
            screens,
            screen_index: 0,
            grid,
            state: SelectionState::default(),
            overlay_tx: None,
        })
    }

    /// Attach an overlay event channel.
    ///
    /// The machine sends [`OverlayEvent::Show`] on activation,
    /// [`OverlayEvent::Update`] whenever visible state changes, and
    /// [`OverlayEvent::Hide`] on deactivation.
    pub fn set_overlay(&mut self, tx: mpsc::Sender<OverlayEvent>) {
        self.overlay_tx = Some(tx);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn screen_index(&self) -> usize {
        self.screen_index
    }

    pub fn screens(&self) -> &[ScreenGeometry] {
        &self.screens
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Snapshot of what the overlay should display.
    pub fn overlay_state(&self) -> OverlayState {
        let mode = self.state.mode();
        OverlayState {
            grid: self.grid.clone(),
            screen_index: self.screen_index,
            button: mode.button,
            action: mode.action,
            pending_letter: self.state.letter(),
            drag_start: self.state.drag_start(),
        }
    }

    /// Process a single [`Command`].
    ///
    /// Errors are returned for logging only: by the time this returns the
    /// state has already been reset to something usable.
    pub fn handle(&mut self, cmd: Command) -> Result<(), SelectionError> {
        match cmd {
            Command::ToggleGrid => {
                if self.is_active() {
                    debug!("toggle: hide");
                    self.deactivate();
                } else {
                    debug!("toggle: show");
                    self.activate()?;
                }
            }

            Command::Dismiss => {
                if self.is_active() {
                    debug!("dismiss");
                    self.deactivate();
                }
            }

            Command::ScreenLeft => {
                if self.is_active() {
                    self.switch_screen(-1)?;
                }
            }

            Command::ScreenRight => {
                if self.is_active() {
                    self.switch_screen(1)?;
                }
            }

            Command::CycleButton => {
                if self.is_active() {
                    let mode = self.state.mode_mut();
                    mode.button = mode.button.next();
                    debug!("button -> {}", mode.button);
                    self.notify_update();
                }
            }

            Command::SetButton(button) => {
                debug!("set button {}", button);
                self.state.mode_mut().button = button;
                self.notify_update();
            }

            Command::SetAction(action) => {
                debug!("set action {}", action);
                self.state.mode_mut().action = action;
                if action != ActionMode::Drag {
                    self.state.clear_drag_start();
                }
                self.notify_update();
            }

            Command::StartDrag => {
                debug!("start drag");
                self.state.mode_mut().action = ActionMode::Drag;
                if self.is_active() {
                    self.notify_update();
                } else {
                    self.activate()?;
                }
            }

            Command::Key(key) => {
                if self.is_active() {
                    self.key(key)?;
                } else {
                    debug!("ignoring key {} while hidden", key);
                }
            }
        }
        Ok(())
    }

    //  Key handling

    fn key(&mut self, key: KeySymbol) -> Result<(), SelectionError> {
        match key {
            KeySymbol::Escape => return self.handle(Command::Dismiss),
            KeySymbol::Left => return self.handle(Command::ScreenLeft),
            KeySymbol::Right => return self.handle(Command::ScreenRight),
            KeySymbol::Tab => return self.handle(Command::CycleButton),
            KeySymbol::Char(c) => match self.state {
                SelectionState::Armed { mode, drag_start } if c.is_ascii_alphabetic() => {
                    let letter = c.to_ascii_uppercase();
                    debug!("row {}", letter);
                    self.state = SelectionState::LetterChosen {
                        mode,
                        drag_start,
                        letter,
                    };
                    self.notify_update();
                }
                SelectionState::LetterChosen { letter, .. } if c.is_ascii_digit() => {
                    self.complete(letter, c)?;
                }
                _ => debug!("ignoring key {:?}", c),
            },
        }
        Ok(())
    }

    /// Resolve `letter` + `digit` and perform the current action there.
    fn complete(&mut self, letter: char, digit: char) -> Result<(), SelectionError> {
        let label = format!("{}{}", letter, digit);
        let mode = self.state.mode();
        let drag_start = self.state.drag_start();

        let Some(target) = self.grid.center(&label) else {
            debug!("no cell {} on a {}x{} grid", label, self.grid_size, self.grid_size);
            self.state = SelectionState::Armed { mode, drag_start };
            self.notify_update();
            return Ok(());
        };

        match self
            .dispatcher
            .perform(target, mode.button, mode.action, drag_start)
        {
            Ok(DispatchOutcome::DragStarted(start)) => {
                debug!("{}: drag start recorded, waiting for end point", label);
                self.state = SelectionState::Armed {
                    mode,
                    drag_start: Some(start),
                };
                self.notify_update();
                Ok(())
            }
            Ok(DispatchOutcome::Completed) => {
                debug!("{}: done", label);
                self.deactivate();
                Ok(())
            }
            Err(e) => {
                warn!("{}: action failed, gesture reset: {}", label, e);
                self.state = SelectionState::Armed {
                    mode: Mode::default(),
                    drag_start: None,
                };
                self.notify_update();
                Err(e.into())
            }
        }
    }

    //  Transitions

    fn activate(&mut self) -> Result<(), SelectionError> {
        self.refresh_screens()?;
        self.state = SelectionState::Armed {
            mode: self.state.mode(),
            drag_start: None,
        };
        info!("grid shown on {}", self.grid.screen().name);
        if let Some(tx) = &self.overlay_tx {
            let _ = tx.send(OverlayEvent::Show(self.overlay_state()));
        }
        Ok(())
    }

    fn deactivate(&mut self) {
        self.state = SelectionState::default();
        info!("grid hidden");
        if let Some(tx) = &self.overlay_tx {
            let _ = tx.send(OverlayEvent::Hide);
        }
    }

    /// Move the active screen by `delta`, clamped to the available screens.
    fn switch_screen(&mut self, delta: isize) -> Result<(), SelectionError> {
        let last = self.screens.len().saturating_sub(1);
        let target = self.screen_index.saturating_add_signed(delta).min(last);
        if target == self.screen_index {
            debug!("no screen beyond index {}", self.screen_index);
            return Ok(());
        }
        self.screen_index = target;
        self.grid = Grid::new(self.screens[target].clone(), self.grid_size)?;
        info!("screen {} ({})", target, self.grid.screen().name);
        self.notify_update();
        Ok(())
    }

    /// Re-read the screen list.  On failure the previous snapshot is kept.
    fn refresh_screens(&mut self) -> Result<(), SelectionError> {
        let mut screens = match self.display.screens() {
            Ok(s) if !s.is_empty() => s,
            Ok(_) => {
                warn!("display reported no screens, keeping previous list");
                return Ok(());
            }
            Err(e) => {
                warn!("screen query failed, keeping previous list: {}", e);
                return Ok(());
            }
        };
        order_screens(&mut screens);
        if screens == self.screens {
            return Ok(());
        }
        debug!("screen list changed ({} screen(s))", screens.len());
        self.screen_index = self.screen_index.min(screens.len() - 1);
        self.screens = screens;
        self.grid = Grid::new(self.screens[self.screen_index].clone(), self.grid_size)?;
        Ok(())
    }

    fn notify_update(&self) {
        if !self.is_active() {
            return;
        }
        if let Some(tx) = &self.overlay_tx {
            let _ = tx.send(OverlayEvent::Update(self.overlay_state()));
        }
    }
}

//  Tests
