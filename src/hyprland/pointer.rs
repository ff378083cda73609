//! [`PointerDevice`] implementation for Hyprland.
//!
//! Motion uses the `movecursor` dispatcher and `j/cursorpos`, both in
//! global logical coordinates.  Buttons are injected by running
//! `ydotool click`, which needs a running `ydotoold`.
//!
//! `ydotool click` takes one byte per press: the high nibble selects the
//! operation (`0x40` down, `0x80` up, `0xC0` down and up) and the low
//! nibble the button (`0` left, `1` right, `2` middle).

use super::{socket, HyprlandError};
use crate::command::{MouseButton, Point};
use crate::config::Config;
use crate::traits::PointerDevice;
use log::debug;
use serde::Deserialize;
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonOp {
    Down,
    Up,
    Click,
}

/// `ydotool click` code for `op` on `button`, e.g. `0xC1` for a right click.
fn button_code(op: ButtonOp, button: MouseButton) -> String {
    let op = match op {
        ButtonOp::Down => 0x40,
        ButtonOp::Up => 0x80,
        ButtonOp::Click => 0xC0,
    };
    let button = match button {
        MouseButton::Left => 0x0,
        MouseButton::Right => 0x1,
        MouseButton::Middle => 0x2,
    };
    format!("0x{:02X}", op | button)
}

/// Arguments for one `ydotool` invocation; `delay_ms` separates repeats.
fn click_args(op: ButtonOp, button: MouseButton, repeat: u32, delay_ms: u32) -> Vec<String> {
    let mut args = vec!["click".to_string()];
    if repeat > 1 {
        args.extend([
            "--repeat".to_string(),
            repeat.to_string(),
            "--next-delay".to_string(),
            delay_ms.to_string(),
        ]);
    }
    args.push(button_code(op, button));
    args
}

/// Answer of `j/cursorpos`.
#[derive(Debug, Deserialize)]
struct CursorPosJson {
    x: f64,
    y: f64,
}

/// Hyprland + `ydotool` pointer.
#[derive(Debug, Clone)]
pub struct HyprlandPointer {
    ydotool: String,
    double_click_delay_ms: u32,
}

impl Default for HyprlandPointer {
    fn default() -> Self {
        Self::new()
    }
}

impl HyprlandPointer {
    /// Use the `ydotool` found on `$PATH`.
    pub fn new() -> Self {
        Self::with_ydotool("ydotool")
    }

    /// Use a specific `ydotool` executable.
    pub fn with_ydotool(program: impl Into<String>) -> Self {
        Self {
            ydotool: program.into(),
            double_click_delay_ms: Config::default().double_click_delay_ms,
        }
    }

    /// Take the double-click pause from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            double_click_delay_ms: config.double_click_delay_ms,
            ..Self::new()
        }
    }

    fn run_click(
        &self,
        op: ButtonOp,
        button: MouseButton,
        repeat: u32,
    ) -> Result<(), HyprlandError> {
        let args = click_args(op, button, repeat, self.double_click_delay_ms);
        debug!("{} {}", self.ydotool, args.join(" "));
        let output = Command::new(&self.ydotool)
            .args(&args)
            .output()
            .map_err(|e| HyprlandError(format!("spawn {}: {}", self.ydotool, e)))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(HyprlandError(format!(
                "{} {} failed ({}): {}",
                self.ydotool,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

impl PointerDevice for HyprlandPointer {
    type Error = HyprlandError;

    fn position(&self) -> Result<Point, HyprlandError> {
        let pos: CursorPosJson = socket::query("cursorpos")?;
        Ok(Point::new(pos.x.round() as i32, pos.y.round() as i32))
    }

    fn move_to(&self, to: Point) -> Result<(), HyprlandError> {
        socket::dispatch(&format!("movecursor {} {}", to.x, to.y))
    }

    fn button_down(&self, button: MouseButton) -> Result<(), HyprlandError> {
        self.run_click(ButtonOp::Down, button, 1)
    }

    fn button_up(&self, button: MouseButton) -> Result<(), HyprlandError> {
        self.run_click(ButtonOp::Up, button, 1)
    }

    fn click(&self, button: MouseButton) -> Result<(), HyprlandError> {
        self.run_click(ButtonOp::Click, button, 1)
    }

    fn double_click(&self, button: MouseButton) -> Result<(), HyprlandError> {
        self.run_click(ButtonOp::Click, button, 2)
    }
}
