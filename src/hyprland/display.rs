//! [`DisplaySurface`] implementation backed by Hyprland IPC.

use super::{socket, HyprlandError};
use crate::command::{order_screens, ScreenGeometry};
use crate::traits::DisplaySurface;
use serde::Deserialize;

/// Hyprland-backed screen enumeration.
///
/// Each call to [`screens`](DisplaySurface::screens) issues a fresh
/// `j/monitors` request, so hot-plugged monitors are picked up on the next
/// activation.
#[derive(Debug, Default, Clone, Copy)]
pub struct HyprlandDisplay;

impl HyprlandDisplay {
    pub fn new() -> Self {
        Self
    }
}

/// Subset of the JSON object returned by `j/monitors`.
#[derive(Debug, Deserialize)]
struct MonitorJson {
    name: String,
    /// Mode size in physical pixels.
    width: u32,
    height: u32,
    /// Position in the logical layout.
    x: i32,
    y: i32,
    #[serde(default = "unit_scale")]
    scale: f64,
    #[serde(default)]
    transform: u8,
}

fn unit_scale() -> f64 {
    1.0
}

impl MonitorJson {
    /// Logical geometry: physical size divided by the scale, with width
    /// and height swapped for 90° and 270° transforms.
    fn into_screen(self) -> ScreenGeometry {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        let logical = |px: u32| (px as f64 / scale).round() as u32;
        let (mut w, mut h) = (logical(self.width), logical(self.height));
        if self.transform % 2 == 1 {
            std::mem::swap(&mut w, &mut h);
        }
        ScreenGeometry::new(self.name, self.x, self.y, w, h)
    }
}

/// Turn a `j/monitors` answer into screens ordered left to right.
fn screens_from_json(monitors: Vec<MonitorJson>) -> Vec<ScreenGeometry> {
    let mut screens: Vec<ScreenGeometry> =
        monitors.into_iter().map(MonitorJson::into_screen).collect();
    order_screens(&mut screens);
    screens
}

impl DisplaySurface for HyprlandDisplay {
    type Error = HyprlandError;

    fn screens(&self) -> Result<Vec<ScreenGeometry>, HyprlandError> {
        let monitors: Vec<MonitorJson> = socket::query("monitors")?;
        Ok(screens_from_json(monitors))
    }
}
