//! What the overlay draws, computed without touching GTK.
//!
//! [`OverlayView`] turns an [`OverlayState`] into primitives in
//! screen-local pixels: grid lines at every cell boundary, one centred
//! label per cell, a status line in the top-left corner and an optional
//! marker at a pending drag start.  The GTK presenter only paints these.

use crate::command::{ActionMode, MouseButton};
use crate::config::{Color, Config};
use crate::traits::OverlayState;

/// Baseline position of the status line.
pub const STATUS_POSITION: (f64, f64) = (10.0, 20.0);

/// Status line text: `"Mode: left"`, `"Mode: right (Drag)"`, …
pub fn status_text(button: MouseButton, action: ActionMode) -> String {
    let mut text = format!("Mode: {}", button);
    if action == ActionMode::Drag {
        text.push_str(" (Drag)");
    }
    text
}

/// An RGBA colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl From<Color> for Rgba {
    fn from(c: Color) -> Self {
        let (r, g, b, a) = c.to_f64();
        Self { r, g, b, a }
    }
}

/// Colours and font size taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Background fill; its alpha already includes the overlay opacity.
    pub background: Rgba,
    pub grid: Rgba,
    pub font_size: f64,
}

impl OverlayStyle {
    pub fn from_config(config: &Config) -> Self {
        let mut background = Rgba::from(config.background_color);
        background.a *= config.overlay_opacity;
        Self {
            background,
            grid: config.grid_color.into(),
            font_size: config.font_size as f64,
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// A cell label, drawn centred on `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub center: (f64, f64),
    /// The label is in the row of the letter typed so far.
    pub highlighted: bool,
}

/// Everything the overlay paints for one state.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<Line>,
    pub labels: Vec<Label>,
    pub status: String,
    /// Drag start in screen-local pixels, if it lies on this screen.
    pub drag_marker: Option<(f64, f64)>,
}

impl OverlayView {
    pub fn new(state: &OverlayState) -> Self {
        let screen = state.grid.screen();
        let width = screen.width as f64;
        let height = screen.height as f64;
        let n = state.grid.size();
        let (cell_w, cell_h) = state.grid.cell_size();

        let mut lines = Vec::with_capacity(2 * (n + 1));
        for i in 0..=n as i32 {
            let x = (i * cell_w) as f64;
            let y = (i * cell_h) as f64;
            lines.push(Line {
                from: (x, 0.0),
                to: (x, height),
            });
            lines.push(Line {
                from: (0.0, y),
                to: (width, y),
            });
        }

        let labels = state
            .grid
            .cells()
            .iter()
            .map(|cell| {
                let (cx, cy) = cell.rect.center();
                Label {
                    text: cell.label.clone(),
                    center: (cx as f64, cy as f64),
                    highlighted: state
                        .pending_letter
                        .is_some_and(|l| cell.label.starts_with(l)),
                }
            })
            .collect();

        let origin = screen.origin();
        let drag_marker = state.drag_start.and_then(|p| {
            let (x, y) = (p.x - origin.x, p.y - origin.y);
            let on_screen =
                x >= 0 && y >= 0 && (x as u32) < screen.width && (y as u32) < screen.height;
            on_screen.then_some((x as f64, y as f64))
        });

        Self {
            width,
            height,
            lines,
            labels,
            status: status_text(state.button, state.action),
            drag_marker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Point, ScreenGeometry};
    use crate::grid::Grid;

    fn state(x: i32, n: usize) -> OverlayState {
        OverlayState {
            grid: Grid::new(ScreenGeometry::new("DP-1", x, 0, 1600, 1200), n).unwrap(),
            screen_index: 0,
            button: MouseButton::Left,
            action: ActionMode::Click,
            pending_letter: None,
            drag_start: None,
        }
    }

    #[test]
    fn status_line() {
        assert_eq!(status_text(MouseButton::Left, ActionMode::Click), "Mode: left");
        assert_eq!(
            status_text(MouseButton::Right, ActionMode::Drag),
            "Mode: right (Drag)"
        );
        assert_eq!(
            status_text(MouseButton::Middle, ActionMode::DoubleClick),
            "Mode: middle"
        );
    }

    #[test]
    fn lines_sit_on_cell_boundaries() {
        let view = OverlayView::new(&state(0, 8));
        assert_eq!(view.lines.len(), 18);
        assert!(view.lines.contains(&Line {
            from: (200.0, 0.0),
            to: (200.0, 1200.0)
        }));
        assert!(view.lines.contains(&Line {
            from: (0.0, 150.0),
            to: (1600.0, 150.0)
        }));
    }

    #[test]
    fn one_label_per_cell_at_its_centre() {
        let view = OverlayView::new(&state(0, 8));
        assert_eq!(view.labels.len(), 64);
        let h8 = view.labels.iter().find(|l| l.text == "H8").unwrap();
        assert_eq!(h8.center, (1500.0, 1125.0));
        assert!(view.labels.iter().all(|l| !l.highlighted));
    }

    #[test]
    fn labels_are_screen_local() {
        let view = OverlayView::new(&state(1600, 8));
        assert_eq!(view.labels[0].center, (100.0, 75.0));
    }

    #[test]
    fn pending_letter_highlights_its_row() {
        let mut s = state(0, 4);
        s.pending_letter = Some('B');
        let view = OverlayView::new(&s);
        let lit: Vec<&str> = view
            .labels
            .iter()
            .filter(|l| l.highlighted)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(lit, ["B1", "B2", "B3", "B4"]);
    }

    #[test]
    fn drag_marker_only_on_its_screen() {
        let mut s = state(1600, 4);
        s.action = ActionMode::Drag;
        s.drag_start = Some(Point::new(1700, 50));
        assert_eq!(OverlayView::new(&s).drag_marker, Some((100.0, 50.0)));

        s.drag_start = Some(Point::new(100, 50));
        assert_eq!(OverlayView::new(&s).drag_marker, None);
    }

    #[test]
    fn background_alpha_follows_opacity() {
        let mut config = Config::default();
        config.overlay_opacity = 0.25;
        let style = OverlayStyle::from_config(&config);
        assert_eq!(style.background.a, 0.25);
        assert_eq!(style.grid, Rgba::from(Color::WHITE));
        assert_eq!(style.font_size, 14.0);
    }
}
