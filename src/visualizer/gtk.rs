//! GTK4 + layer-shell overlay that runs on the **main thread**.
//!
//! # Window
//!
//! ```text
//! window            (layer-shell overlay, anchored to all edges, transparent)
//! └ DrawingArea     (paints the current OverlayView with cairo)
//! ```
//!
//! The window takes exclusive keyboard focus while it is visible and has an
//! empty input region, so pointer events (including the ones we inject)
//! fall through to whatever is underneath.
//!
//! Key presses are not handled in place.  They are turned into
//! [`Command::Key`] and sent down the same channel as socket commands, so
//! presses that arrive during an eased move wait in the queue until the
//! move has finished.

use crate::command::{Command, KeySymbol, ScreenGeometry};
use crate::cursor::FramePacer;
use crate::selection::SelectionStateMachine;
use crate::traits::{DisplaySurface, OverlayEvent, OverlayState, PointerDevice};
use crate::visualizer::view::{OverlayStyle, OverlayView, Rgba, STATUS_POSITION};
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(16);

const DRAG_MARKER_RADIUS: f64 = 6.0;

const DEFAULT_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}
"#;

//  Frame pacing

/// [`FramePacer`] that keeps GLib running during an eased move.
///
/// Pending GLib events (redraws, key presses) are dispatched until the
/// frame interval is used up; whatever time is left is slept away.
#[derive(Debug, Default)]
pub struct GlibPacer;

impl FramePacer for GlibPacer {
    fn frame(&mut self, interval: Duration) {
        let deadline = Instant::now() + interval;
        let ctx = glib::MainContext::default();
        while Instant::now() < deadline && ctx.pending() {
            ctx.iteration(false);
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

//  Keys

fn key_symbol(key: gdk::Key) -> Option<KeySymbol> {
    match key {
        gdk::Key::Escape => Some(KeySymbol::Escape),
        gdk::Key::Left => Some(KeySymbol::Left),
        gdk::Key::Right => Some(KeySymbol::Right),
        gdk::Key::Tab | gdk::Key::ISO_Left_Tab => Some(KeySymbol::Tab),
        _ => key
            .to_unicode()
            .filter(|c| !c.is_control())
            .map(KeySymbol::Char),
    }
}

//  Painting

fn set_source(cr: &cairo::Context, c: Rgba) {
    cr.set_source_rgba(c.r, c.g, c.b, c.a);
}

fn paint(
    cr: &cairo::Context,
    view: &OverlayView,
    style: &OverlayStyle,
) -> Result<(), cairo::Error> {
    cr.set_operator(cairo::Operator::Source);
    set_source(cr, style.background);
    cr.paint()?;
    cr.set_operator(cairo::Operator::Over);

    set_source(cr, style.grid);
    cr.set_line_width(1.0);
    for line in &view.lines {
        // Half-pixel offset keeps 1px lines crisp.
        cr.move_to(line.from.0 + 0.5, line.from.1 + 0.5);
        cr.line_to(line.to.0 + 0.5, line.to.1 + 0.5);
    }
    cr.stroke()?;

    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(style.font_size);
    for label in &view.labels {
        let ext = cr.text_extents(&label.text)?;
        let alpha = if label.highlighted { 1.0 } else { 0.6 * style.grid.a };
        cr.set_source_rgba(style.grid.r, style.grid.g, style.grid.b, alpha);
        cr.move_to(
            label.center.0 - ext.width() / 2.0 - ext.x_bearing(),
            label.center.1 - ext.height() / 2.0 - ext.y_bearing(),
        );
        cr.show_text(&label.text)?;
    }

    set_source(cr, style.grid);
    cr.move_to(STATUS_POSITION.0, STATUS_POSITION.1);
    cr.show_text(&view.status)?;

    if let Some((x, y)) = view.drag_marker {
        cr.arc(x, y, DRAG_MARKER_RADIUS, 0.0, std::f64::consts::TAU);
        cr.fill()?;
    }
    Ok(())
}

//  Monitors

/// Find the GDK monitor for `screen`, by connector name first and by
/// geometry otherwise.
fn find_monitor(screen: &ScreenGeometry) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let model = display.monitors();
    let monitors: Vec<gdk::Monitor> = (0..model.n_items())
        .filter_map(|i| model.item(i).and_downcast::<gdk::Monitor>())
        .collect();

    monitors
        .iter()
        .find(|m| m.connector().is_some_and(|c| c.as_str() == screen.name))
        .or_else(|| {
            monitors.iter().find(|m| {
                let g = m.geometry();
                g.x() == screen.x
                    && g.y() == screen.y
                    && g.width() as u32 == screen.width
                    && g.height() as u32 == screen.height
            })
        })
        .cloned()
}

//  Overlay window

struct Overlay {
    window: gtk4::Window,
    area: gtk4::DrawingArea,
    view: Rc<RefCell<Option<OverlayView>>>,
    screen: Option<String>,
}

impl Overlay {
    fn new(style: OverlayStyle, cmd_tx: mpsc::Sender<Command>) -> Self {
        let window = gtk4::Window::new();
        window.init_layer_shell();
        window.set_layer(Layer::Overlay);
        window.set_namespace("hyprclick");
        for edge in [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right] {
            window.set_anchor(edge, true);
        }
        window.set_exclusive_zone(-1);
        window.set_keyboard_mode(KeyboardMode::Exclusive);
        window.set_decorated(false);
        window.remove_css_class("background");

        let view: Rc<RefCell<Option<OverlayView>>> = Rc::new(RefCell::new(None));

        let area = gtk4::DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);
        {
            let view = view.clone();
            area.set_draw_func(move |_, cr, _, _| {
                if let Some(v) = view.borrow().as_ref() {
                    if let Err(e) = paint(cr, v, &style) {
                        warn!("overlay paint failed: {}", e);
                    }
                }
            });
        }
        window.set_child(Some(&area));

        let keys = gtk4::EventControllerKey::new();
        keys.connect_key_pressed(move |_, key, _, _| match key_symbol(key) {
            Some(symbol) => {
                debug!("key {}", symbol);
                if cmd_tx.send(Command::Key(symbol)).is_err() {
                    warn!("command channel closed, dropping key {}", symbol);
                }
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        });
        window.add_controller(keys);

        window.connect_realize(|w| {
            if let Some(surface) = w.surface() {
                surface.set_input_region(&cairo::Region::create());
            }
        });

        Self {
            window,
            area,
            view,
            screen: None,
        }
    }

    fn show(&mut self, state: &OverlayState) {
        self.render(state);
        self.window.set_visible(true);
        self.window.present();
    }

    fn render(&mut self, state: &OverlayState) {
        let screen = state.grid.screen();
        if self.screen.as_deref() != Some(screen.name.as_str()) {
            match find_monitor(screen) {
                Some(monitor) => {
                    debug!("overlay -> monitor {}", screen.name);
                    // Layer surfaces only pick up a new output when remapped.
                    let visible = self.window.is_visible();
                    self.window.set_visible(false);
                    self.window.set_monitor(&monitor);
                    self.window.set_visible(visible);
                }
                None => warn!("no GDK monitor matches {}", screen.name),
            }
            self.screen = Some(screen.name.clone());
        }
        *self.view.borrow_mut() = Some(OverlayView::new(state));
        self.area.queue_draw();
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
        *self.view.borrow_mut() = None;
    }
}

fn load_css() {
    let provider = gtk4::CssProvider::new();
    #[allow(deprecated)]
    provider.load_from_data(DEFAULT_CSS);

    match gdk::Display::default() {
        Some(display) => gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => warn!("no GDK display, overlay background may be opaque"),
    }
}

//  Public API

/// Run the GTK4 main loop on the **current** (main) thread.
///
/// `cmd_tx` must feed `cmd_rx`; the overlay uses it to queue key presses.
/// The machine's dispatcher should use a [`GlibPacer`] so the loop keeps
/// running during eased moves.
pub fn run_main_loop<P, D>(
    mut machine: SelectionStateMachine<P, D>,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: mpsc::Receiver<Command>,
    style: OverlayStyle,
) where
    P: PointerDevice + 'static,
    D: DisplaySurface + 'static,
{
    gtk4::init().expect("failed to initialise GTK4");
    info!("GTK4 initialised on main thread");

    load_css();

    let mut overlay = Overlay::new(style, cmd_tx);

    // Map the surface once so the first show is immediate.
    overlay.render(&machine.overlay_state());
    overlay.window.present();
    overlay.hide();

    let (overlay_tx, overlay_rx) = mpsc::channel::<OverlayEvent>();
    machine.set_overlay(overlay_tx);

    glib::timeout_add_local(TICK, move || {
        while let Ok(cmd) = cmd_rx.try_recv() {
            debug!("command: {:?}", cmd);
            if let Err(e) = machine.handle(cmd) {
                error!("command error: {}", e);
            }
        }

        while let Ok(event) = overlay_rx.try_recv() {
            match event {
                OverlayEvent::Show(state) => {
                    debug!("SHOW screen {}", state.screen_index);
                    overlay.show(&state);
                }
                OverlayEvent::Update(state) => overlay.render(&state),
                OverlayEvent::Hide => {
                    debug!("HIDE");
                    overlay.hide();
                }
            }
        }

        glib::ControlFlow::Continue
    });

    info!("entering GLib main loop");
    let main_loop = glib::MainLoop::new(None, false);
    main_loop.run();
    info!("GLib main loop exited");
}
