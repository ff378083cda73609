//! Entry point for the **hyprclick** daemon.
//!
//! Spawns the configured [`CommandSource`](hyprclick::traits::CommandSource)s
//! on background threads and processes incoming commands on the main thread.
//!
//! When the `overlay-gtk` feature is enabled the main thread runs the GLib
//! main loop (GTK4 requires it) and polls the command channel from there.
//! Without the feature, a simple blocking loop is used instead and the grid
//! is invisible, which is only useful for scripting and debugging.

use hyprclick::command::Command;
use hyprclick::config::Config;
use hyprclick::cursor::{EasedCursorController, FramePacer};
use hyprclick::dispatcher::ActionDispatcher;
use hyprclick::hyprland::display::HyprlandDisplay;
use hyprclick::hyprland::pointer::HyprlandPointer;
use hyprclick::ipc::listener::UnixSocketListener;
use hyprclick::selection::SelectionStateMachine;
use hyprclick::traits::{CommandSource, DisplaySurface, PointerDevice};
use log::{error, info, warn};
use std::sync::mpsc;

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/hyprclick.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/hyprclick`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("hyprclick")
}

/// Load `$XDG_CONFIG_HOME/hyprclick/config.json`.
///
/// A missing file is created with the defaults; a broken one is reported
/// and the defaults are used.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) if e.is_missing() => {
            let cfg = Config::default();
            match cfg.save(&path) {
                Ok(()) => info!("wrote default config to {}", path.display()),
                Err(e) => warn!("could not write default config: {}", e),
            }
            cfg
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

//  Stand-ins for --dry-run

mod dry_run {
    use hyprclick::command::{MouseButton, Point, ScreenGeometry};
    use hyprclick::traits::{DisplaySurface, PointerDevice};
    use log::info;
    use std::cell::Cell;

    /// Pointer that only logs what it would do.
    #[derive(Default)]
    pub struct NoopPointer {
        position: Cell<Point>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("noop")]
    pub struct NoopError;

    impl PointerDevice for NoopPointer {
        type Error = NoopError;

        fn position(&self) -> Result<Point, NoopError> {
            Ok(self.position.get())
        }

        fn move_to(&self, to: Point) -> Result<(), NoopError> {
            self.position.set(to);
            Ok(())
        }

        fn button_down(&self, button: MouseButton) -> Result<(), NoopError> {
            info!("[dry-run] {} down at {}", button, self.position.get());
            Ok(())
        }

        fn button_up(&self, button: MouseButton) -> Result<(), NoopError> {
            info!("[dry-run] {} up at {}", button, self.position.get());
            Ok(())
        }

        fn click(&self, button: MouseButton) -> Result<(), NoopError> {
            info!("[dry-run] {} click at {}", button, self.position.get());
            Ok(())
        }

        fn double_click(&self, button: MouseButton) -> Result<(), NoopError> {
            info!("[dry-run] {} double-click at {}", button, self.position.get());
            Ok(())
        }
    }

    /// A single 1920×1080 screen at the origin.
    pub struct SyntheticDisplay;

    impl DisplaySurface for SyntheticDisplay {
        type Error = NoopError;

        fn screens(&self) -> Result<Vec<ScreenGeometry>, NoopError> {
            Ok(vec![ScreenGeometry::new("DRY-RUN-1", 0, 0, 1920, 1080)])
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let dry = std::env::args().any(|a| a == "--dry-run");

    let config = load_config();
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }
    if config.grid_size > 9 {
        warn!(
            "grid_size {} has more than 9 columns; only columns 1-9 can be typed",
            config.grid_size
        );
    }

    if dry {
        info!("running in dry-run mode (no pointer injection)");
        run_daemon(
            dry_run::NoopPointer::default(),
            dry_run::SyntheticDisplay,
            config,
        );
    } else {
        let pointer = HyprlandPointer::from_config(&config);
        run_daemon(pointer, HyprlandDisplay::new(), config);
    }
}

fn run_daemon<P, D>(pointer: P, display: D, config: Config)
where
    P: PointerDevice + 'static,
    D: DisplaySurface + 'static,
{
    let grid_size = match config.grid_dimension() {
        Ok(n) => n,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let cursor = EasedCursorController::from_config(&config);
    let dispatcher = ActionDispatcher::new(pointer, cursor, frame_pacer());
    let machine = match SelectionStateMachine::new(dispatcher, display, grid_size) {
        Ok(m) => m,
        Err(e) => {
            error!("failed to set up the grid: {}", e);
            std::process::exit(1);
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx.clone());

    start_event_loop(machine, cmd_tx, cmd_rx, config);
}

//  Event loops

#[cfg(feature = "overlay-gtk")]
fn frame_pacer() -> Box<dyn FramePacer> {
    Box::new(hyprclick::visualizer::gtk::GlibPacer)
}

#[cfg(not(feature = "overlay-gtk"))]
fn frame_pacer() -> Box<dyn FramePacer> {
    Box::new(hyprclick::cursor::SleepPacer)
}

#[cfg(feature = "overlay-gtk")]
fn start_event_loop<P, D>(
    machine: SelectionStateMachine<P, D>,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: mpsc::Receiver<Command>,
    config: Config,
) where
    P: PointerDevice + 'static,
    D: DisplaySurface + 'static,
{
    let style = hyprclick::visualizer::view::OverlayStyle::from_config(&config);
    hyprclick::visualizer::gtk::run_main_loop(machine, cmd_tx, cmd_rx, style);
}

#[cfg(not(feature = "overlay-gtk"))]
fn start_event_loop<P, D>(
    mut machine: SelectionStateMachine<P, D>,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: mpsc::Receiver<Command>,
    _config: Config,
) where
    P: PointerDevice,
    D: DisplaySurface,
{
    // Only the listener threads keep the channel open.
    drop(cmd_tx);
    info!("hyprclick running without overlay");
    for cmd in cmd_rx {
        if let Err(e) = machine.handle(cmd) {
            error!("command error: {}", e);
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
