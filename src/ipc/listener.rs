//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! "ToggleGrid"
//! {"SetButton":"right"}
//! {"SetAction":"double_click"}
//! "StartDrag"
//! {"Key":"c"}
//! {"Key":"escape"}
//! ```
//!
//! A compositor key binding can therefore drive the overlay with e.g.
//! `echo '"ToggleGrid"' | socat - UNIX-CONNECT:$XDG_RUNTIME_DIR/hyprclick.sock`.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.  Lines that do not parse are logged and skipped.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Removes the socket file when the listener stops, however it stops.
struct SocketFile<'a>(&'a Path);

impl Drop for SocketFile<'_> {
    fn drop(&mut self) {
        match std::fs::remove_file(self.0) {
            Ok(()) => debug!("removed {}", self.0.display()),
            Err(e) => warn!("could not remove {}: {}", self.0.display(), e),
        }
    }
}

/// Whether the listener should keep accepting connections.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    SinkClosed,
}

fn remove_stale_socket(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => info!("removed stale socket {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        // Binding will fail and report the real problem.
        Err(e) => warn!("could not remove stale socket {}: {}", path.display(), e),
    }
}

/// Forward every command sent over one connection.
fn serve(stream: UnixStream, sink: &mpsc::Sender<Command>) -> Flow {
    for line in BufReader::new(stream).lines() {
        let text = match line {
            Ok(text) => text,
            Err(e) => {
                error!("read error: {}", e);
                break;
            }
        };
        if text.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(&text) {
            Ok(cmd) => {
                debug!("received {:?}", cmd);
                if sink.send(cmd).is_err() {
                    return Flow::SinkClosed;
                }
            }
            Err(e) => error!("bad command {:?}: {}", text, e),
        }
    }
    Flow::Continue
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called
    /// and removed when it returns.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// Blocks until the receiving end of `sink` is dropped.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        remove_stale_socket(&self.path);
        let listener = UnixListener::bind(&self.path)?;
        let _socket_file = SocketFile(&self.path);
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    if serve(stream, &sink) == Flow::SinkClosed {
                        info!("sink closed, shutting down");
                        return Ok(());
                    }
                    debug!("client disconnected");
                }
                Err(e) => error!("accept error: {}", e),
            }
        }
        Ok(())
    }
}

//  Tests 

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{KeySymbol, MouseButton};
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Helper: create a unique temporary socket path for each test.
    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir();
        dir.join(format!(
            "hyprclick-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    #[test]
    fn round_trip_commands_over_socket() {
        let path = tmp_socket_path();
        let path_clone = path.clone();

        let (tx, rx) = mpsc::channel();

        // Run listener in a background thread.
        let _handle = std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&path_clone);
            let _ = listener.run(tx);
        });

        // Give the listener a moment to bind.
        std::thread::sleep(std::time::Duration::from_millis(150));

        // Connect and send commands.
        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#""ToggleGrid""#).unwrap();
            writeln!(stream, r#"{{"SetButton":"right"}}"#).unwrap();
            writeln!(stream).unwrap();
            writeln!(stream, r#"{{"Key":"c"}}"#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        // Collect commands (give the listener a moment to process).
        std::thread::sleep(std::time::Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();

        assert_eq!(
            cmds,
            vec![
                Command::ToggleGrid,
                Command::SetButton(MouseButton::Right),
                Command::Key(KeySymbol::Char('c')),
            ]
        );

        // Clean up.
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_does_not_crash() {
        let path = tmp_socket_path();
        let path2 = path.clone();
        let (tx, rx) = mpsc::channel();

        let _handle = std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&path2);
            let _ = listener.run(tx);
        });

        std::thread::sleep(std::time::Duration::from_millis(150));

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, "not json at all").unwrap();
            writeln!(stream, r#"{{"Key":"F13"}}"#).unwrap();
            writeln!(stream, r#""Dismiss""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(std::time::Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();
        // Only the valid command should have arrived.
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0], Command::Dismiss);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn socket_file_is_removed_when_the_sink_closes() {
        let path = tmp_socket_path();
        let listener_path = path.clone();
        let (tx, rx) = mpsc::channel();

        let handle =
            std::thread::spawn(move || UnixSocketListener::new(&listener_path).run(tx));
        std::thread::sleep(std::time::Duration::from_millis(150));
        assert!(path.exists());

        drop(rx);
        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#""ToggleGrid""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        assert!(handle.join().unwrap().is_ok());
        assert!(!path.exists());
    }

    #[test]
    fn stale_file_is_replaced() {
        let path = tmp_socket_path();
        std::fs::write(&path, "left over").unwrap();
        let listener_path = path.clone();
        let (tx, rx) = mpsc::channel();

        let _handle = std::thread::spawn(move || {
            let _ = UnixSocketListener::new(&listener_path).run(tx);
        });
        std::thread::sleep(std::time::Duration::from_millis(150));

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#""Dismiss""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }
        std::thread::sleep(std::time::Duration::from_millis(150));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Command::Dismiss]);

        let _ = std::fs::remove_file(&path);
    }
}

