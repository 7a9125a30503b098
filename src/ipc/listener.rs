//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Request`] and answered
//! with one JSON-encoded [`Response`] line once the request was processed.
//!
//! # Wire format
//!
//! ```json
//! → {"command":{"Move":{"direction":"left","modifier":false}},"focused":{"id":"42","frame":{"x":0,"y":25,"w":1440,"h":875},"screen":{"x":0,"y":25,"w":1440,"h":875}}}
//! ← {"frame":{"x":0.0,"y":25.0,"w":720.0,"h":875.0}}
//! → {"command":"ResetAll"}
//! ← {"frame":null}
//! → {"command":{"Move":{"direction":"sideways"}}}
//! ← {"frame":null,"error":"bad request: invalid direction: \"sideways\" ..."}
//! ```

use crate::command::{Request, Response};
use crate::traits::{CommandSource, Envelope};
use log::{debug, error, info};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded requests.
///
/// Each accepted connection can send multiple newline-delimited requests.
/// When the connection closes, the listener waits for the next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether the listener should keep accepting connections.
enum Flow {
    Continue,
    SinkClosed,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serve every request on one connection.
    fn serve_connection(
        stream: UnixStream,
        sink: &mpsc::Sender<Envelope>,
    ) -> Result<Flow, UnixSocketError> {
        let mut writer = stream.try_clone()?;
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let text = line?;
            if text.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<Request>(&text) {
                Ok(request) => {
                    debug!("received {:?}", request.command);
                    let (reply, replies) = mpsc::channel();
                    if sink.send(Envelope { request, reply }).is_err() {
                        return Ok(Flow::SinkClosed);
                    }
                    match replies.recv() {
                        Ok(response) => response,
                        Err(_) => return Ok(Flow::SinkClosed),
                    }
                }
                Err(e) => {
                    error!("bad request: {}: {}", text, e);
                    Response::error(format!("bad request: {}", e))
                }
            };
            serde_json::to_writer(&mut writer, &response)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        Ok(Flow::Continue)
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is closed.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Envelope>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match Self::serve_connection(stream, &sink) {
                        Ok(Flow::Continue) => debug!("client disconnected"),
                        Ok(Flow::SinkClosed) => {
                            info!("sink closed, shutting down");
                            let _ = std::fs::remove_file(&self.path);
                            return Ok(());
                        }
                        Err(e) => error!("connection error: {}", e),
                    }
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests
