//! [`TiledWindowGate`] backed by a tiling manager's command-line client.
//!
//! Two invocations per uncached lookup:
//!
//! 1. `<binary> <focused_args>` prints the manager's id for the focused
//!    window (empty output: the manager does not know the window).
//! 2. `<binary> <describe_args>` with `{id}` replaced prints a description;
//!    the window is tiled iff it contains `marker`.
//!
//! Every invocation is bounded by a timeout and any failure reads as "not
//! tiled".  Answers are cached per *manager* id, since that is the id the
//! manager's own state is keyed by.

use super::cache::TtlCache;
use crate::command::{Direction, WindowId};
use crate::config::TilingConfig;
use crate::traits::TiledWindowGate;
use log::{debug, warn};
use std::cell::RefCell;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Errors from a single CLI invocation.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("failed to run {0}: {1}")]
    Spawn(String, #[source] std::io::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("exited with {0}")]
    Status(ExitStatus),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

pub struct CliGate {
    binary: PathBuf,
    focused_args: Vec<String>,
    describe_args: Vec<String>,
    delegate_args: Option<Vec<String>>,
    marker: String,
    timeout: Duration,
    cache: RefCell<TtlCache<String, bool>>,
}

impl CliGate {
    pub fn new(binary: PathBuf, config: &TilingConfig) -> Self {
        Self {
            binary,
            focused_args: config.focused_args.clone(),
            describe_args: config.describe_args.clone(),
            delegate_args: config.delegate_args.clone(),
            marker: config.marker.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            cache: RefCell::new(TtlCache::new(Duration::from_millis(config.cache_ttl_ms))),
        }
    }

    /// Ask the manager whether its focused window is tiled.
    fn query(&self) -> Result<bool, GateError> {
        let external = self.run(&self.focused_args)?.trim().to_string();
        if external.is_empty() {
            return Ok(false);
        }

        let now = Instant::now();
        if let Some(tiled) = self.cache.borrow_mut().get(&external, now) {
            debug!("tiling state of {} from cache: {}", external, tiled);
            return Ok(tiled);
        }

        let args = substitute(&self.describe_args, "{id}", &external);
        let tiled = self.run(&args)?.contains(&self.marker);
        self.cache.borrow_mut().insert(external, tiled, now);
        Ok(tiled)
    }

    /// Run the binary with `args`, returning its stdout.
    fn run(&self, args: &[String]) -> Result<String, GateError> {
        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GateError::Spawn(self.binary.display().to_string(), e))?;

        // Drain stdout concurrently; a full pipe would stall the child.
        let (out_tx, out_rx) = mpsc::channel();
        if let Some(mut stdout) = child.stdout.take() {
            std::thread::spawn(move || {
                let mut out = String::new();
                let _ = out_tx.send(stdout.read_to_string(&mut out).map(|_| out));
            });
        }

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GateError::Timeout(self.timeout));
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        };

        // Stdout stays open as long as anything the child left behind
        // holds it, so the read shares the deadline.
        let remaining = deadline.saturating_duration_since(Instant::now());
        let out = match out_rx.recv_timeout(remaining) {
            Ok(read) => read?,
            Err(mpsc::RecvTimeoutError::Timeout) => return Err(GateError::Timeout(self.timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => String::new(),
        };
        if !status.success() {
            return Err(GateError::Status(status));
        }
        Ok(out)
    }
}

impl TiledWindowGate for CliGate {
    fn is_tiled(&self, window: &WindowId) -> bool {
        match self.query() {
            Ok(tiled) => tiled,
            Err(e) => {
                debug!("tiling query for {} failed, treating as floating: {}", window, e);
                false
            }
        }
    }

    fn delegate(&self, direction: Direction) {
        let Some(args) = &self.delegate_args else {
            return;
        };
        let args = substitute(args, "{direction}", &direction.to_string());
        if let Err(e) = self.run(&args) {
            warn!("delegating {} to tiling manager failed: {}", direction, e);
        }
    }
}

/// Replace `placeholder` in every argument.
fn substitute(args: &[String], placeholder: &str, value: &str) -> Vec<String> {
    args.iter().map(|a| a.replace(placeholder, value)).collect()
}

//  Tests
