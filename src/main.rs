//! Entry point for the **ratiosnap** daemon.
//!
//! Spawns the socket listener on a background thread and processes every
//! request on the main thread, so per-window state has exactly one writer.

use log::{debug, error, info, warn};
use ratiosnap::config::Config;
use ratiosnap::ipc::listener::UnixSocketListener;
use ratiosnap::relay::{serve, RelayHost};
use ratiosnap::snapper::Snapper;
use ratiosnap::traits::{CommandSource, Envelope, TiledWindowGate};
use std::sync::mpsc;

/// Default socket path for the request listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/ratiosnap.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/ratiosnap`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("ratiosnap")
}

/// Load `$XDG_CONFIG_HOME/ratiosnap/config.json`.
///
/// A missing file means defaults; a file that exists but is invalid is
/// fatal, so a typo never silently turns into default behaviour.
fn load_config() -> Result<Config, ratiosnap::config::ConfigError> {
    let path = config_dir().join("config.json");
    if !path.exists() {
        info!("no config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let cfg = Config::load(&path)?;
    info!("loaded config from {}", path.display());
    Ok(cfg)
}

//  Main

fn main() {
    env_logger::init();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let bindings = match config.key_bindings() {
        Ok(b) => b,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("{} key chord(s) bound", bindings.len());
    for (chord, resolved) in bindings.iter() {
        debug!("  {} → {} (modifier: {})", chord, resolved.action, resolved.modifier);
    }

    let gate = ratiosnap::gate::from_config(&config.tiling);
    let mut snapper = Snapper::new(RelayHost::new(), gate, config.calculator());
    snapper.set_bindings(bindings);

    let (tx, rx) = mpsc::channel::<Envelope>();
    spawn_command_sources(tx);

    run_event_loop(snapper, rx);
}

//  Event loop

fn run_event_loop<G: TiledWindowGate>(
    mut snapper: Snapper<RelayHost, G>,
    rx: mpsc::Receiver<Envelope>,
) {
    info!("ratiosnap running");
    for Envelope { request, reply } in rx {
        let response = serve(&mut snapper, request);
        if reply.send(response).is_err() {
            warn!("client went away before the response was sent");
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Envelope>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
