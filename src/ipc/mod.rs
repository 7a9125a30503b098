//! IPC listener that accepts requests over a Unix socket.
//!
//! The key-binding layer connects to the socket, sends one newline-delimited
//! JSON request per key press and reads back the frame to apply.

pub mod listener;
