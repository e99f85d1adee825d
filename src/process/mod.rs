//! Process management for the Claude CLI.
//!
//! Each attempt spawns two processes: the CLI itself and a small helper that
//! streams the prompt file into the CLI's stdin.
//!
//! # Architecture
//!
//! ```text
//!  prompt file        helper (cat)               claude CLI
//! ┌───────────┐      ┌────────────┐            ┌─────────────┐
//! │ claude-   │─────▶│            │──stdin────▶│             │
//! │ prompt-*. │      └────────────┘            │             │──stdout──▶ AttemptState
//! │ txt       │                                │             │──stderr──▶ AttemptState
//! └───────────┘                                └─────────────┘
//! ```
//!
//! # Termination
//!
//! On timeout the CLI receives SIGTERM, then SIGKILL if it is still alive
//! after [`KILL_GRACE`]. When stdout grows past the configured maximum the
//! CLI receives SIGTERM and the attempt fails immediately.

mod io;
mod outcome;
mod runner;
mod spawn;

pub use runner::ProcessRunner;

use std::time::Duration;

/// Program used to stream the prompt file into the CLI's stdin.
pub const STREAM_HELPER: &str = "cat";

/// Time between SIGTERM and SIGKILL.
pub const KILL_GRACE: Duration = Duration::from_secs(5);

/// How long to keep reading pipes after the CLI has exited.
///
/// Grandchildren that inherited stdout can hold the pipe open indefinitely.
pub const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Size of a single read from the CLI's stdout or stderr.
const READ_CHUNK: usize = 8 * 1024;
