//! Test utilities for claude-headless integration tests.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use claude_headless::{ExecutionInput, Executor, ExecutorBuilder};
use tempfile::TempDir;

/// A shell script standing in for the `claude` binary.
///
/// The script lives in its own temp dir next to a `prompts/` directory that
/// the executor writes prompt files into, so tests can check cleanup.
pub struct FakeCli {
    dir: TempDir,
    path: PathBuf,
}

impl FakeCli {
    /// Write a `/bin/sh` script with the given body.
    pub fn new(body: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = write_script(dir.path(), "claude", body);
        std::fs::create_dir(dir.path().join("prompts")).expect("create prompt dir");
        Self { dir, path }
    }

    /// Directory holding the script; scripts can reach it via `$(dirname "$0")`.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn prompt_dir(&self) -> PathBuf {
        self.dir.path().join("prompts")
    }

    /// Executor builder pointed at this script with a short backoff.
    pub fn builder(&self) -> ExecutorBuilder {
        Executor::builder()
            .cli_path(&self.path)
            .prompt_dir(self.prompt_dir())
            .backoff_step(Duration::from_millis(10))
    }

    pub fn executor(&self) -> Executor {
        self.builder().build().expect("build executor")
    }

    /// Number of files left in the prompt directory.
    pub fn leftover_prompts(&self) -> usize {
        std::fs::read_dir(self.prompt_dir())
            .expect("read prompt dir")
            .count()
    }

    /// Read a file the script wrote next to itself.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("read script output")
    }
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");

    let mut perms = std::fs::metadata(&path).expect("stat script").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    path
}

/// A small input used by most tests.
pub fn input() -> ExecutionInput {
    ExecutionInput::new("You are a test double.", "Say OK.")
}

/// Script body that counts its invocations in `count` next to itself.
pub fn counting(rest: &str) -> String {
    format!(
        r#"cat > /dev/null
dir=$(dirname "$0")
n=$(cat "$dir/count" 2>/dev/null || echo 0)
n=$((n + 1))
echo $n > "$dir/count"
{rest}"#
    )
}
