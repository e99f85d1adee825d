//! Prompt streaming failures, in their own binary because they replace
//! `cat` on the process-wide `PATH`.

mod common;

use claude_headless::Error;
use tempfile::TempDir;

use common::{input, write_script, FakeCli};

#[tokio::test]
async fn failing_stream_helper_is_never_success() {
    let bin = TempDir::new().expect("create bin dir");
    write_script(bin.path(), "cat", "echo 'cat: prompt unreadable' >&2\nexit 1");
    let path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{path}", bin.path().display()));

    // Builtins only: `cat` now resolves to the failing script.
    let cli = FakeCli::new("while read -r _; do :; done\necho OK");
    let executor = cli.executor();

    for run in 0..20 {
        match executor.execute(&input()).await {
            Err(Error::StreamFailure { message }) => {
                assert!(message.contains("prompt unreadable"), "run {run}: {message}");
            }
            other => panic!("run {run}: expected StreamFailure, got {other:?}"),
        }
    }
    assert_eq!(cli.leftover_prompts(), 0);
}
