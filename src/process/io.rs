//! I/O primitives for one attempt: the prompt file, the stdin feed, and
//! the bounded output accumulators.

use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};

use super::STREAM_HELPER;
use crate::{Error, Result};

/// The combined prompt persisted for one attempt.
///
/// Named `claude-prompt-<unix-millis>-<random>.txt` so concurrent attempts
/// never collide. The file is deleted by [`remove`](PromptFile::remove), or
/// on drop if the attempt is abandoned.
#[derive(Debug)]
pub(crate) struct PromptFile {
    file: NamedTempFile,
}

impl PromptFile {
    /// Write `payload` to a fresh file in `dir`.
    pub(crate) fn create(dir: &Path, payload: &str) -> Result<Self> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        let mut file = tempfile::Builder::new()
            .prefix(&format!("claude-prompt-{millis}-"))
            .suffix(".txt")
            .rand_bytes(9)
            .tempfile_in(dir)
            .map_err(Error::PromptFile)?;

        file.write_all(payload.as_bytes())
            .and_then(|()| file.flush())
            .map_err(Error::PromptFile)?;

        tracing::debug!(path = %file.path().display(), bytes = payload.len(), "wrote prompt file");
        Ok(Self { file })
    }

    pub(crate) fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file. Failures are logged, never returned.
    pub(crate) fn remove(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove prompt file");
        }
    }
}

/// Copy the helper's stdout into the CLI's stdin, then close it.
///
/// A broken pipe means the CLI stopped reading its input, which is its own
/// business; any other failure of the helper is a [`Error::StreamFailure`].
pub(crate) async fn feed_stdin(mut helper: Child, mut stdin: ChildStdin) -> Result<()> {
    let mut source = helper.stdout.take().ok_or_else(|| Error::StreamFailure {
        message: format!("{STREAM_HELPER} stdout was not captured"),
    })?;
    let helper_stderr = helper.stderr.take();

    let copied = match tokio::io::copy(&mut source, &mut stdin).await {
        Ok(n) => n,
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!("claude process closed stdin before the prompt was fully written");
            return Ok(());
        }
        Err(e) => {
            return Err(Error::StreamFailure {
                message: e.to_string(),
            })
        }
    };

    if let Err(e) = stdin.shutdown().await {
        tracing::debug!(error = %e, "failed to close claude stdin");
    }
    drop(stdin);

    let mut diagnostics = String::new();
    if let Some(mut stderr) = helper_stderr {
        if let Err(e) = stderr.read_to_string(&mut diagnostics).await {
            tracing::debug!(error = %e, "failed to read {STREAM_HELPER} stderr");
        }
    }

    let status = helper.wait().await.map_err(|e| Error::StreamFailure {
        message: e.to_string(),
    })?;
    if !status.success() {
        return Err(Error::StreamFailure {
            message: format!("{STREAM_HELPER} exited with {status}: {}", diagnostics.trim()),
        });
    }

    tracing::debug!(bytes = copied, "prompt streamed to claude stdin");
    Ok(())
}

/// Output and flags accumulated during a single attempt.
#[derive(Debug)]
pub(crate) struct AttemptState {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    stdout_len: usize,
    max_buffer: usize,
    timed_out: bool,
    killed: bool,
}

impl AttemptState {
    pub(crate) fn new(max_buffer: usize) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            stdout_len: 0,
            max_buffer,
            timed_out: false,
            killed: false,
        }
    }

    /// Count a stdout chunk against the limit, then append it.
    ///
    /// A chunk that pushes the total past the limit is not appended.
    pub(crate) fn push_stdout(&mut self, chunk: &[u8]) -> Result<()> {
        self.stdout_len = self.stdout_len.saturating_add(chunk.len());
        if self.stdout_len > self.max_buffer {
            return Err(Error::BufferExceeded {
                limit: self.max_buffer,
            });
        }
        self.stdout.extend_from_slice(chunk);
        Ok(())
    }

    pub(crate) fn push_stderr(&mut self, chunk: &[u8]) {
        self.stderr.extend_from_slice(chunk);
    }

    pub(crate) fn mark_timed_out(&mut self) {
        self.timed_out = true;
    }

    pub(crate) fn mark_killed(&mut self) {
        self.killed = true;
    }

    pub(crate) fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub(crate) fn killed(&self) -> bool {
        self.killed
    }

    pub(crate) fn stdout_len(&self) -> usize {
        self.stdout_len
    }

    pub(crate) fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub(crate) fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::process::Stdio;

    use super::*;
    use crate::process::spawn::spawn_stream_helper;

    #[test]
    fn push_stdout_within_limit() {
        let mut state = AttemptState::new(8);
        state.push_stdout(b"1234").unwrap();
        state.push_stdout(b"5678").unwrap();

        assert_eq!(state.stdout_len(), 8);
        assert_eq!(state.stdout_text(), "12345678");
    }

    #[test]
    fn push_stdout_past_limit_fails_without_appending() {
        let mut state = AttemptState::new(8);
        state.push_stdout(b"12345").unwrap();

        let err = state.push_stdout(b"6789").unwrap_err();
        assert!(matches!(err, Error::BufferExceeded { limit: 8 }));
        assert_eq!(state.stdout_text(), "12345");
    }

    #[test]
    fn chunks_split_inside_utf8_decode_cleanly() {
        let text = "héllo";
        let bytes = text.as_bytes();
        let mut state = AttemptState::new(1024);
        state.push_stdout(&bytes[..2]).unwrap();
        state.push_stdout(&bytes[2..]).unwrap();

        assert_eq!(state.stdout_text(), text);
    }

    #[test]
    fn flags_start_cleared() {
        let mut state = AttemptState::new(1);
        assert!(!state.timed_out());
        assert!(!state.killed());

        state.mark_timed_out();
        state.mark_killed();
        state.push_stderr(b"warn");
        assert!(state.timed_out());
        assert!(state.killed());
        assert_eq!(state.stderr_text(), "warn");
    }

    #[test]
    fn prompt_file_naming_and_removal() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = PromptFile::create(dir.path(), "sys\n\n---\n\nuser").unwrap();
        let path = prompt.path().to_path_buf();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("claude-prompt-"));
        assert!(name.ends_with(".txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sys\n\n---\n\nuser");

        prompt.remove();
        assert!(!path.exists());
    }

    #[test]
    fn prompt_files_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = PromptFile::create(dir.path(), "a").unwrap();
        let b = PromptFile::create(dir.path(), "b").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn prompt_file_in_missing_dir_fails() {
        let err = PromptFile::create(Path::new("/nonexistent/prompt/dir"), "x").unwrap_err();
        assert!(matches!(err, Error::PromptFile(_)));
    }

    #[tokio::test]
    async fn feed_stdin_reports_missing_prompt() {
        let helper = spawn_stream_helper(Path::new("/nonexistent/claude-prompt.txt")).unwrap();
        let mut sink = tokio::process::Command::new("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .unwrap();
        let stdin = sink.stdin.take().unwrap();

        let err = feed_stdin(helper, stdin).await.unwrap_err();
        assert!(matches!(err, Error::StreamFailure { .. }));
        assert!(err.to_string().starts_with("failed to read prompt file"));
    }

    #[tokio::test]
    async fn feed_stdin_copies_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = PromptFile::create(dir.path(), "hello prompt").unwrap();
        let helper = spawn_stream_helper(prompt.path()).unwrap();
        let mut sink = tokio::process::Command::new("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .unwrap();
        let stdin = sink.stdin.take().unwrap();

        feed_stdin(helper, stdin).await.unwrap();
        let output = sink.wait_with_output().await.unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hello prompt");
    }
}
