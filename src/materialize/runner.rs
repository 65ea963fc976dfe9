use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{KmpgenError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything a finished parameterization process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Set when the process exited but something it left running still held
    /// its output open at the deadline; the streams hold what arrived in time.
    pub truncated: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Text worth showing the caller: stderr on failure when there is any,
    /// otherwise stdout followed by stderr.
    pub fn diagnostics(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        if !self.success() && !stderr.is_empty() {
            return stderr.to_string();
        }
        match (stdout.is_empty(), stderr.is_empty()) {
            (_, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Runs the template's parameterization step inside a copied project.
///
/// Identifiers reach the step only through `stdin_payload`, never through
/// arguments or a shell string.
pub trait SetupRunner {
    /// Script path relative to the project root; it must exist before `run` is called.
    fn script(&self) -> &str;

    /// Run to completion in `cwd`, feeding `stdin_payload` and capturing all output.
    fn run(&self, cwd: &Path, stdin_payload: &str) -> Result<ProcessOutput>;
}

/// Runs `<interpreter> ./<script>` as a child process.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    pub interpreter: String,
    pub script: String,
    /// Kill the child if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl ScriptRunner {
    pub fn from_config(config: &crate::config::GeneratorConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            script: config.setup_script.clone(),
            timeout: config.setup_timeout(),
        }
    }
}

impl SetupRunner for ScriptRunner {
    fn script(&self) -> &str {
        &self.script
    }

    fn run(&self, cwd: &Path, stdin_payload: &str) -> Result<ProcessOutput> {
        let deadline = self.timeout.map(|limit| Instant::now() + limit);
        let mut child = Command::new(&self.interpreter)
            .arg(format!("./{}", self.script))
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| KmpgenError::SetupSpawn {
                script: self.script.clone(),
                source: e,
            })?;

        tracing::debug!(pid = child.id(), script = %self.script, "setup script started");

        if let Some(mut stdin) = child.stdin.take() {
            let payload = stdin_payload.to_owned();
            // a script that exits without reading everything closes the pipe early
            thread::spawn(move || {
                let _ = stdin.write_all(payload.as_bytes());
            });
        }
        let stdout = child.stdout.take().map(PipeReader::spawn);
        let stderr = child.stderr.take().map(PipeReader::spawn);

        let status = match deadline {
            Some(deadline) => wait_until(&mut child, deadline),
            None => child.wait().map(Some),
        }
        .map_err(|e| KmpgenError::Io {
            context: format!("waiting for {}", self.script),
            source: e,
        })?;

        let Some(status) = status else {
            return Err(KmpgenError::SetupTimedOut {
                script: self.script.clone(),
                seconds: self.timeout.map_or(0, |t| t.as_secs()),
            });
        };

        let (stdout, stdout_done) = PipeReader::finish(stdout, deadline);
        let (stderr, stderr_done) = PipeReader::finish(stderr, deadline);
        let truncated = !(stdout_done && stderr_done);
        if truncated {
            tracing::warn!(
                script = %self.script,
                "setup script exited but its output was still open at the deadline"
            );
        }

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout,
            stderr,
            truncated,
        })
    }
}

/// Drains one child pipe on a background thread into a shared buffer, so the
/// bytes read so far stay available if the pipe never closes.
struct PipeReader {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl PipeReader {
    fn spawn<R: Read + Send + 'static>(mut pipe: R) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => {
                        if let Ok(mut buf) = sink.lock() {
                            buf.extend_from_slice(&chunk[..n]);
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(_) => break,
                }
            }
            let _ = tx.send(());
        });
        Self { buf, done }
    }

    /// Wait for end of stream until `deadline`, then return the text read and
    /// whether the stream was complete.
    fn finish(reader: Option<Self>, deadline: Option<Instant>) -> (String, bool) {
        let Some(reader) = reader else {
            return (String::new(), true);
        };
        let complete = match deadline {
            Some(deadline) => reader
                .done
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .is_ok(),
            None => reader.done.recv().is_ok(),
        };
        let bytes = reader
            .buf
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default();
        (String::from_utf8_lossy(&bytes).into_owned(), complete)
    }
}

/// Poll until the child exits or `deadline` passes. On expiry the child is
/// killed and reaped, and `None` is returned.
fn wait_until(child: &mut Child, deadline: Instant) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            tracing::warn!(pid = child.id(), "setup script timed out, killing");
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_prefer_stderr_on_failure() {
        let out = ProcessOutput {
            exit_code: Some(1),
            stdout: "progress\n".into(),
            stderr: "bad input\n".into(),
            ..ProcessOutput::default()
        };
        assert_eq!(out.diagnostics(), "bad input");
    }

    #[test]
    fn diagnostics_fall_back_to_stdout_on_failure() {
        let out = ProcessOutput {
            exit_code: Some(2),
            stdout: "only stdout".into(),
            stderr: "  ".into(),
            ..ProcessOutput::default()
        };
        assert_eq!(out.diagnostics(), "only stdout");
    }

    #[test]
    fn diagnostics_combine_streams_on_success() {
        let out = ProcessOutput {
            exit_code: Some(0),
            stdout: "done".into(),
            stderr: "note".into(),
            ..ProcessOutput::default()
        };
        assert!(out.success());
        assert_eq!(out.diagnostics(), "done\nnote");
    }

    #[test]
    fn signal_termination_is_not_success() {
        let out = ProcessOutput {
            exit_code: None,
            ..ProcessOutput::default()
        };
        assert!(!out.success());
    }

    #[test]
    fn missing_interpreter_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptRunner {
            interpreter: "kmpgen-no-such-interpreter".into(),
            script: "setup.sh".into(),
            timeout: None,
        };
        assert!(matches!(
            runner.run(dir.path(), "").unwrap_err(),
            KmpgenError::SetupSpawn { .. }
        ));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn write_script(dir: &Path, body: &str) {
            std::fs::write(dir.join("setup.sh"), body).unwrap();
        }

        fn runner(timeout: Option<Duration>) -> ScriptRunner {
            ScriptRunner {
                interpreter: "sh".into(),
                script: "setup.sh".into(),
                timeout,
            }
        }

        #[test]
        fn feeds_stdin_and_captures_output() {
            let dir = tempfile::tempdir().unwrap();
            write_script(
                dir.path(),
                "read a\nread b\necho \"got $a/$b\"\necho warn >&2\n",
            );
            let out = runner(None).run(dir.path(), "one\ntwo\n").unwrap();
            assert_eq!(out.exit_code, Some(0));
            assert_eq!(out.stdout, "got one/two\n");
            assert_eq!(out.stderr, "warn\n");
            assert!(!out.truncated);
        }

        #[test]
        fn runs_in_the_given_directory() {
            let dir = tempfile::tempdir().unwrap();
            write_script(dir.path(), "touch marker\n");
            runner(None).run(dir.path(), "").unwrap();
            assert!(dir.path().join("marker").exists());
        }

        #[test]
        fn reports_non_zero_exit() {
            let dir = tempfile::tempdir().unwrap();
            write_script(dir.path(), "echo nope >&2\nexit 7\n");
            let out = runner(Some(Duration::from_secs(30)))
                .run(dir.path(), "")
                .unwrap();
            assert_eq!(out.exit_code, Some(7));
            assert_eq!(out.diagnostics(), "nope");
        }

        #[test]
        fn kills_scripts_that_overrun_the_timeout() {
            let dir = tempfile::tempdir().unwrap();
            write_script(dir.path(), "exec sleep 30\n");
            let started = Instant::now();
            let err = runner(Some(Duration::from_millis(200)))
                .run(dir.path(), "")
                .unwrap_err();
            assert!(matches!(err, KmpgenError::SetupTimedOut { .. }));
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn background_child_holding_output_does_not_outlast_the_timeout() {
            let dir = tempfile::tempdir().unwrap();
            write_script(dir.path(), "sleep 6 &\necho started\n");
            let started = Instant::now();

            let out = runner(Some(Duration::from_secs(1)))
                .run(dir.path(), "")
                .unwrap();

            assert!(
                started.elapsed() < Duration::from_secs(4),
                "run took {:?} with a 1s timeout",
                started.elapsed()
            );
            assert_eq!(out.exit_code, Some(0));
            assert!(out.truncated);
            assert_eq!(out.stdout, "started\n");
        }
    }
}
