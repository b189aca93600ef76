use std::io::{BufRead, BufReader, PipeReader, SeekFrom};
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use crate::command::Command;
use crate::errors::TriageError;
use crate::reporting::console::LiveTail;
use super::estimator::{TokenEstimator, WordPunctEstimator};
use super::{ExecStatus, ExecutionRecord, PROMPT_SAFETY_MARGIN};

pub const TRUNCATION_MARKER: &str = "[Output truncated due to context window limit]";

/// How long output is still read once the tool itself has exited. Background
/// children that keep the pipe open past this are not waited for.
pub const EXIT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Budget left for tool output once the prompt margin is reserved.
pub fn token_budget(context_length: usize) -> usize {
    context_length.saturating_sub(PROMPT_SAFETY_MARGIN)
}

/// Marker appended when a run hits the wall-clock bound.
pub fn timeout_marker(timeout: Duration) -> String {
    let secs = timeout.as_secs();
    let span = if secs >= 60 && secs % 60 == 0 {
        format!("{}-minute", secs / 60)
    } else if secs > 0 {
        format!("{}-second", secs)
    } else {
        format!("{}-millisecond", timeout.as_millis())
    };
    format!("Process terminated due to {} timeout", span)
}

/// Runs one command, streaming its combined output into a file until the
/// token budget is spent.
pub struct BoundedOutputCapture {
    budget: usize,
    timeout: Duration,
    estimator: Box<dyn TokenEstimator>,
    live_tail: bool,
}

impl BoundedOutputCapture {
    pub fn new(budget: usize, timeout: Duration) -> Self {
        Self {
            budget,
            timeout,
            estimator: Box::new(WordPunctEstimator),
            live_tail: false,
        }
    }

    pub fn with_estimator(mut self, estimator: Box<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Echo the first lines of output to the console while capturing.
    pub fn with_live_tail(mut self, enabled: bool) -> Self {
        self.live_tail = enabled;
        self
    }

    /// Run `command` with stdout and stderr sharing one pipe, writing the
    /// bounded output to `output_path` (overwritten).
    pub async fn run(&self, command: &Command, output_path: &Path) -> Result<ExecutionRecord, TriageError> {
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let output_path = output_path.to_path_buf();
        // Created before spawning so the file exists whatever happens next.
        let mut file = tokio::fs::File::create(&output_path).await?;
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.timeout;

        info!(command = %command, budget = self.budget, "Executing");

        let (reader, writer) = std::io::pipe()?;
        let mut builder = tokio::process::Command::new(command.program());
        builder
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .kill_on_drop(true);
        #[cfg(unix)]
        builder.process_group(0);
        let spawned = builder.spawn();
        // The builder holds the parent's write ends; EOF needs them closed.
        drop(builder);

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!(tool = %command.tool_name(), error = %e, "Failed to start process");
                file.flush().await?;
                return Ok(ExecutionRecord {
                    command: command.clone(),
                    output_path,
                    truncated: false,
                    status: ExecStatus::FailedToStart { reason: e.to_string() },
                    tokens_captured: 0,
                    duration: started.elapsed(),
                });
            }
        };
        let group = child.id();

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        std::thread::spawn(move || forward_lines(reader, tx));

        let mut tail = LiveTail::new(self.live_tail);
        let mut tokens = 0usize;
        let mut written = 0u64;
        let mut truncated = false;
        let mut timed_out = false;
        let mut exited: Option<Option<i32>> = None;
        let mut stop_at = deadline;

        loop {
            tokio::select! {
                status = child.wait(), if exited.is_none() => {
                    exited = Some(exit_code(command, status));
                    stop_at = deadline.min(tokio::time::Instant::now() + EXIT_DRAIN_GRACE);
                }
                received = tokio::time::timeout_at(stop_at, rx.recv()) => match received {
                    Err(_) => {
                        if exited.is_none() {
                            timed_out = true;
                        } else {
                            debug!(tool = %command.tool_name(), "Output still open after exit, capture stopped");
                        }
                        break;
                    }
                    Ok(None) => break,
                    Ok(Some(line)) => {
                        let line_tokens = self.estimator.estimate(&line);
                        if tokens + line_tokens >= self.budget {
                            file.write_all(format!("{}\n", TRUNCATION_MARKER).as_bytes()).await?;
                            truncated = true;
                            tail.truncated();
                            debug!(tool = %command.tool_name(), tokens, "Token budget exhausted, output capture stopped");
                            break;
                        }
                        tail.line(&line);
                        let mut bytes = line.into_bytes();
                        bytes.push(b'\n');
                        file.write_all(&bytes).await?;
                        written += bytes.len() as u64;
                        tokens += line_tokens;
                    }
                }
            }
        }
        // The reader keeps draining into the void so the child never stalls on a full pipe.
        drop(rx);
        tail.finish();

        let exit_code = match exited {
            Some(code) => Some(code),
            None if timed_out => None,
            None => match tokio::time::timeout_at(deadline, child.wait()).await {
                Ok(status) => Some(exit_code(command, status)),
                Err(_) => None,
            },
        };
        // Whatever the tool left behind goes with it, so nothing holds the pipe open.
        kill_process_group(group);

        let status = match exit_code {
            Some(exit_code) => ExecStatus::Completed { exit_code },
            None => {
                if let Err(e) = child.kill().await {
                    warn!(tool = %command.tool_name(), error = %e, "Failed to kill timed out process");
                }
                // Cut back to the captured prefix so the timeout marker is the only marker.
                file.flush().await?;
                file.set_len(written).await?;
                file.seek(SeekFrom::Start(written)).await?;
                let marker = timeout_marker(self.timeout);
                file.write_all(format!("{}\n", marker).as_bytes()).await?;
                warn!(tool = %command.tool_name(), timeout_secs = self.timeout.as_secs(), "{}", marker);
                ExecStatus::TimedOut
            }
        };
        file.flush().await?;

        Ok(ExecutionRecord {
            command: command.clone(),
            output_path,
            truncated,
            status,
            tokens_captured: tokens,
            duration: started.elapsed(),
        })
    }
}

fn exit_code(command: &Command, status: std::io::Result<std::process::ExitStatus>) -> Option<i32> {
    match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!(tool = %command.tool_name(), error = %e, "Failed to wait on process");
            None
        }
    }
}

/// Signal every process in the tool's group. The group may already be gone.
#[cfg(unix)]
fn kill_process_group(group: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(group) = group else { return };
    match killpg(Pid::from_raw(group as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!(group, error = %e, "Failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_group: Option<u32>) {}

/// Blocking line reader for the shared output pipe. Runs until every writer is gone.
fn forward_lines(pipe: PipeReader, tx: mpsc::UnboundedSender<String>) {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let _ = tx.send(line.trim_end_matches(['\n', '\r']).to_string());
            }
        }
    }
}
