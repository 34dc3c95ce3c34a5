//! Shared plumbing for running external tools to completion.

use std::collections::VecDeque;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Number of stderr lines kept for error reports.
const STDERR_TAIL_LINES: usize = 20;

/// How an external tool run ended.
#[derive(Debug)]
pub(crate) enum RunOutcome {
    Exited { status: ExitStatus, stderr_tail: String },
    TimedOut,
}

/// Process group of a spawned tool. Killed on drop unless released.
///
/// papermill starts the Jupyter kernel as its own child, so killing papermill
/// alone would leave the kernel running.
struct ProcessGroup(Option<i32>);

impl ProcessGroup {
    fn of(child: &Child) -> Self {
        if cfg!(unix) {
            Self(child.id().map(|pid| pid as i32))
        } else {
            Self(None)
        }
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.0.take() {
            #[cfg(unix)]
            // SAFETY: a negative pid makes kill(2) signal that process group only.
            let _ = unsafe { libc::kill(-pgid, libc::SIGKILL) };
            #[cfg(not(unix))]
            let _ = pgid;
        }
    }

    fn release(&mut self) {
        self.0 = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Spawns `command` and waits for it, streaming stderr into the debug log.
///
/// Stdin and stdout are detached. On Unix the tool leads its own process
/// group, and the whole group is killed when the deadline from `timeout_secs`
/// passes or when the returned future is dropped before the tool exits.
pub(crate) async fn run_to_completion(
    mut command: Command,
    tool: &str,
    timeout_secs: Option<u64>,
) -> std::io::Result<RunOutcome> {
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;
    let mut group = ProcessGroup::of(&child);

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("stderr was not captured"))?;
    let mut lines = BufReader::new(stderr).lines();

    let run = async {
        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        while let Some(line) = lines.next_line().await? {
            debug!(tool, "{}", line);
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        let status = child.wait().await?;
        let tail: Vec<String> = tail.into_iter().collect();
        Ok::<RunOutcome, std::io::Error>(RunOutcome::Exited {
            status,
            stderr_tail: tail.join("\n"),
        })
    };

    let outcome = match timeout_secs {
        None => run.await?,
        Some(secs) => {
            let result = timeout(Duration::from_secs(secs), run).await;
            match result {
                Ok(outcome) => outcome?,
                Err(_) => {
                    group.kill();
                    let _ = child.kill().await;
                    return Ok(RunOutcome::TimedOut);
                }
            }
        }
    };

    group.release();
    Ok(outcome)
}
