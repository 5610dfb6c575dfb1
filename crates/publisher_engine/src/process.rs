use std::process::{Output, Stdio};
use std::time::Duration;

use publisher_logging::publish_debug;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::AcquireError;

/// Runs `program` to completion, collecting stdout and stderr, and kills it
/// once `limit` has passed.
pub(crate) async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    limit: Duration,
) -> Result<Output, AcquireError> {
    publish_debug!("Running {program} {}", args.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|err| AcquireError::Spawn {
            program: program.to_string(),
            message: err.to_string(),
        })?;

    let mut stdout_pipe = child.stdout.take().ok_or_else(|| AcquireError::Spawn {
        program: program.to_string(),
        message: "stdout not captured".to_string(),
    })?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(|| AcquireError::Spawn {
        program: program.to_string(),
        message: "stderr not captured".to_string(),
    })?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    match timeout(limit, child.wait()).await {
        Ok(status) => {
            let status = status.map_err(|err| AcquireError::Spawn {
                program: program.to_string(),
                message: err.to_string(),
            })?;
            let stdout = join_pipe(program, stdout_task).await?;
            let stderr = join_pipe(program, stderr_task).await?;
            Ok(Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(AcquireError::Timeout {
                program: program.to_string(),
                after: limit,
            })
        }
    }
}

async fn join_pipe(
    program: &str,
    task: tokio::task::JoinHandle<std::io::Result<Vec<u8>>>,
) -> Result<Vec<u8>, AcquireError> {
    task.await
        .map_err(|err| err.to_string())
        .and_then(|read| read.map_err(|err| err.to_string()))
        .map_err(|message| AcquireError::Spawn {
            program: program.to_string(),
            message,
        })
}
