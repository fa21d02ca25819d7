//! Line-oriented JSON command runner.
//!
//! One `CommandEnvelope` per input line, one `CommandReply` per output line,
//! in order. Commands run one at a time. A line that does not decode gets a
//! validation rejection and the runner moves on.

use cantstop_shared::{CommandEnvelope, CommandReply, ErrorKind};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::App;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not encode reply: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Counts for the end-of-input log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub commands: usize,
    pub rejected: usize,
    pub malformed: usize,
}

/// Read commands until end of input, writing a reply for each.
pub async fn run<R, W>(app: &App, input: R, mut output: W) -> Result<RunStats, RunnerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = RunStats::default();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let reply = match serde_json::from_str::<CommandEnvelope>(line) {
            Ok(envelope) => {
                stats.commands += 1;
                let reply = app.use_cases.commands.dispatch(&envelope).await;
                if !reply.is_ok() {
                    stats.rejected += 1;
                }
                reply
            }
            Err(e) => {
                stats.malformed += 1;
                tracing::warn!(error = %e, "Malformed command line");
                CommandReply::rejected(ErrorKind::Validation, format!("malformed command: {e}"))
            }
        };

        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
    }

    tracing::info!(
        commands = stats.commands,
        rejected = stats.rejected,
        malformed = stats.malformed,
        "Input finished"
    );
    Ok(stats)
}
