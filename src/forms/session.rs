//! Line-oriented session over a byte stream.
//!
//! Input is one JSON [`FormSubmission`] per line. Output is one JSON object
//! per line: `{"verdict": ...}`, `{"receipt": ...}` or
//! `{"error": {"line": N, "message": ...}}`.
//!
//! A line that is not UTF-8, or not a submission, yields an error line and
//! the session moves on to the next one. Input stops on EOF, on a read
//! error or when `shutdown` resolves. Receipts for submissions already
//! accepted are drained before returning.

use std::future::Future;
use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::forms::gate::SubmissionGate;
use crate::forms::submission::{SubmissionDispatcher, SubmissionReceipt};
use crate::forms::types::{FormSubmission, SubmissionVerdict};

/// One decoded input line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionLine {
    /// Whitespace only. Ignored.
    Blank,
    Submission(FormSubmission),
    /// Not UTF-8 or not a submission. Carries the reason.
    Malformed(String),
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionOutput<'a> {
    Verdict(&'a SubmissionVerdict),
    Receipt(&'a SubmissionReceipt),
    Error { line: usize, message: String },
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub lines: usize,
    pub verdicts: usize,
    pub errors: usize,
    pub receipts: usize,
}

/// Decode one raw line, newline included or not.
pub fn decode_line(raw: &[u8]) -> SessionLine {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text.trim(),
        Err(e) => return SessionLine::Malformed(format!("line is not valid UTF-8: {}", e)),
    };
    if text.is_empty() {
        return SessionLine::Blank;
    }
    match serde_json::from_str(text) {
        Ok(form) => SessionLine::Submission(form),
        Err(e) => SessionLine::Malformed(e.to_string()),
    }
}

/// Splits a byte stream on `\n` without requiring UTF-8 up front.
#[derive(Debug)]
pub struct SubmissionLines<R> {
    reader: R,
    pending: Vec<u8>,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin> SubmissionLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            line_no: 0,
        }
    }

    /// Next line and its 1-based number, or `None` at end of input.
    ///
    /// Cancel safe: bytes read before the future is dropped are kept and
    /// completed by the next call.
    pub async fn next_line(&mut self) -> io::Result<Option<(usize, SessionLine)>> {
        let read = self.reader.read_until(b'\n', &mut self.pending).await?;
        if read == 0 && self.pending.is_empty() {
            return Ok(None);
        }
        self.line_no += 1;
        let line = decode_line(&self.pending);
        self.pending.clear();
        Ok(Some((self.line_no, line)))
    }
}

/// Run the gate over `input` and write results to `output`.
///
/// Only write failures are returned as errors.
pub async fn run_session<R, W, S>(
    gate: &SubmissionGate,
    dispatcher: SubmissionDispatcher,
    mut receipts: UnboundedReceiver<SubmissionReceipt>,
    input: R,
    output: &mut W,
    shutdown: S,
) -> io::Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = SubmissionLines::new(input);
    let mut summary = SessionSummary::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            next = lines.next_line() => match next {
                Ok(Some((line_no, line))) => {
                    summary.lines = line_no;
                    match line {
                        SessionLine::Blank => {}
                        SessionLine::Submission(form) => {
                            let verdict = gate.evaluate(&form);
                            emit(output, &SessionOutput::Verdict(&verdict)).await?;
                            dispatcher.dispatch(&form.form_id, &verdict);
                            summary.verdicts += 1;
                        }
                        SessionLine::Malformed(message) => {
                            tracing::warn!(line = line_no, error = %message, "Malformed submission");
                            emit(output, &SessionOutput::Error { line: line_no, message }).await?;
                            summary.errors += 1;
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Reading input failed, stopping");
                    break;
                }
            },
            Some(receipt) = receipts.recv() => {
                emit(output, &SessionOutput::Receipt(&receipt)).await?;
                summary.receipts += 1;
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupted, stopping input");
                break;
            }
        }
    }

    // In-flight submissions still complete.
    drop(dispatcher);
    while let Some(receipt) = receipts.recv().await {
        emit(output, &SessionOutput::Receipt(&receipt)).await?;
        summary.receipts += 1;
    }

    Ok(summary)
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, line: &SessionOutput<'_>) -> io::Result<()> {
    let mut bytes = serde_json::to_vec(line)?;
    bytes.push(b'\n');
    output.write_all(&bytes).await?;
    output.flush().await
}
