//! PDF backend that pipes HTML through an external converter process.

use std::process::Stdio;
use std::time::Duration;

use quill_core::capability::BoxFuture;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::BackendError;
use crate::pdf::PdfBackend;

/// Markers in converter stderr that mean the content did not fit the page.
const LAYOUT_MARKERS: &[&str] = &["LayoutError", "page size", "does not fit"];

/// Runs `weasyprint - -` (or any command with the same stdin/stdout
/// contract) per conversion.
#[derive(Debug, Clone)]
pub struct WeasyPrintBackend {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl WeasyPrintBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Split a whitespace-separated command line, e.g. `"weasyprint - -"`.
    pub fn from_command_line(command: &str, timeout: Duration) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect(), timeout))
    }

    async fn run(&self, html: &str) -> Result<Vec<u8>, BackendError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::Unavailable("converter stdin not captured".to_string()))?;
        let input = html.as_bytes().to_vec();
        let feed = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| BackendError::Unavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(stderr));
        }
        if let Err(e) = fed {
            return Err(BackendError::Conversion(format!("writing input: {e}")));
        }

        debug!(
            program = %self.program,
            size = output.stdout.len(),
            "converter finished"
        );
        Ok(output.stdout)
    }
}

impl PdfBackend for WeasyPrintBackend {
    fn convert<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, BackendError>> {
        Box::pin(async move {
            tokio::time::timeout(self.timeout, self.run(html))
                .await
                .map_err(|_| BackendError::Timeout(self.timeout))?
        })
    }
}

fn classify_failure(stderr: String) -> BackendError {
    if LAYOUT_MARKERS.iter().any(|m| stderr.contains(m)) {
        BackendError::Layout(stderr)
    } else {
        BackendError::Conversion(stderr)
    }
}
