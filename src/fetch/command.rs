use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{path::PathBuf, process::Stdio, time::Instant};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::{DataSource, Query};

/// Runs `<program> [script] <symbol> <statistic> <format>` and returns its stdout.
///
/// The exit status and stderr are logged, never inspected: whatever the
/// process printed is handed on as the result.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    script: Option<String>,
    working_dir: Option<PathBuf>,
}

impl CommandSource {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            script: None,
            working_dir: None,
        }
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self, query: &Query) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(script) = &self.script {
            cmd.arg(script);
        }
        cmd.args(query.args());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd
    }
}

#[async_trait]
impl DataSource for CommandSource {
    #[instrument(level = "debug", skip_all, fields(symbol = %query.symbol, statistic = %query.statistic))]
    async fn fetch(&self, query: &Query) -> Result<String> {
        let start = Instant::now();
        let output = self
            .command(query)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            warn!(status = %output.status, "scraper exited unsuccessfully");
        }
        if !output.stderr.is_empty() {
            warn!(
                "scraper stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }
        debug!(
            program = %self.program,
            bytes = output.stdout.len(),
            elapsed = ?start.elapsed(),
            "scraper finished"
        );

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_passes_query_as_positional_args() -> Result<()> {
        let source = CommandSource::new("echo");
        let out = source.fetch(&Query::new("AAPL", "revenue", "csv")).await?;
        assert_eq!(out, "AAPL revenue csv\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_script_precedes_query() -> Result<()> {
        let source = CommandSource::new("echo").with_script("./python/scraper.py");
        let out = source.fetch(&Query::new("MSFT", "ebit", "values")).await?;
        assert_eq!(out, "./python/scraper.py MSFT ebit values\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_exit_still_returns_stdout() -> Result<()> {
        let source = CommandSource::new("sh").with_script("-c");
        let query = Query::new("printf 'a,b\\n'; echo oops >&2; exit 3", "x", "y");
        let out = source.fetch(&query).await?;
        assert_eq!(out, "a,b\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("marker.txt"), "here")?;
        let source = CommandSource::new("sh")
            .with_script("-c")
            .with_working_dir(dir.path());
        let out = source.fetch(&Query::new("cat marker.txt", "", "")).await?;
        assert_eq!(out, "here");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let source = CommandSource::new("finscraper-no-such-program");
        let err = source
            .fetch(&Query::new("AAPL", "revenue", "csv"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to run finscraper-no-such-program"));
    }
}
