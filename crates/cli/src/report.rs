//! Surfacing results to whoever runs the check.

use anyhow::Result;
use clap::ValueEnum;
use label_gate_core::config::GithubContext;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

pub trait Reporter {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    /// Marks the run as failed.
    fn fail(&self, msg: &str);
    fn set_output(&self, name: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Workflow commands when GITHUB_ACTIONS is set, plain logs otherwise
    #[default]
    Auto,
    Actions,
    Plain,
}

impl Format {
    pub fn uses_workflow_commands(self, github: Option<&GithubContext>) -> bool {
        match self {
            Format::Auto => github.is_some_and(GithubContext::in_actions),
            Format::Actions => true,
            Format::Plain => false,
        }
    }
}

/// Picks the reporter for `format`. `github` may be absent when the
/// configuration itself failed to load.
pub fn reporter_for(format: Format, github: Option<&GithubContext>) -> Box<dyn Reporter> {
    if !format.uses_workflow_commands(github) {
        return Box::new(PlainReporter);
    }
    let output_file = github
        .and_then(|g| g.output.as_deref())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    Box::new(ActionsReporter::stdout(output_file))
}

/// Escapes message data for a workflow command.
pub fn escape_data(msg: &str) -> String {
    msg.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Writes GitHub Actions workflow commands.
pub struct ActionsReporter<W: Write> {
    out: Mutex<W>,
    output_file: Option<PathBuf>,
}

impl ActionsReporter<io::Stdout> {
    pub fn stdout(output_file: Option<PathBuf>) -> Self {
        Self::new(io::stdout(), output_file)
    }
}

impl<W: Write> ActionsReporter<W> {
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self {
            out: Mutex::new(out),
            output_file,
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn line(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(out, "{text}") {
            tracing::warn!("failed to write report line: {e}");
        }
    }
}

impl<W: Write> Reporter for ActionsReporter<W> {
    fn debug(&self, msg: &str) {
        self.line(&format!("::debug::{}", escape_data(msg)));
    }

    fn info(&self, msg: &str) {
        self.line(msg);
    }

    fn fail(&self, msg: &str) {
        self.line(&format!("::error::{}", escape_data(msg)));
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{name}={value}")?;
        Ok(())
    }
}

/// Logs through `tracing`, for runs outside of Actions.
#[derive(Debug, Default)]
pub struct PlainReporter;

impl Reporter for PlainReporter {
    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn fail(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        tracing::info!("output {name}={value}");
        Ok(())
    }
}
