use anyhow::Result;
use clap::Parser;
use cli::report::{reporter_for, Format, Reporter};
use cli::run::{self, Summary};
use label_gate_core::config::{self, GithubContext, Overrides};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        allowed: cli.allowed.clone(),
        token: cli.token.clone(),
        lookup: cli.lookup.clone(),
    };

    let cfg = match config::load(cli.config.as_deref(), &overrides) {
        Ok(cfg) => cfg,
        Err(e) => {
            let github = GithubContext::from_env().ok();
            reporter_for(cli.format, github.as_ref()).fail(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let reporter = reporter_for(cli.format, Some(&cfg.github));

    match execute(&cfg, reporter.as_ref(), cli.json).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            reporter.fail(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cfg: &config::AppConfig, reporter: &dyn Reporter, json: bool) -> Result<bool> {
    let outcome = run::run(cfg, reporter).await?;
    let passed = run::report_outcome(&outcome, reporter)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&Summary::from_outcome(&outcome))?);
    }
    Ok(passed)
}

#[derive(Parser)]
#[command(name = "label-gate")]
#[command(
    about = "Require exactly one allowed label on a pull request",
    long_about = None
)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Allowed labels, one per line (overrides INPUT_ALLOWED)
    #[arg(long)]
    allowed: Option<String>,

    /// Token for the GitHub API (overrides INPUT_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Where to read labels from: event|api
    #[arg(long)]
    lookup: Option<String>,

    /// How to report results
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Print a JSON summary of the run
    #[arg(long)]
    json: bool,
}
