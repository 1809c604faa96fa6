//! Run configuration.
//!
//! Step inputs are layered with the `config` crate: an optional TOML file,
//! then `INPUT_*` environment variables (how GitHub Actions hands inputs to a
//! step), then explicit overrides from the command line. The workflow context
//! comes from the `GITHUB_*` variables.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_FILE: &str = "label-gate";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("input required and not supplied: {0}")]
    MissingInput(&'static str),
    #[error("invalid lookup mode `{0}`, expected `event` or `api`")]
    InvalidLookup(String),
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Where the pull request's labels are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookupMode {
    /// Labels embedded in the triggering event payload.
    #[default]
    Event,
    /// Fresh labels from the pull request REST endpoint.
    Api,
}

impl FromStr for LookupMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "event" => Ok(LookupMode::Event),
            "api" => Ok(LookupMode::Api),
            other => Err(ConfigError::InvalidLookup(other.to_string())),
        }
    }
}

impl TryFrom<String> for LookupMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookupMode> for String {
    fn from(mode: LookupMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMode::Event => f.write_str("event"),
            LookupMode::Api => f.write_str("api"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inputs {
    /// Newline-delimited allow-list, as typed into the workflow file.
    #[serde(default)]
    pub allowed: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub lookup: LookupMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubContext {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_path: Option<String>,
    /// `owner/name` of the repository running the workflow.
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// File that step outputs are appended to.
    #[serde(default)]
    pub output: Option<String>,
    /// `"true"` when running inside GitHub Actions.
    #[serde(default)]
    pub actions: Option<String>,
}

impl GithubContext {
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .add_source(Environment::with_prefix("GITHUB"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn in_actions(&self) -> bool {
        self.actions.as_deref() == Some("true")
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub inputs: Inputs,
    pub github: GithubContext,
}

impl AppConfig {
    /// The raw allow-list. Blank or missing input is a configuration error.
    pub fn allowed(&self) -> Result<&str, ConfigError> {
        self.inputs
            .allowed
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(ConfigError::MissingInput("allowed"))
    }

    /// Explicit `token` input, else the workflow's `GITHUB_TOKEN`.
    pub fn token(&self) -> Option<&str> {
        [self.inputs.token.as_deref(), self.github.token.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
    }
}

/// Command-line values that win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub allowed: Option<String>,
    pub token: Option<String>,
    pub lookup: Option<String>,
}

pub fn load(path: Option<&str>, overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let inputs = load_inputs(path, Some("INPUT"), overrides)?;
    let github = GithubContext::from_env()?;
    debug!(
        lookup = %inputs.lookup,
        event_name = ?github.event_name,
        repository = ?github.repository,
        "configuration loaded"
    );
    Ok(AppConfig { inputs, github })
}

fn load_inputs(
    path: Option<&str>,
    env_prefix: Option<&str>,
    overrides: &Overrides,
) -> Result<Inputs, ConfigError> {
    let mut settings = Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(File::with_name(p));
    } else {
        settings = settings.add_source(File::with_name(DEFAULT_FILE).required(false));
    }
    if let Some(prefix) = env_prefix {
        settings = settings.add_source(Environment::with_prefix(prefix));
    }
    let cfg = settings
        .set_override_option("allowed", overrides.allowed.clone())?
        .set_override_option("token", overrides.token.clone())?
        .set_override_option("lookup", overrides.lookup.clone())?
        .build()?;
    let inputs: Inputs = cfg.try_deserialize()?;
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Removes the variables it set when dropped.
    struct EnvVars(Vec<&'static str>);

    impl EnvVars {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            for (key, value) in vars {
                env::set_var(key, value);
            }
            Self(vars.iter().map(|(key, _)| *key).collect())
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for key in &self.0 {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn loads_inputs_and_context_from_environment() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("INPUT_TOKEN");

        let dir = tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        fs::write(&path, "allowed = \"from-file\"\nlookup = \"event\"\n").unwrap();

        let _vars = EnvVars::set(&[
            ("INPUT_ALLOWED", "bug\nfeature\n"),
            ("INPUT_LOOKUP", "api"),
            ("GITHUB_EVENT_NAME", "pull_request"),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("GITHUB_REPOSITORY", "octo/widgets"),
            ("GITHUB_TOKEN", "ghs_workflow"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3"),
            ("GITHUB_OUTPUT", "/tmp/github_output"),
            ("GITHUB_ACTIONS", "true"),
        ]);

        let cfg = load(Some(path.to_str().unwrap()), &Overrides::default()).unwrap();
        assert_eq!(cfg.allowed().unwrap(), "bug\nfeature\n");
        assert_eq!(cfg.inputs.lookup, LookupMode::Api);
        assert_eq!(cfg.token(), Some("ghs_workflow"));
        assert_eq!(cfg.github.event_name.as_deref(), Some("pull_request"));
        assert_eq!(cfg.github.event_path.as_deref(), Some("/tmp/event.json"));
        assert_eq!(cfg.github.repository.as_deref(), Some("octo/widgets"));
        assert_eq!(cfg.github.api_url(), "https://ghe.example.com/api/v3");
        assert_eq!(cfg.github.output.as_deref(), Some("/tmp/github_output"));
        assert!(cfg.github.in_actions());

        let overrides = Overrides {
            allowed: Some("chore".into()),
            lookup: Some("event".into()),
            ..Overrides::default()
        };
        let cfg = load(Some(path.to_str().unwrap()), &overrides).unwrap();
        assert_eq!(cfg.allowed().unwrap(), "chore");
        assert_eq!(cfg.inputs.lookup, LookupMode::Event);
    }

    #[test]
    fn reads_inputs_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        fs::write(
            &path,
            "allowed = \"\"\"\nbug\nfeature\n\"\"\"\nlookup = \"api\"\n",
        )
        .unwrap();

        let inputs =
            load_inputs(Some(path.to_str().unwrap()), None, &Overrides::default()).unwrap();
        assert_eq!(inputs.allowed.as_deref(), Some("bug\nfeature\n"));
        assert_eq!(inputs.lookup, LookupMode::Api);
        assert!(inputs.token.is_none());
    }

    #[test]
    fn overrides_win_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        fs::write(&path, "allowed = \"bug\"\nlookup = \"api\"\n").unwrap();

        let overrides = Overrides {
            allowed: Some("chore".into()),
            token: Some("t0k".into()),
            lookup: Some("event".into()),
        };
        let inputs = load_inputs(Some(path.to_str().unwrap()), None, &overrides).unwrap();
        assert_eq!(inputs.allowed.as_deref(), Some("chore"));
        assert_eq!(inputs.token.as_deref(), Some("t0k"));
        assert_eq!(inputs.lookup, LookupMode::Event);
    }

    #[test]
    fn rejects_unknown_lookup_mode() {
        let overrides = Overrides {
            lookup: Some("graphql".into()),
            ..Overrides::default()
        };
        assert!(load_inputs(None, None, &overrides).is_err());
        assert!(matches!(
            "graphql".parse::<LookupMode>(),
            Err(ConfigError::InvalidLookup(_))
        ));
        assert_eq!("API".parse::<LookupMode>().unwrap(), LookupMode::Api);
    }

    #[test]
    fn blank_allow_list_is_missing_input() {
        let mut cfg = AppConfig::default();
        assert!(matches!(cfg.allowed(), Err(ConfigError::MissingInput("allowed"))));
        cfg.inputs.allowed = Some(" \n \n".into());
        assert!(matches!(cfg.allowed(), Err(ConfigError::MissingInput(_))));
        cfg.inputs.allowed = Some("bug".into());
        assert_eq!(cfg.allowed().unwrap(), "bug");
    }

    #[test]
    fn token_falls_back_to_workflow_token() {
        let mut cfg = AppConfig::default();
        assert!(cfg.token().is_none());
        cfg.github.token = Some("ghs_workflow".into());
        assert_eq!(cfg.token(), Some("ghs_workflow"));
        cfg.inputs.token = Some("ghp_input".into());
        assert_eq!(cfg.token(), Some("ghp_input"));
    }

    #[test]
    fn api_url_defaults_to_public_github() {
        let mut ctx = GithubContext::default();
        assert_eq!(ctx.api_url(), DEFAULT_API_URL);
        ctx.api_url = Some("https://ghe.example.com/api/v3".into());
        assert_eq!(ctx.api_url(), "https://ghe.example.com/api/v3");
    }
}
