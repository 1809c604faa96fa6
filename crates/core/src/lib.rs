//! Core library: allow-list normalization, label classification, run configuration.

pub mod allowlist;
pub mod classifier;
pub mod config;
pub mod models;

pub use allowlist::{normalize, AllowList};
pub use classifier::{classify, decide, Decision};
pub use self::config::ConfigError;
pub use models::{ClassificationResult, Verdict};
