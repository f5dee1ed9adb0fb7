//! CLI parser
use clap::Parser;
use std::path::PathBuf;

use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_SLEEP_MS, DEFAULT_TIMEOUT_SECONDS};

#[derive(Parser, Debug, Clone)]
#[command(name = "storyboard-frames")]
#[command(about = "Generate storyboard start-frame PNGs with the Google image API")]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "STORYBOARD_DEBUG")]
    /// Enable debug logging. Env: STORYBOARD_DEBUG
    pub debug: bool,

    #[clap(long)]
    /// List planned generations without making API calls.
    pub dry_run: bool,

    #[clap(long)]
    /// Regenerate files even if they already exist.
    pub include_existing: bool,

    #[clap(long, allow_negative_numbers = true)]
    /// Maximum number of shots to generate in this run, zero or less plans nothing.
    pub limit: Option<i64>,

    #[clap(long)]
    /// Comma-separated scene.shot pairs, eg `5.4,5.5`.
    pub only: Option<String>,

    #[clap(long, default_value = DEFAULT_MODEL, env = "STORYBOARD_MODEL")]
    /// Google model name for image generation.
    /// Env: STORYBOARD_MODEL
    pub model: String,

    #[clap(long, default_value_t = DEFAULT_SLEEP_MS, env = "STORYBOARD_SLEEP_MS")]
    /// Delay between requests to avoid aggressive request bursts.
    /// Env: STORYBOARD_SLEEP_MS
    pub sleep_ms: u64,

    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECONDS, env = "STORYBOARD_TIMEOUT_SECS")]
    /// Per-request timeout in seconds.
    /// Env: STORYBOARD_TIMEOUT_SECS
    pub timeout_secs: u64,

    #[clap(long, default_value = ".", env = "STORYBOARD_PROJECT_ROOT")]
    /// Project root, images go in `<root>/public/storyboard/shots`.
    /// Env: STORYBOARD_PROJECT_ROOT
    pub project_root: PathBuf,

    #[clap(long, env = "STORYBOARD_ENV_FILE")]
    /// KEY=VALUE override file, defaults to `<root>/.env`.
    /// Env: STORYBOARD_ENV_FILE
    pub env_file: Option<PathBuf>,

    #[clap(long, default_value = DEFAULT_ENDPOINT, env = "STORYBOARD_ENDPOINT")]
    /// Base URL for the models API.
    /// Env: STORYBOARD_ENDPOINT
    pub endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_script() {
        let cli = CliOptions::try_parse_from(["storyboard-frames"]).expect("parse defaults");
        assert!(!cli.dry_run);
        assert!(!cli.include_existing);
        assert_eq!(cli.limit, None);
        assert_eq!(cli.only, None);
        assert_eq!(cli.sleep_ms, 350);
        assert_eq!(cli.timeout_secs, 90);
    }

    #[test]
    fn negative_limit_is_accepted() {
        let cli = CliOptions::try_parse_from(["storyboard-frames", "--limit", "-3", "--dry-run"])
            .expect("parse negative limit");
        assert_eq!(cli.limit, Some(-3));
        assert!(cli.dry_run);
    }

    #[test]
    fn only_and_model_flags() {
        let cli = CliOptions::try_parse_from([
            "storyboard-frames",
            "--only",
            "5.4,5.5",
            "--model",
            "some-model",
        ])
        .expect("parse flags");
        assert_eq!(cli.only.as_deref(), Some("5.4,5.5"));
        assert_eq!(cli.model, "some-model");
    }
}
