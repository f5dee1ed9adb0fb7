//! Config handling

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::log::LevelFilter;
use tracing::{debug, warn};

use crate::cli::CliOptions;
use crate::constants::{ENV_FILE_NAME, IMAGE_API_ENV, SHOT_IMAGE_DIR};

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("ureq", LevelFilter::Warn)
            .with_module_level("ureq_proto", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Everything a run needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Where PNGs get written
    pub output_dir: PathBuf,
    /// The KEY=VALUE file we looked in, used in error messages
    pub env_file: PathBuf,
    /// API key, `None` when unset or blank
    pub api_key: Option<String>,
    /// Image model name
    pub model: String,
    /// Base URL for the models API
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pause between requests
    pub sleep: Duration,
    /// Plan only, no API calls
    pub dry_run: bool,
    /// Regenerate files that already exist
    pub include_existing: bool,
    /// Cap on planned generations
    pub limit: Option<i64>,
    /// Raw `--only` value, parsed by the runner
    pub only: Option<String>,
}

impl RunConfig {
    /// Builds the config from CLI options, the env file and the process environment.
    pub fn from_cli(cli: CliOptions) -> Self {
        let env_file = cli
            .env_file
            .unwrap_or_else(|| cli.project_root.join(ENV_FILE_NAME));
        let file_values = load_env_file(&env_file);
        let api_key = resolve_api_key(std::env::var(IMAGE_API_ENV).ok(), &file_values);

        Self {
            output_dir: cli.project_root.join(SHOT_IMAGE_DIR.as_path()),
            env_file,
            api_key,
            model: cli.model,
            endpoint: cli.endpoint,
            timeout: Duration::from_secs(cli.timeout_secs),
            sleep: Duration::from_millis(cli.sleep_ms),
            dry_run: cli.dry_run,
            include_existing: cli.include_existing,
            limit: cli.limit,
            only: cli.only,
        }
    }
}

/// Reads KEY=VALUE pairs. A missing file means no overrides, bad lines are skipped.
pub fn load_env_file(path: &Path) -> HashMap<String, String> {
    let mut values = HashMap::new();
    if !path.exists() {
        debug!("No env file at {}", path.display());
        return values;
    }
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) => {
            warn!("Failed to read env file {}: {}", path.display(), err);
            return values;
        }
    };
    for item in iter {
        match item {
            Ok((key, value)) => {
                // first definition wins, same as the process env
                values.entry(key).or_insert(value);
            }
            Err(err) => warn!("Skipping line in {}: {}", path.display(), err),
        }
    }
    values
}

/// The process environment wins over the env file; blank values count as unset.
pub fn resolve_api_key(
    process_value: Option<String>,
    file_values: &HashMap<String, String>,
) -> Option<String> {
    let non_blank = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };
    match process_value {
        Some(value) => non_blank(&value),
        None => file_values.get(IMAGE_API_ENV).and_then(|value| non_blank(value)),
    }
}
