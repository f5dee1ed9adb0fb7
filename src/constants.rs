//! Shared constants/setters for things
//!

use std::path::PathBuf;
use std::sync::LazyLock;

/// Environment variable holding the image API key
pub const IMAGE_API_ENV: &str = "IMAGE_API";

/// Default image model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Base URL for model endpoints, the model name and `:generateContent` get appended.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default pause between requests, in milliseconds.
pub const DEFAULT_SLEEP_MS: u64 = 350;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 90;

/// Name of the optional env override file in the project root
pub const ENV_FILE_NAME: &str = ".env";

/// Where shot images live, relative to the project root.
pub static SHOT_IMAGE_DIR: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from("public").join("storyboard").join("shots"));

/// How much of a response body we keep when reporting a missing image.
pub const RESPONSE_SNAPSHOT_CHARS: usize = 600;

/// Largest response body we'll read, base64 images are big.
pub const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Exit code when at least one shot failed to generate.
pub const EXIT_GENERATION_FAILED: u8 = 2;

/// Exit code for configuration problems (missing key, bad filter).
pub const EXIT_CONFIG_ERROR: u8 = 1;
