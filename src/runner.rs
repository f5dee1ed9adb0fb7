//! Plans and runs a batch of shot generations.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::debug;

use crate::catalog::{ShotSpec, all_shots};
use crate::client::{GeminiClient, ImageGenerator};
use crate::config::RunConfig;
use crate::constants::EXIT_GENERATION_FAILED;
use crate::error::{ShotError, StoryboardError};
use crate::png;
use crate::prompt::build_prompt;
use crate::selector::{ShotFilter, TargetSelection};

/// Counts from the execute phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Shots written to disk
    pub succeeded: usize,
    /// Shots that failed to generate or save
    pub failed: usize,
    /// Shots we tried
    pub attempted: usize,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    /// Only planned
    DryRun {
        /// Number of shots that would have been generated
        planned: usize,
    },
    /// Went through the target list
    Completed(RunSummary),
}

impl RunOutcome {
    /// 0 when nothing failed, 2 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::DryRun { .. } => 0,
            RunOutcome::Completed(summary) if summary.failed == 0 => 0,
            RunOutcome::Completed(_) => EXIT_GENERATION_FAILED,
        }
    }
}

/// The catalog and the slice of it we're going to generate.
#[derive(Clone, Debug)]
pub struct Plan {
    /// Full catalog size
    pub total: usize,
    /// Shots to generate, in catalog order
    pub targets: Vec<ShotSpec>,
    /// Directory the files go in
    pub output_dir: PathBuf,
}

impl Plan {
    /// Creates the output directory, builds the catalog and selects targets.
    pub fn prepare(config: &RunConfig) -> Result<Self, StoryboardError> {
        std::fs::create_dir_all(&config.output_dir).map_err(|source| {
            StoryboardError::CreateOutputDir {
                path: config.output_dir.clone(),
                source,
            }
        })?;

        let catalog = all_shots();
        let only = match config.only.as_deref() {
            Some(raw) => ShotFilter::parse(raw)?,
            None => None,
        };
        let selection = TargetSelection {
            include_existing: config.include_existing,
            only,
            limit: config.limit,
        };
        let targets = selection.select(&catalog, &config.output_dir);
        debug!(
            "Selected {} of {} shots in {}",
            targets.len(),
            catalog.len(),
            config.output_dir.display()
        );

        Ok(Self {
            total: catalog.len(),
            targets,
            output_dir: config.output_dir.clone(),
        })
    }

    /// Prints the totals and one line per planned shot.
    pub fn report(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Total storyboard shots: {}", self.total)?;
        writeln!(out, "Planned generations: {}", self.targets.len())?;
        for shot in &self.targets {
            writeln!(
                out,
                "- {} -> {}",
                shot.label(),
                shot.output_relpath().display()
            )?;
        }
        Ok(())
    }

    /// Generates each target in order. Failures are reported and counted, never fatal.
    pub fn execute(
        &self,
        generator: &dyn ImageGenerator,
        config: &RunConfig,
        out: &mut dyn Write,
    ) -> std::io::Result<RunSummary> {
        let total = self.targets.len();
        let mut summary = RunSummary::default();

        for (position, shot) in (1..).zip(&self.targets) {
            let path = self.output_dir.join(shot.output_filename());
            writeln!(out, "[{position}/{total}] Generating {} ...", shot.output_filename())?;
            summary.attempted += 1;

            match generate_shot(generator, shot, &path) {
                Ok(bytes) => {
                    writeln!(
                        out,
                        "  wrote {} bytes ({})",
                        bytes.len(),
                        png::describe(&bytes)
                    )?;
                    summary.succeeded += 1;
                }
                Err(err) => {
                    debug!("{} failed: {:?}", shot.label(), err);
                    eprintln!("  failed: {err}");
                    summary.failed += 1;
                }
            }

            if !config.sleep.is_zero() && position < total {
                thread::sleep(config.sleep);
            }
        }

        writeln!(
            out,
            "Done. Success: {}, Failed: {}, Total attempted: {}",
            summary.succeeded, summary.failed, summary.attempted
        )?;
        Ok(summary)
    }
}

fn generate_shot(
    generator: &dyn ImageGenerator,
    shot: &ShotSpec,
    path: &Path,
) -> Result<Vec<u8>, ShotError> {
    let bytes = generator.generate(&build_prompt(shot))?;
    std::fs::write(path, &bytes).map_err(|source| ShotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes)
}

/// Plans, then either stops (dry run) or generates with `generator`.
pub fn run_with(
    config: &RunConfig,
    generator: Option<&dyn ImageGenerator>,
    out: &mut dyn Write,
) -> Result<RunOutcome, StoryboardError> {
    let generator = match generator {
        Some(generator) if !config.dry_run => Some(generator),
        Some(_) => None,
        None if config.dry_run => None,
        None => return Err(StoryboardError::MissingApiKey(config.env_file.clone())),
    };

    let plan = Plan::prepare(config)?;
    plan.report(out)?;

    let Some(generator) = generator else {
        writeln!(out, "Dry run complete. No API calls were made.")?;
        return Ok(RunOutcome::DryRun {
            planned: plan.targets.len(),
        });
    };

    let summary = plan.execute(generator, config, out)?;
    Ok(RunOutcome::Completed(summary))
}

/// Runs against the real API, using the key from `config`.
pub fn run(config: &RunConfig, out: &mut dyn Write) -> Result<RunOutcome, StoryboardError> {
    let client = match config.api_key.as_deref() {
        Some(api_key) => Some(GeminiClient::new(
            &config.endpoint,
            &config.model,
            api_key,
            config.timeout,
        )?),
        None => None,
    };
    run_with(
        config,
        client.as_ref().map(|client| client as &dyn ImageGenerator),
        out,
    )
}
