//! Picks which shots to generate in a run.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::ShotSpec;
use crate::error::StoryboardError;

#[allow(clippy::expect_used)] // literal pattern
static ONLY_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.:/-](\d+)$").expect("valid --only pattern"));

/// Allow-list of `(scene, shot)` pairs from `--only`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShotFilter {
    pairs: BTreeSet<(u64, u64)>,
}

/// Digits only, so the parse can only fail on overflow. Such a number can't match a shot.
fn number(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

impl ShotFilter {
    /// Parses `5.4,5.5` style input. `.`, `:`, `/` and `-` all work as the separator.
    ///
    /// Returns `Ok(None)` when there's nothing to filter on.
    pub fn parse(raw: &str) -> Result<Option<Self>, StoryboardError> {
        let mut pairs = BTreeSet::new();
        for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let captures = ONLY_ITEM
                .captures(item)
                .ok_or_else(|| StoryboardError::InvalidFilter(item.to_string()))?;
            pairs.insert((number(&captures[1]), number(&captures[2])));
        }
        if pairs.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self { pairs }))
    }

    /// Whether the shot is on the list.
    pub fn contains(&self, shot: &ShotSpec) -> bool {
        self.pairs
            .contains(&(u64::from(shot.scene_number), u64::from(shot.shot_number)))
    }

    /// The parsed pairs, sorted.
    pub fn pairs(&self) -> &BTreeSet<(u64, u64)> {
        &self.pairs
    }
}

/// Rules for turning the catalog into a target list.
#[derive(Clone, Debug, Default)]
pub struct TargetSelection {
    /// Keep shots whose file is already on disk
    pub include_existing: bool,
    /// Only keep these shots
    pub only: Option<ShotFilter>,
    /// Keep at most this many, zero or less keeps none
    pub limit: Option<i64>,
}

impl TargetSelection {
    /// Filters `catalog` in order, then applies the limit.
    pub fn select(&self, catalog: &[ShotSpec], output_dir: &Path) -> Vec<ShotSpec> {
        let mut targets: Vec<ShotSpec> = catalog
            .iter()
            .filter(|shot| self.only.as_ref().is_none_or(|only| only.contains(shot)))
            .filter(|shot| {
                self.include_existing || !output_dir.join(shot.output_filename()).exists()
            })
            .copied()
            .collect();

        if let Some(limit) = self.limit {
            targets.truncate(usize::try_from(limit).unwrap_or(0));
        }
        targets
    }
}
