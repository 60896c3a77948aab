use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::renderer::{RenderOutcome, ResultRenderer};
use crate::viewer::Viewer;

/// Sizes of the datasets produced by the hull computation.
pub const DATASET_SIZES: [usize; 4] = [10, 100, 1000, 10000];

/// One render request: where the result lives and what to call the plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub source: PathBuf,
    pub title: String,
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, title: &str) -> Self {
        Dataset {
            source: source.into(),
            title: title.to_string(),
        }
    }
}

/// `10.json` → "10 points", ..., `10000.json` → "10000 points", inside `input_dir`.
pub fn default_datasets(input_dir: &Path) -> Vec<Dataset> {
    DATASET_SIZES
        .iter()
        .map(|n| Dataset::new(input_dir.join(format!("{n}.json")), &format!("{n} points")))
        .collect()
}

/// What to do with the remaining datasets once one render failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    FailFast,
    /// Render everything, then report every failure.
    KeepGoing,
}

/// A render that failed, together with the dataset it belonged to.
#[derive(Debug)]
pub struct DatasetFailure {
    pub dataset: Dataset,
    pub error: RenderError,
}

impl fmt::Display for DatasetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dataset '{}' ({}): {}",
            self.dataset.title,
            self.dataset.source.display(),
            self.error
        )
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub rendered: Vec<RenderOutcome>,
}

#[derive(Debug)]
pub struct BatchError {
    /// Renders that completed before (or despite) the failures.
    pub rendered: Vec<RenderOutcome>,
    /// Never empty.
    pub failures: Vec<DatasetFailure>,
    /// Datasets never attempted because the batch stopped early.
    pub skipped: Vec<Dataset>,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} renders failed",
            self.failures.len(),
            self.rendered.len() + self.failures.len() + self.skipped.len()
        )?;
        for failure in self.failures.iter() {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {}

/// Renders `datasets` one after the other, in order.
///
/// With [`FailurePolicy::FailFast`] the first failure ends the batch and the
/// remaining datasets are reported as skipped. Images written before a
/// failure are left in place either way.
pub fn run_batch(
    renderer: &ResultRenderer,
    datasets: &[Dataset],
    viewer: &dyn Viewer,
    policy: FailurePolicy,
) -> Result<BatchSummary, BatchError> {
    let mut rendered = Vec::new();
    let mut failures = Vec::new();

    for (i, dataset) in datasets.iter().enumerate() {
        log::debug!("rendering '{}' from {}", dataset.title, dataset.source.display());
        match renderer.render(&dataset.source, &dataset.title, viewer) {
            Ok(outcome) => rendered.push(outcome),
            Err(error) => {
                log::error!(
                    "'{}' ({}) failed: {}",
                    dataset.title,
                    dataset.source.display(),
                    error
                );
                failures.push(DatasetFailure {
                    dataset: dataset.clone(),
                    error,
                });
                if policy == FailurePolicy::FailFast {
                    return Err(BatchError {
                        rendered,
                        failures,
                        skipped: datasets[i + 1..].to_vec(),
                    });
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(BatchSummary { rendered })
    } else {
        Err(BatchError {
            rendered,
            failures,
            skipped: Vec::new(),
        })
    }
}
