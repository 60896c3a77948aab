//! Renders the convex hull results of the 10, 100, 1000, and 10000 point
//! datasets as scatter plots.
//!
//! # Usage
//!
//! Put `10.json`, `100.json`, `1000.json`, and `10000.json` next to an
//! existing `report/` directory and run:
//!
//! ```shell
//! $ hull-report
//! ```
//!
//! The images end up in `report/10 points.png` and so on. See
//! `$ hull-report --help` for the available options.
//!
//! # Examples
//!
//! *Read the results from `out/`, keep rendering after a failure, and log everything*
//! ```shell
//! $ hull-report -i out --keep-going -l debug
//! ```
//!
//! *Look at every plot in a window (build with `--features viewer`)*
//! ```shell
//! $ hull-report --show
//! ```

use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use std::process::ExitCode;
use visualizer::batch::{default_datasets, run_batch, FailurePolicy};
use visualizer::renderer::{RenderConfig, ResultRenderer};
use visualizer::viewer::{Headless, Viewer};

/// Environment variable that overrides `--log-level`.
const LOG_ENV: &str = "HULL_REPORT_LOG";

/// Possible arguments for the executable.
#[derive(Debug, Parser)]
#[clap(about, author, version)]
pub struct Args {
    /// Directory containing 10.json, 100.json, 1000.json, and 10000.json.
    #[arg(short, long, default_value = ".")]
    pub input_dir: PathBuf,
    /// Existing directory the images are written to.
    #[arg(short, long, default_value = "report")]
    pub report_dir: PathBuf,
    /// Show every plot in a window after writing it.
    #[arg(short, long, default_value_t = false)]
    pub show: bool,
    /// Render the remaining datasets when one fails.
    #[arg(short, long, default_value_t = false)]
    pub keep_going: bool,
    /// The log level of the application.
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

fn failure_policy(keep_going: bool) -> FailurePolicy {
    if keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    }
}

#[cfg(feature = "viewer")]
fn make_viewer(show: bool) -> Box<dyn Viewer> {
    if show {
        Box::new(visualizer::viewer::WindowViewer::default())
    } else {
        Box::new(Headless)
    }
}

#[cfg(not(feature = "viewer"))]
fn make_viewer(show: bool) -> Box<dyn Viewer> {
    if show {
        log::warn!("built without the `viewer` feature, --show is ignored");
    }
    Box::new(Headless)
}

/// Main endpoint for the executable.
fn main() -> ExitCode {
    let args = Args::parse();

    // Init logger
    let env = Env::default().filter_or(LOG_ENV, args.log_level.as_str());
    let _ = env_logger::try_init_from_env(env);

    let renderer = ResultRenderer::new(RenderConfig {
        report_dir: args.report_dir,
        ..RenderConfig::default()
    });
    let datasets = default_datasets(&args.input_dir);
    let viewer = make_viewer(args.show);

    match run_batch(&renderer, &datasets, viewer.as_ref(), failure_policy(args.keep_going)) {
        Ok(summary) => {
            log::info!("rendered {} datasets", summary.rendered.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            for dataset in e.skipped.iter() {
                log::warn!("skipped '{}'", dataset.title);
            }
            ExitCode::FAILURE
        }
    }
}
