//! Scatter plots of convex hull results.
//!
//! The hull computation writes one JSON file per dataset:
//!
//! ```json
//! {
//!   "points": { "x": [0, 1, 1, 0, 0.5], "y": [0, 0, 1, 1, 0.5] },
//!   "hull":   { "x": [0, 1, 1, 0],      "y": [0, 0, 1, 1] }
//! }
//! ```
//!
//! This crate draws every point and, on top of them, the hull points into a
//! titled PNG at `report/<title>.png`.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use visualizer::renderer::ResultRenderer;
//! use visualizer::viewer::Headless;
//!
//! let renderer = ResultRenderer::default(); // writes into ./report
//! let outcome = renderer.render(Path::new("10.json"), "10 points", &Headless)?;
//! println!("{} points drawn", outcome.points_drawn);
//! # Ok::<(), visualizer::error::RenderError>(())
//! ```
//!
//! The four standard datasets can be rendered in one go with
//! [`batch::run_batch`] and [`batch::default_datasets`].
//!
//! # Features
//!
//! | Feature  | Effect                                                        |
//! |----------|---------------------------------------------------------------|
//! | `viewer` | Adds [`viewer::WindowViewer`], a druid window for each figure |

pub mod batch;
pub mod error;
pub mod figure;
pub mod geometry;
pub mod renderer;
pub mod result_reader;
pub mod viewer;
