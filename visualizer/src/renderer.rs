use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::figure::{DrawnMarkers, Figure};
use crate::geometry::MAX_AXIS_SPAN;
use crate::result_reader;
use crate::viewer::Viewer;

/// Extension of every written artifact.
pub const IMAGE_EXTENSION: &str = "png";

/// Settings shared by every render of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Existing directory the images are written to. It is never created.
    pub report_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Marker radius in pixels.
    pub marker_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            report_dir: PathBuf::from("report"),
            width: 640,
            height: 480,
            marker_size: 3,
        }
    }
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub artifact: PathBuf,
    pub points_drawn: usize,
    pub hull_drawn: usize,
    /// Pixel centers of the hull markers in the image, in hull order.
    pub hull_pixels: Vec<(i32, i32)>,
}

/// Turns one result file into one PNG.
///
/// Each call is independent: a new bitmap is allocated for every render and
/// nothing is kept between calls.
#[derive(Debug, Clone, Default)]
pub struct ResultRenderer {
    config: RenderConfig,
}

impl ResultRenderer {
    pub fn new(config: RenderConfig) -> Self {
        ResultRenderer { config }
    }

    /// Path of the image for `title`: `<report_dir>/<title>.png`.
    pub fn artifact_path(&self, title: &str) -> PathBuf {
        self.config
            .report_dir
            .join(format!("{title}.{IMAGE_EXTENSION}"))
    }

    /// Loads `source`, draws points and hull, writes `<report_dir>/<title>.png`
    /// and hands the figure to `viewer`.
    ///
    /// Nothing is written unless the whole figure was drawn.
    pub fn render(
        &self,
        source: &Path,
        title: &str,
        viewer: &dyn Viewer,
    ) -> Result<RenderOutcome, RenderError> {
        check_title(title)?;

        let result = result_reader::read(source)?;
        log::debug!(
            "{}: {} points, {} hull points",
            source.display(),
            result.get_points().len(),
            result.get_hull().len()
        );

        let artifact = self.artifact_path(title);
        self.check_report_dir(&artifact)?;

        let figure = Figure::new(title, result, self.config.marker_size);
        if figure.axis_ranges().is_none() {
            return Err(RenderError::Draw(format!(
                "coordinates of '{}' span more than {:e}, no axis range fits them",
                title,
                MAX_AXIS_SPAN
            )));
        }
        let (markers, pixels) = self.rasterize(&figure)?;
        self.write_png(&artifact, &pixels)?;
        log::info!("wrote {}", artifact.display());

        if let Err(e) = viewer.show(&figure) {
            log::warn!("could not show '{}': {}", title, e);
        }

        Ok(RenderOutcome {
            artifact,
            points_drawn: markers.points.len(),
            hull_drawn: markers.hull.len(),
            hull_pixels: markers.hull,
        })
    }

    fn check_report_dir(&self, artifact: &Path) -> Result<(), RenderError> {
        let dir = &self.config.report_dir;
        if dir.is_dir() {
            return Ok(());
        }
        let cause = if dir.exists() {
            format!("{} is not a directory", dir.display())
        } else {
            format!("directory {} does not exist", dir.display())
        };
        Err(RenderError::Write {
            path: artifact.to_path_buf(),
            cause,
        })
    }

    /// Draws the figure into a fresh RGB buffer.
    fn rasterize(&self, figure: &Figure) -> Result<(DrawnMarkers, Vec<u8>), RenderError> {
        let (width, height) = (self.config.width, self.config.height);
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        let markers = {
            let root =
                BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            let markers = figure
                .draw_on(&root)
                .map_err(|e| RenderError::Draw(e.to_string()))?;
            root.present()
                .map_err(|e| RenderError::Draw(e.to_string()))?;
            markers
        };
        Ok((markers, pixels))
    }

    /// Encodes the PNG in memory, writes it next to the artifact and renames
    /// it into place, so `artifact` is either complete or untouched.
    fn write_png(&self, artifact: &Path, pixels: &[u8]) -> Result<(), RenderError> {
        let write_error = |cause: String| RenderError::Write {
            path: artifact.to_path_buf(),
            cause,
        };

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                pixels,
                self.config.width,
                self.config.height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| write_error(e.to_string()))?;

        let partial = partial_path(artifact);
        let written = fs::write(&partial, &png).and_then(|_| fs::rename(&partial, artifact));
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(write_error(e.to_string()));
        }
        Ok(())
    }
}

/// `report/.10 points.png.partial` for `report/10 points.png`.
fn partial_path(artifact: &Path) -> PathBuf {
    let name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    artifact.with_file_name(format!(".{name}.partial"))
}

fn check_title(title: &str) -> Result<(), RenderError> {
    if title.is_empty() || title.contains(['/', '\\']) {
        return Err(RenderError::InvalidTitle(title.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::{GeometryResult, Layer};
    use crate::viewer::Headless;
    use std::cell::RefCell;
    use std::error::Error;
    use std::fs;

    /// Per-test working directory with `report/` already created.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("renderer-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("report")).unwrap();
        dir
    }

    fn renderer_for(dir: &Path) -> ResultRenderer {
        ResultRenderer::new(RenderConfig {
            report_dir: dir.join("report"),
            ..RenderConfig::default()
        })
    }

    fn write_square(dir: &Path) -> PathBuf {
        let path = dir.join("square.json");
        fs::write(
            &path,
            r#"{"points": {"x": [0, 1, 1, 0], "y": [0, 0, 1, 1]},
                "hull": {"x": [0, 1, 1, 0], "y": [0, 0, 1, 1]}}"#,
        )
        .unwrap();
        path
    }

    /// Remembers the titles it was asked to show.
    #[derive(Default)]
    struct RecordingViewer {
        shown: RefCell<Vec<String>>,
    }

    impl Viewer for RecordingViewer {
        fn show(&self, figure: &Figure) -> Result<(), Box<dyn Error>> {
            self.shown.borrow_mut().push(figure.get_title().to_string());
            Ok(())
        }
    }

    struct BrokenViewer;

    impl Viewer for BrokenViewer {
        fn show(&self, _figure: &Figure) -> Result<(), Box<dyn Error>> {
            Err("no display".into())
        }
    }

    #[test]
    fn test_render_unit_square() {
        let dir = scratch_dir("square");
        let source = write_square(&dir);
        let viewer = RecordingViewer::default();

        let outcome = renderer_for(&dir).render(&source, "square", &viewer).unwrap();

        assert_eq!(dir.join("report").join("square.png"), outcome.artifact);
        assert_eq!(4, outcome.points_drawn);
        assert_eq!(4, outcome.hull_drawn);
        assert!(outcome.artifact.is_file(), "The PNG must exist after rendering");
        assert_eq!(vec!["square".to_string()], *viewer.shown.borrow());

        let png = image::open(&outcome.artifact).unwrap().to_rgb8();
        assert_eq!((640, 480), png.dimensions());

        // hull order is (0,0) (1,0) (1,1) (0,1), screen y grows downwards
        let hull = &outcome.hull_pixels;
        assert_eq!(4, hull.len());
        assert_eq!(hull[0].0, hull[3].0, "(0,0) and (0,1) share a column");
        assert_eq!(hull[0].1, hull[1].1, "(0,0) and (1,0) share a row");
        assert!(hull[0].0 < hull[2].0 && hull[2].1 < hull[0].1);
        for (x, y) in hull.iter() {
            assert_eq!(
                [255, 127, 14],
                png.get_pixel(*x as u32, *y as u32).0,
                "The hull color must be at pixel ({}, {})",
                x,
                y
            );
        }
    }

    #[test]
    fn test_render_draws_every_point() {
        let dir = scratch_dir("counts");
        let n = 1000;
        let x = (0..n).map(|i| (i as f64 * 0.37).sin()).collect::<Vec<f64>>();
        let y = (0..n).map(|i| (i as f64 * 0.11).cos()).collect::<Vec<f64>>();
        let points = Layer::new(x, y).unwrap();
        let hull = Layer::new(
            vec![-1.0, 1.0, 1.0, -1.0, -1.0],
            vec![-1.0, -1.0, 1.0, 1.0, 0.0],
        )
        .unwrap();
        let source = dir.join("1000.json");
        result_reader::save(&GeometryResult::new(points, hull), &source).unwrap();

        let outcome = renderer_for(&dir)
            .render(&source, "1000 points", &Headless)
            .unwrap();
        assert_eq!(n, outcome.points_drawn);
        assert_eq!(5, outcome.hull_drawn);
    }

    #[test]
    fn test_title_propagates_to_artifact_path() {
        let renderer = ResultRenderer::default();
        assert_eq!(
            Path::new("report/10 points.png"),
            renderer.artifact_path("10 points")
        );

        let dir = scratch_dir("title");
        let source = write_square(&dir);
        let outcome = renderer_for(&dir)
            .render(&source, "10 points", &Headless)
            .unwrap();
        assert_eq!(dir.join("report").join("10 points.png"), outcome.artifact);
    }

    #[test]
    fn test_missing_source_is_load_error() {
        let dir = scratch_dir("missing-source");
        let err = renderer_for(&dir)
            .render(&dir.join("10.json"), "10 points", &Headless)
            .unwrap_err();
        assert_eq!(ErrorKind::Load, err.kind());
        assert!(
            !dir.join("report").join("10 points.png").exists(),
            "No artifact may be written when loading fails"
        );
    }

    #[test]
    fn test_schema_error_writes_nothing() {
        let dir = scratch_dir("schema");
        let source = dir.join("no-hull.json");
        fs::write(&source, r#"{"points": {"x": [0, 1], "y": [0, 1]}}"#).unwrap();
        let viewer = RecordingViewer::default();

        let err = renderer_for(&dir)
            .render(&source, "no hull", &viewer)
            .unwrap_err();
        assert_eq!(ErrorKind::Schema, err.kind());
        assert!(!dir.join("report").join("no hull.png").exists());
        assert!(viewer.shown.borrow().is_empty(), "Nothing should be shown on failure");
    }

    #[test]
    fn test_missing_report_dir_is_write_error() {
        let dir = scratch_dir("no-report");
        let source = write_square(&dir);
        let renderer = ResultRenderer::new(RenderConfig {
            report_dir: dir.join("does-not-exist"),
            ..RenderConfig::default()
        });

        let err = renderer.render(&source, "square", &Headless).unwrap_err();
        assert_eq!(ErrorKind::Write, err.kind());
        assert!(
            !dir.join("does-not-exist").exists(),
            "The report directory must not be created"
        );
    }

    #[test]
    fn test_invalid_titles() {
        let dir = scratch_dir("invalid-title");
        let source = write_square(&dir);
        let renderer = renderer_for(&dir);
        for title in ["", "../square", "a\\b"] {
            let err = renderer.render(&source, title, &Headless).unwrap_err();
            assert_eq!(
                ErrorKind::InvalidTitle,
                err.kind(),
                "Title {:?} must be rejected",
                title
            );
        }
    }

    #[test]
    fn test_viewer_failure_keeps_artifact() {
        let dir = scratch_dir("broken-viewer");
        let source = write_square(&dir);
        let outcome = renderer_for(&dir)
            .render(&source, "square", &BrokenViewer)
            .unwrap();
        assert!(outcome.artifact.is_file());
    }

    #[test]
    fn test_render_twice_gives_same_image() {
        let dir = scratch_dir("idempotent");
        let source = write_square(&dir);
        let renderer = renderer_for(&dir);

        let first = renderer.render(&source, "square", &Headless).unwrap();
        let first_pixels = image::open(&first.artifact).unwrap().to_rgb8().into_raw();
        let second = renderer.render(&source, "square", &Headless).unwrap();
        let second_pixels = image::open(&second.artifact).unwrap().to_rgb8().into_raw();

        assert_eq!(first.artifact, second.artifact);
        assert!(
            first_pixels == second_pixels,
            "Re-rendering the same input must give the same pixels"
        );
    }

    #[test]
    fn test_extent_near_f64_max_fails_without_hanging() {
        let dir = scratch_dir("huge-extent");
        let cases = [
            ("overflow.json", "[-1e308, 1e308]"),
            ("near-max.json", "[0, 1.75e308]"),
        ];
        for (name, x) in cases {
            let source = dir.join(name);
            fs::write(
                &source,
                format!(r#"{{"points": {{"x": {x}, "y": [0, 1]}}, "hull": {{"x": [], "y": []}}}}"#),
            )
            .unwrap();

            let err = renderer_for(&dir)
                .render(&source, "huge", &Headless)
                .unwrap_err();
            assert_eq!(ErrorKind::Draw, err.kind(), "x = {} must not be drawn", x);
            assert!(!dir.join("report").join("huge.png").exists());
        }
    }

    #[test]
    fn test_large_but_plottable_extent_renders() {
        let dir = scratch_dir("large-extent");
        let source = dir.join("large.json");
        fs::write(
            &source,
            r#"{"points": {"x": [-1e100, 1e100], "y": [0, 1e17]},
                "hull": {"x": [-1e100, 1e100], "y": [0, 1e17]}}"#,
        )
        .unwrap();

        let outcome = renderer_for(&dir)
            .render(&source, "large", &Headless)
            .unwrap();
        assert_eq!(2, outcome.points_drawn);
        assert!(outcome.artifact.is_file());
    }

    #[test]
    fn test_failed_write_leaves_no_file_behind() {
        let dir = scratch_dir("failed-write");
        let source = write_square(&dir);
        // a directory where the image should go makes the final rename fail
        fs::create_dir(dir.join("report").join("square.png")).unwrap();

        let err = renderer_for(&dir)
            .render(&source, "square", &Headless)
            .unwrap_err();
        assert_eq!(ErrorKind::Write, err.kind());

        let left = fs::read_dir(dir.join("report"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<String>>();
        assert_eq!(
            vec!["square.png".to_string()],
            left,
            "Only the blocking directory may remain in the report directory"
        );
        assert!(dir.join("report").join("square.png").is_dir());
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            PathBuf::from("report/.10 points.png.partial"),
            partial_path(Path::new("report/10 points.png"))
        );
    }
}
