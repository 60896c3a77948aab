//! Backend-independent description of the points/hull scatter plot.
//!
//! A [`Figure`] owns everything needed to draw one chart and can be drawn on
//! any plotters [`DrawingArea`]: the in-memory bitmap used for the PNG
//! artifact and the druid window of the interactive viewer both go through
//! [`Figure::draw_on`], so the two always show the same picture.

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

use crate::geometry::{GeometryResult, Layer};

/// Legend label of the sample point layer.
pub const POINTS_LABEL: &str = "points";
/// Legend label of the hull layer.
pub const HULL_LABEL: &str = "hull";

// First two colors of matplotlib's default cycle.
const POINTS_COLOR: RGBColor = RGBColor(31, 119, 180);
const HULL_COLOR: RGBColor = RGBColor(255, 127, 14);

/// Fraction of the data extent left free around the markers.
const AXIS_MARGIN: f64 = 0.05;
/// Extra space above the data, where the legend sits.
const LEGEND_HEADROOM: f64 = 0.25;

/// Pixel centers of the markers drawn per layer, in layer order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawnMarkers {
    pub points: Vec<(i32, i32)>,
    pub hull: Vec<(i32, i32)>,
}

#[derive(Debug, Clone)]
pub struct Figure {
    title: String,
    result: GeometryResult,
    marker_size: u32,
}

impl Figure {
    pub fn new(title: &str, result: GeometryResult, marker_size: u32) -> Self {
        Figure {
            title: title.to_string(),
            result,
            marker_size,
        }
    }

    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// Data ranges of the two axes, `None` if the coordinates are too far
    /// apart to be laid out on one chart.
    pub fn axis_ranges(&self) -> Option<(Range<f64>, Range<f64>)> {
        match self.result.bounds() {
            Some(bounds) => bounds.axis_ranges(AXIS_MARGIN, LEGEND_HEADROOM),
            None => Some((0.0..1.0, 0.0..1.0)),
        }
    }

    /// Draws the whole chart onto `root`, clearing it first.
    ///
    /// Points are drawn before the hull so hull markers stay visible on top
    /// of dense point clouds.
    pub fn draw_on<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<DrawnMarkers, DrawingAreaErrorKind<DB::ErrorType>> {
        let (x_range, y_range) = self
            .axis_ranges()
            .ok_or(DrawingAreaErrorKind::LayoutError)?;
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 20))
            .margin(10)
            .set_left_and_bottom_label_area_size(40)
            .build_cartesian_2d(x_range, y_range)?;

        chart.configure_mesh().disable_mesh().draw()?;

        let points = self.result.get_points();
        let points = self.draw_layer(&mut chart, points, POINTS_LABEL, POINTS_COLOR)?;
        let hull = self.result.get_hull();
        let hull = self.draw_layer(&mut chart, hull, HULL_LABEL, HULL_COLOR)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(DrawnMarkers { points, hull })
    }

    fn draw_layer<DB: DrawingBackend>(
        &self,
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        layer: &Layer,
        label: &str,
        color: RGBColor,
    ) -> Result<Vec<(i32, i32)>, DrawingAreaErrorKind<DB::ErrorType>> {
        let size = self.marker_size;
        let coords = layer
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect::<Vec<(f64, f64)>>();
        let drawn = coords.iter().map(|c| chart.backend_coord(c)).collect();

        chart
            .draw_series(
                coords
                    .into_iter()
                    .map(|c| Circle::new(c, size, color.filled())),
            )?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 10, y), size, color.filled()));

        Ok(drawn)
    }
}
