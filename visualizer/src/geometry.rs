use std::fmt;
use std::ops::Range;

/// Returned by [`Layer::new`] when the coordinate sequences differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch {
    pub x_len: usize,
    pub y_len: usize,
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x has {} values but y has {}", self.x_len, self.y_len)
    }
}

impl std::error::Error for LengthMismatch {}

/// A sequence of 2-D coordinates stored as two parallel columns.
/// Both columns always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Layer {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, LengthMismatch> {
        if x.len() != y.len() {
            return Err(LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Layer { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Iterates the layer as `(x, y)` pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// The point set of one dataset together with its convex hull, as produced
/// by the hull computation. The hull is trusted to be a subset of the points
/// in traversal order; nothing here checks that.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryResult {
    points: Layer,
    hull: Layer,
}

impl GeometryResult {
    pub fn new(points: Layer, hull: Layer) -> Self {
        GeometryResult { points, hull }
    }

    pub fn get_points(&self) -> &Layer {
        &self.points
    }

    pub fn get_hull(&self) -> &Layer {
        &self.hull
    }

    /// Bounding box over both layers, skipping non-finite coordinates.
    /// `None` when there is nothing finite to bound.
    pub fn bounds(&self) -> Option<Bounds> {
        self.points
            .iter()
            .chain(self.hull.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .fold(None, |acc: Option<Bounds>, (x, y)| match acc {
                None => Some(Bounds {
                    x_min: x,
                    x_max: x,
                    y_min: y,
                    y_max: y,
                }),
                Some(b) => Some(Bounds {
                    x_min: b.x_min.min(x),
                    x_max: b.x_max.max(x),
                    y_min: b.y_min.min(y),
                    y_max: b.y_max.max(y),
                }),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Axis ranges around the bounds. `margin` (a fraction of the extent) is
    /// added on both sides of x and below y, `headroom` above y.
    ///
    /// `None` when no finite range of at most [`MAX_AXIS_SPAN`] contains the
    /// data, e.g. for coordinates near `f64::MIN` and `f64::MAX` at once.
    pub fn axis_ranges(&self, margin: f64, headroom: f64) -> Option<(Range<f64>, Range<f64>)> {
        let x = pad(self.x_min, self.x_max, margin, margin)?;
        let y = pad(self.y_min, self.y_max, margin, headroom)?;
        Some((x, y))
    }
}

/// Widest axis range handed to the plotting backend. Leaves plenty of room
/// below `f64::MAX` for the backend's tick arithmetic.
pub const MAX_AXIS_SPAN: f64 = 1e300;

fn is_usable(range: &Range<f64>) -> bool {
    range.start.is_finite()
        && range.end.is_finite()
        && range.start < range.end
        && range.end - range.start <= MAX_AXIS_SPAN
}

/// Padded range if it fits, else the bare data range.
fn pad(min: f64, max: f64, below: f64, above: f64) -> Option<Range<f64>> {
    let extent = max - min;
    if !extent.is_finite() {
        return None;
    }
    let padded = if extent > 0.0 {
        (min - extent * below)..(max + extent * above)
    } else {
        let half = (min.abs() * below).max(0.5);
        (min - half)..(max + half)
    };
    [padded, min..max].into_iter()
        .find(is_usable)
}
