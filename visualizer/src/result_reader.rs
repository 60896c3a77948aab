use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::RenderError;
use crate::geometry::{GeometryResult, Layer};

/// On-disk shape of one layer. Both keys are optional here so that a missing
/// key is reported as a schema problem instead of a parse failure.
#[derive(Debug, Deserialize, Serialize)]
struct LayerRecord {
    x: Option<Vec<f64>>,
    y: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ResultRecord {
    points: Option<LayerRecord>,
    hull: Option<LayerRecord>,
}

/// # Result reader
/// * `path` - location of a `{"points": {"x", "y"}, "hull": {"x", "y"}}` document
///
/// Unreadable files and invalid JSON give [`RenderError::Load`]; valid JSON of
/// the wrong shape gives [`RenderError::Schema`].
pub fn read(path: &Path) -> Result<GeometryResult, RenderError> {
    let file = File::open(path).map_err(|e| RenderError::Load {
        source: path.to_path_buf(),
        cause: e.to_string(),
    })?;
    let value: serde_json::Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| RenderError::Load {
            source: path.to_path_buf(),
            cause: e.to_string(),
        })?;
    log::debug!("parsed {}", path.display());
    from_value(path, value)
}

fn from_value(path: &Path, value: serde_json::Value) -> Result<GeometryResult, RenderError> {
    let schema_error = |reason: String| RenderError::Schema {
        source: path.to_path_buf(),
        reason,
    };

    let record: ResultRecord =
        serde_json::from_value(value).map_err(|e| schema_error(e.to_string()))?;
    let points = record
        .points
        .ok_or_else(|| schema_error("missing key `points`".to_string()))?;
    let hull = record
        .hull
        .ok_or_else(|| schema_error("missing key `hull`".to_string()))?;

    let points = into_layer("points", points).map_err(schema_error)?;
    let hull = into_layer("hull", hull).map_err(schema_error)?;
    Ok(GeometryResult::new(points, hull))
}

fn into_layer(name: &str, record: LayerRecord) -> Result<Layer, String> {
    let x = record
        .x
        .ok_or_else(|| format!("missing key `{name}.x`"))?;
    let y = record
        .y
        .ok_or_else(|| format!("missing key `{name}.y`"))?;
    Layer::new(x, y).map_err(|e| format!("layer `{name}`: {e}"))
}

/// # Result saver
/// Serializes `result` to `path` in the same format [`read`] accepts.
pub fn save(result: &GeometryResult, path: &Path) -> Result<(), RenderError> {
    let write_error = |cause: String| RenderError::Write {
        path: path.to_path_buf(),
        cause,
    };
    let to_record = |layer: &Layer| LayerRecord {
        x: Some(layer.x().to_vec()),
        y: Some(layer.y().to_vec()),
    };
    let record = ResultRecord {
        points: Some(to_record(result.get_points())),
        hull: Some(to_record(result.get_hull())),
    };

    let file = File::create(path).map_err(|e| write_error(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &record).map_err(|e| write_error(e.to_string()))?;
    writer.flush().map_err(|e| write_error(e.to_string()))
}
