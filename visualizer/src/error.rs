//! Errors that can abort a single render.

use std::fmt;
use std::path::PathBuf;

/// Coarse classification of a [`RenderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Schema,
    Write,
    InvalidTitle,
    Draw,
}

/// Everything that can go wrong between reading a result file and writing its image.
#[derive(Debug)]
pub enum RenderError {
    /// The source could not be opened, read, or parsed as JSON.
    Load { source: PathBuf, cause: String },
    /// The JSON is valid but does not have the `points`/`hull` shape.
    Schema { source: PathBuf, reason: String },
    /// The image could not be written to the report directory.
    Write { path: PathBuf, cause: String },
    /// The title cannot be used as a file name stem.
    InvalidTitle(String),
    /// The plotting backend failed while rasterising the figure.
    Draw(String),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Load { .. } => ErrorKind::Load,
            RenderError::Schema { .. } => ErrorKind::Schema,
            RenderError::Write { .. } => ErrorKind::Write,
            RenderError::InvalidTitle(_) => ErrorKind::InvalidTitle,
            RenderError::Draw(_) => ErrorKind::Draw,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Load => "load error",
            ErrorKind::Schema => "schema error",
            ErrorKind::Write => "write error",
            ErrorKind::InvalidTitle => "invalid title",
            ErrorKind::Draw => "draw error",
        };
        f.write_str(name)
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Load { source, cause } => {
                write!(f, "load error: cannot read {}: {}", source.display(), cause)
            }
            RenderError::Schema { source, reason } => {
                write!(f, "schema error in {}: {}", source.display(), reason)
            }
            RenderError::Write { path, cause } => {
                write!(f, "write error: cannot write {}: {}", path.display(), cause)
            }
            RenderError::InvalidTitle(title) => {
                write!(
                    f,
                    "invalid title {:?}: must be non-empty and contain no path separators",
                    title
                )
            }
            RenderError::Draw(msg) => write!(f, "draw error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}
