use std::path::PathBuf;
use thiserror::Error;

/// Defines the errors returned by the mapper
///
/// The first three variants are load errors; see [MapperError::is_load_error].
#[derive(Debug, Error)]
pub enum MapperError {
    /// The file cannot be opened or read
    #[error("cannot read `{}`: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content cannot be parsed
    #[error("malformed file `{}` (line {line}): {reason}", .path.display())]
    Malformed { path: PathBuf, line: usize, reason: String },

    /// The file has no data rows (after removing comments and blank lines)
    #[error("file `{}` holds no data", .path.display())]
    Empty { path: PathBuf },

    /// A horizon grid and the DEM have different dimensions
    #[error(
        "shape mismatch in `{}`: expected {}x{} (rows x cols) as the DEM, found {}x{}",
        .path.display(), .expected.0, .expected.1, .actual.0, .actual.1
    )]
    ShapeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The classification was requested without horizons
    #[error("no horizons defined; cannot proceed")]
    NoHorizons,

    /// In-memory data violates an invariant
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The configuration is inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An output file cannot be written
    #[error("cannot write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON file cannot be parsed or generated
    #[error("JSON failure with `{}`: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The figure cannot be generated
    #[error("cannot save figure: {0}")]
    Plot(String),

    /// The mesh adapter rejected a request
    #[error("mesh adapter failure: {0}")]
    Mesh(String),
}

impl MapperError {
    /// Returns true if the error comes from reading or parsing an input file
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            MapperError::Unreadable { .. } | MapperError::Malformed { .. } | MapperError::Empty { .. }
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
