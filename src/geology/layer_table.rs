use crate::base::{parse_number, read_text_rows, Delimiter, MapperError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Holds the material id and thickness of a mesh layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerEntry {
    /// Material id (need not be unique)
    pub material_id: i64,

    /// Thickness (≥ 0)
    pub thickness: f64,
}

/// Holds the mesh layers from the top (first entry) downwards
#[derive(Clone, Debug, PartialEq)]
pub struct LayerTable {
    entries: Vec<LayerEntry>,
}

impl LayerTable {
    /// Allocates a new instance
    pub fn new(entries: Vec<LayerEntry>) -> Result<Self, MapperError> {
        if entries.is_empty() {
            return Err(MapperError::InvalidData("at least one layer is required".to_string()));
        }
        for (i, entry) in entries.iter().enumerate() {
            if !entry.thickness.is_finite() || entry.thickness < 0.0 {
                return Err(MapperError::InvalidData(format!(
                    "thickness of layer {} must be finite and ≥ 0; found {}",
                    i, entry.thickness
                )));
            }
        }
        Ok(LayerTable { entries })
    }

    /// Reads a comma-delimited table with rows `material_id, thickness`
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    /// * `comment` -- everything after this character is ignored
    pub fn read<P>(full_path: &P, comment: char) -> Result<Self, MapperError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
        let rows = read_text_rows(path, Delimiter::Char(','), comment)?;
        if rows.is_empty() {
            return Err(MapperError::Empty { path: path.to_path_buf() });
        }
        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let malformed = |reason: String| MapperError::Malformed {
                path: path.to_path_buf(),
                line: row.line,
                reason,
            };
            if row.fields.len() != 2 {
                return Err(malformed(format!(
                    "expected 2 fields (material_id, thickness), found {}",
                    row.fields.len()
                )));
            }
            let material_id = parse_material_id(&row.fields[0])
                .ok_or_else(|| malformed(format!("column 1: `{}` is not an integer material id", row.fields[0])))?;
            let thickness = parse_number(path, row.line, 2, &row.fields[1])?;
            if !thickness.is_finite() || thickness < 0.0 {
                return Err(malformed(format!("column 2: thickness must be finite and ≥ 0; found {}", thickness)));
            }
            entries.push(LayerEntry { material_id, thickness });
        }
        Ok(LayerTable { entries })
    }

    /// Returns the entries in traversal order
    pub fn entries(&self) -> &[LayerEntry] {
        &self.entries
    }

    /// Returns the number of layers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no layers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the material ids in traversal order
    pub fn material_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.material_id).collect()
    }

    /// Returns the thicknesses in traversal order
    pub fn thicknesses(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.thickness).collect()
    }

    /// Returns the sum of the thicknesses
    pub fn total_thickness(&self) -> f64 {
        self.entries.iter().map(|e| e.thickness).sum()
    }
}

/// Parses an integer id, also accepting integral floats such as "3.0"
fn parse_material_id(text: &str) -> Option<i64> {
    match text.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => Some(v as i64),
            _ => None,
        },
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
