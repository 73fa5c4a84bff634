use super::{Faceset, MeshAdapter};
use crate::base::{Grid, MapperError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Implements a mesh adapter that records the layered setup and writes it as JSON
///
/// This adapter stands in for the external meshing library: it stores what the
/// library would receive so that the hand-off can be inspected or replayed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AttributeDump {
    /// Thickness of each layer, from the top
    pub thicknesses: Vec<f64>,

    /// Material id of each layer, from the top
    pub material_ids: Vec<i64>,

    /// Maps the mesh layer (1 is the bottom) to the attribute values (nrow × ncol)
    pub attributes: BTreeMap<usize, Vec<Vec<i32>>>,

    /// Face sets received on export
    pub facesets: Vec<Faceset>,

    /// Indicates that export has been called
    pub exported: bool,

    /// Where the JSON summary is written on export (nothing is written if None)
    #[serde(skip)]
    output_path: Option<PathBuf>,
}

impl AttributeDump {
    /// Allocates a new instance without mesh
    pub fn new(output_path: Option<PathBuf>) -> Self {
        AttributeDump {
            output_path,
            ..Default::default()
        }
    }

    /// Allocates a new instance with an existing layered mesh
    pub fn with_mesh(thicknesses: &[f64], material_ids: &[i64], output_path: Option<PathBuf>) -> Self {
        AttributeDump {
            thicknesses: thicknesses.to_vec(),
            material_ids: material_ids.to_vec(),
            output_path,
            ..Default::default()
        }
    }

    /// Returns the number of mesh layers
    pub fn n_layer(&self) -> usize {
        self.thicknesses.len()
    }

    /// Reads a JSON file written by export
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, MapperError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
        let file = File::open(path).map_err(|source| MapperError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| MapperError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes a JSON file with this struct
    fn write_json(&self, path: &Path) -> Result<(), MapperError> {
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|source| MapperError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let mut file = File::create(path).map_err(|source| MapperError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|source| MapperError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl MeshAdapter for AttributeDump {
    fn has_mesh(&self) -> bool {
        !self.thicknesses.is_empty()
    }

    fn build_layered_mesh(&mut self, thicknesses: &[f64], material_ids: &[i64]) -> Result<(), MapperError> {
        if thicknesses.is_empty() {
            return Err(MapperError::Mesh("at least one layer is required".to_string()));
        }
        if thicknesses.len() != material_ids.len() {
            return Err(MapperError::Mesh(format!(
                "{} thicknesses but {} material ids",
                thicknesses.len(),
                material_ids.len()
            )));
        }
        self.thicknesses = thicknesses.to_vec();
        self.material_ids = material_ids.to_vec();
        self.attributes.clear();
        Ok(())
    }

    fn add_attribute(&mut self, mesh_layer: usize, values: &Grid<i32>) -> Result<(), MapperError> {
        if !self.has_mesh() {
            return Err(MapperError::Mesh("the layered mesh has not been built".to_string()));
        }
        if mesh_layer < 1 || mesh_layer > self.n_layer() {
            return Err(MapperError::Mesh(format!(
                "mesh layer {} is out of range [1, {}]",
                mesh_layer,
                self.n_layer()
            )));
        }
        if self.attributes.contains_key(&mesh_layer) {
            return Err(MapperError::Mesh(format!("mesh layer {} already has an attribute", mesh_layer)));
        }
        self.attributes.insert(mesh_layer, values.to_rows());
        Ok(())
    }

    fn export(&mut self, facesets: &[Faceset]) -> Result<(), MapperError> {
        if !self.has_mesh() {
            return Err(MapperError::Mesh("cannot export without a mesh".to_string()));
        }
        self.facesets = facesets.to_vec();
        self.exported = true;
        if let Some(path) = &self.output_path {
            self.write_json(path)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
