use super::Faceset;
use crate::base::{Grid, MapperError};

/// Defines the services of the external meshing library
///
/// The mesh is a stack of layers extruded from the DEM surface. Mesh layers
/// are numbered from one, starting at the **bottom** of the stack, whereas the
/// layer table lists the layers from the top.
pub trait MeshAdapter {
    /// Returns true if a layered mesh already exists (e.g., given by the caller)
    fn has_mesh(&self) -> bool;

    /// Builds the layered mesh
    ///
    /// # Input
    ///
    /// * `thicknesses` -- thickness of each layer, from the top
    /// * `material_ids` -- material id of each layer, from the top
    fn build_layered_mesh(&mut self, thicknesses: &[f64], material_ids: &[i64]) -> Result<(), MapperError>;

    /// Attaches integer values (one per DEM cell) to a mesh layer
    fn add_attribute(&mut self, mesh_layer: usize, values: &Grid<i32>) -> Result<(), MapperError>;

    /// Exports the mesh with the given face sets (absolute coordinates)
    fn export(&mut self, facesets: &[Faceset]) -> Result<(), MapperError>;
}
