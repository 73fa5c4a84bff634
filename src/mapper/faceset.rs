use serde::{Deserialize, Serialize};

/// Defines a named group of mesh boundary faces used to tag boundary conditions
///
/// The coordinates of side sets are offsets from the lower-left corner of the DEM;
/// call [Faceset::resolve] to obtain absolute coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Faceset {
    /// Top, bottom, and/or lateral faces of the whole mesh
    Basic { top: bool, bottom: bool, sides: bool },

    /// Lateral faces along the polyline through `points`
    Sidesets {
        /// Name of the set (e.g., "outlet")
        name: String,

        /// Polyline vertices as (x, y) offsets
        points: Vec<[f64; 2]>,

        /// Restricts the set to the top layer of the mesh
        top_layer: bool,
    },
}

impl Faceset {
    /// Returns a copy with the point offsets shifted by the lower-left corner
    pub fn resolve(&self, xll: f64, yll: f64) -> Faceset {
        match self {
            Faceset::Basic { .. } => self.clone(),
            Faceset::Sidesets {
                name,
                points,
                top_layer,
            } => Faceset::Sidesets {
                name: name.clone(),
                points: points.iter().map(|p| [xll + p[0], yll + p[1]]).collect(),
                top_layer: *top_layer,
            },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
