use super::Grid;
use serde::{Deserialize, Serialize};

/// Defines the class assigned to a grid cell of a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellClass {
    /// The layer surface lies above the first horizon
    AboveAll,

    /// The layer surface is nearest to the horizon with this (0-based) index
    Horizon(usize),

    /// The cell could not be classified (outside the domain or no valid comparison)
    NoData,
}

impl CellClass {
    /// Returns true if the cell holds a class (i.e., it is not NoData)
    #[inline]
    pub fn is_classified(&self) -> bool {
        !matches!(self, CellClass::NoData)
    }
}

/// Defines how the top surface of the next layer is obtained from the current target surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopUpdate {
    /// The next top is the target (mid-layer) surface of the current layer
    Midpoint,

    /// The next top is half a thickness below the target surface (the bottom of the current layer)
    LayerBottom,
}

impl Default for TopUpdate {
    fn default() -> Self {
        TopUpdate::Midpoint
    }
}

impl TopUpdate {
    /// Returns the top surface for the next layer
    pub fn next_top(&self, target: &Grid<f64>, thickness: f64) -> Grid<f64> {
        match self {
            TopUpdate::Midpoint => target.clone(),
            TopUpdate::LayerBottom => target.map(|z| z - 0.5 * thickness),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
