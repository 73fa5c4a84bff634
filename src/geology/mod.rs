//! Implements the classification of mesh layers against geological horizons

mod horizon_classifier;
mod layer_table;
mod raster_store;
pub use crate::geology::horizon_classifier::*;
pub use crate::geology::layer_table::*;
pub use crate::geology::raster_store::*;
