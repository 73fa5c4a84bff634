//! Makes available common structures needed to map horizons onto mesh layers
//!
//! You may write `use map2mesh::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{CellClass, Delimiter, Grid, GridHeader, IdEncoding, MapperConfig, MapperError, TopUpdate};
pub use crate::base::{DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::geology::{HorizonClassifier, LayerClassification, LayerEntry, LayerTable, RasterStore};
pub use crate::mapper::{AttributeDump, Faceset, Mapper, MeshAdapter};
