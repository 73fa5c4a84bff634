//! Map2mesh maps geological horizons onto the layers of a DEM-based volumetric mesh
//!
//! The layers are given by a table of `(material_id, thickness)` entries, from the
//! top down. For each layer, the elevation at the middle of the layer is compared with
//! the elevations of the horizons, and each cell receives the id of the matching
//! horizon. One integer raster per layer is written and may be handed over to a
//! meshing library via [mapper::MeshAdapter].
//!
//! # Example
//!
//! ```
//! use map2mesh::prelude::*;
//!
//! fn main() -> Result<(), MapperError> {
//!     let dem = Grid::from(&[[10.0, 10.0], [10.0, 10.0]])?;
//!     let mut store = RasterStore::new(dem);
//!     store.push_horizon("sand", Grid::from(&[[12.0, 12.0], [12.0, 12.0]])?)?;
//!     let table = LayerTable::new(vec![LayerEntry {
//!         material_id: 1,
//!         thickness: 2.0,
//!     }])?;
//!     let layers = HorizonClassifier::new(&store)?.run(&table);
//!     assert_eq!(layers[0].classes.get(0, 0), CellClass::Horizon(0));
//!     Ok(())
//! }
//! ```

pub mod base;
pub mod geology;
pub mod mapper;
pub mod prelude;
pub mod util;
