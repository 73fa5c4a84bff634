use super::MeshAdapter;
use crate::base::{Delimiter, FilePath, Grid, MapperConfig, MapperError, MARK_NA, MARK_OK};
use crate::geology::{HorizonClassifier, LayerClassification, LayerTable, RasterStore};
use std::fs;
use std::path::Path;

/// Maps geological horizons onto the layers of a DEM-based mesh
///
/// # Workflow
///
/// 1. [Mapper::new] reads the DEM, the layer table, and the horizons listed in the configuration
/// 2. [Mapper::add_horizon] appends more horizons (the order is the traversal order)
/// 3. [Mapper::generate_ids_per_layer] classifies the layers and writes one id raster per layer
/// 4. [Mapper::map_to_mesh] additionally hands the ids over to a [MeshAdapter]
pub struct Mapper {
    config: MapperConfig,
    store: RasterStore,
    table: LayerTable,
}

impl Mapper {
    /// Allocates a new instance by reading the input files listed in the configuration
    pub fn new(config: MapperConfig) -> Result<Self, MapperError> {
        config.validate()?;
        let dem_path = config.input_path(&config.dem);
        let mut store = RasterStore::read(&dem_path, Delimiter::from_sep(&config.dem_sep)?, config.comment)?;
        if config.reset_origin {
            store.reset_origin();
        }
        let table = LayerTable::read(&config.input_path(&config.layer_table), config.comment)?;
        let horizons = config.horizons.clone();
        let mut mapper = Mapper { config, store, table };
        for horizon in &horizons {
            mapper.read_horizon(&horizon.file, &horizon.sep, horizon.comment)?;
        }
        Ok(mapper)
    }

    /// Allocates a new instance with data already in memory
    pub fn from_data(config: MapperConfig, store: RasterStore, table: LayerTable) -> Self {
        Mapper { config, store, table }
    }

    /// Reads a horizon raster (relative to the input directory) and appends it to the horizons
    ///
    /// # Input
    ///
    /// * `file` -- the filename
    /// * `sep` -- the separator of the fields (" " means any whitespace)
    /// * `comment` -- the comment indicator
    pub fn add_horizon(&mut self, file: &str, sep: &str, comment: char) -> Result<&mut Self, MapperError> {
        self.read_horizon(file, sep, comment)?;
        self.config.add_horizon(file, sep, comment)?;
        Ok(self)
    }

    /// Reads a horizon without registering it in the configuration
    fn read_horizon(&mut self, file: &str, sep: &str, comment: char) -> Result<(), MapperError> {
        let path = self.config.input_path(file);
        self.store.add_horizon(&path, Delimiter::from_sep(sep)?, comment)?;
        self.message(true, &format!("added {} to the horizons.", file));
        Ok(())
    }

    /// Returns the configuration
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Returns the DEM and the horizons
    pub fn store(&self) -> &RasterStore {
        &self.store
    }

    /// Returns the layer table
    pub fn table(&self) -> &LayerTable {
        &self.table
    }

    /// Classifies every layer and writes the id rasters to the output directory
    ///
    /// # Output
    ///
    /// Returns the classifications in table order (0 is the topmost layer).
    /// The file of layer `i` is `soil-id-layer-<i>.asc`; see [FilePath::layer_ids].
    ///
    /// # Errors
    ///
    /// Returns [MapperError::NoHorizons] (before writing anything) if no horizon was added.
    /// If a file cannot be written, the files of the previous layers are removed.
    pub fn generate_ids_per_layer(&self) -> Result<Vec<LayerClassification>, MapperError> {
        // check
        let mut classifier = match HorizonClassifier::new(&self.store) {
            Ok(c) => c,
            Err(e) => {
                self.message(false, "no horizons defined. cannot proceed.");
                return Err(e);
            }
        };
        classifier.set_top_update(self.config.top_update);
        self.config.encoding.validate(self.store.n_horizon())?;

        // output directory
        let out_dir = &self.config.output_dir;
        fs::create_dir_all(out_dir).map_err(|source| MapperError::Write {
            path: Path::new(out_dir).to_path_buf(),
            source,
        })?;

        // run
        let mut written = Vec::new();
        let res = classifier.run_with(&self.table, |layer| {
            let path = FilePath::layer_ids(out_dir, layer.index);
            self.layer_ids(layer).write(&path, Delimiter::Whitespace)?;
            written.push(path);
            if self.config.verbose {
                for line in self.layer_report(layer) {
                    println!("{}", line);
                }
            }
            Ok(())
        });

        // remove partial output
        if res.is_err() {
            for path in &written {
                if let Err(e) = fs::remove_file(path) {
                    log::warn!("cannot remove {}: {}", path.display(), e);
                }
            }
        }
        res
    }

    /// Classifies the layers and hands the ids over to the mesh adapter
    ///
    /// # Notes
    ///
    /// * The layered mesh is built first, unless the adapter already has one
    /// * Mesh layers count from the bottom, thus table layer `n - 1 - i` goes to mesh layer `i + 1`
    /// * The face sets of the configuration are shifted by the lower-left corner of the DEM
    pub fn map_to_mesh<A>(&self, adapter: &mut A) -> Result<Vec<LayerClassification>, MapperError>
    where
        A: MeshAdapter,
    {
        // fail before touching the mesh
        if self.store.n_horizon() == 0 {
            self.message(false, "no horizons defined. cannot proceed.");
            return Err(MapperError::NoHorizons);
        }

        // mesh
        if !adapter.has_mesh() {
            adapter.build_layered_mesh(&self.table.thicknesses(), &self.table.material_ids())?;
        }

        // attributes
        let layers = self.generate_ids_per_layer()?;
        for (i, layer) in layers.iter().rev().enumerate() {
            adapter.add_attribute(i + 1, &self.layer_ids(layer))?;
        }

        // face sets
        let (xll, yll) = match self.store.dem().header() {
            Some(h) => (h.xll_corner, h.yll_corner),
            None => (0.0, 0.0),
        };
        let facesets: Vec<_> = self.config.facesets.iter().map(|f| f.resolve(xll, yll)).collect();
        adapter.export(&facesets)?;
        self.message(true, "mesh exported.");
        Ok(layers)
    }

    /// Returns the integer ids of a layer according to the configured encoding
    pub fn layer_ids(&self, layer: &LayerClassification) -> Grid<i32> {
        let encoding = self.config.encoding;
        layer.classes.map(|c| encoding.encode(c))
    }

    /// Returns the diagnostic lines of a classified layer (with the `[OK]`/`[!!]` markers)
    ///
    /// * the mean elevation of the valid cells of the top surface
    /// * the depth of the next top surface below the DEM (difference of the means)
    /// * the number of unclassified cells, if any
    pub fn layer_report(&self, layer: &LayerClassification) -> Vec<String> {
        let mut lines = Vec::new();
        match layer.top.mean_valid() {
            Some(mean) => lines.push(format!("{} geology type mapped to {:.6} m.", MARK_OK, mean)),
            None => lines.push(format!(
                "{} layer {}: no valid cells in the top surface.",
                MARK_NA, layer.index
            )),
        }
        let next_top = self.config.top_update.next_top(&layer.target, layer.thickness);
        if let (Some(dem), Some(top)) = (self.store.dem().mean_valid(), next_top.mean_valid()) {
            lines.push(format!("{} delta z is {:.6} m.", MARK_OK, dem - top));
        }
        if layer.n_unclassified > 0 {
            lines.push(format!(
                "{} layer {}: {} cells left unclassified.",
                MARK_NA, layer.index, layer.n_unclassified
            ));
        }
        lines
    }

    /// Prints a progress message if verbose
    fn message(&self, ok: bool, text: &str) {
        if self.config.verbose {
            println!("{} {}", if ok { MARK_OK } else { MARK_NA }, text);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Mapper;
    use crate::base::{FilePath, Grid, GridHeader, IdEncoding, MapperConfig, MapperError};
    use crate::geology::{HorizonClassifier, LayerEntry, LayerTable, RasterStore};
    use crate::mapper::{AttributeDump, Faceset, MeshAdapter};
    use std::fs;
    use tempfile::tempdir;

    fn config_for(out_dir: &str) -> MapperConfig {
        let mut config = MapperConfig::new();
        config.set_output_dir(out_dir).unwrap().set_verbose(false).unwrap();
        config
    }

    fn table(thicknesses: &[f64]) -> LayerTable {
        let entries = thicknesses
            .iter()
            .enumerate()
            .map(|(i, t)| LayerEntry {
                material_id: (i + 1) as i64,
                thickness: *t,
            })
            .collect();
        LayerTable::new(entries).unwrap()
    }

    #[test]
    fn generate_ids_per_layer_writes_files() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().to_string_lossy().to_string();
        let mut store = RasterStore::new(Grid::from(&[[10.0, 10.0], [10.0, -9999.0]])?);
        store.push_horizon("h0", Grid::from(&[[12.0, 5.0], [12.0, 12.0]])?)?;
        let mapper = Mapper::from_data(config_for(&out_dir), store, table(&[2.0, 2.0]));
        let layers = mapper.generate_ids_per_layer()?;
        assert_eq!(layers.len(), 2);
        let first = fs::read_to_string(FilePath::layer_ids(&out_dir, 0)).unwrap();
        assert_eq!(first, "1 0\n1 -9999\n");
        let second = fs::read_to_string(FilePath::layer_ids(&out_dir, 1)).unwrap();
        assert_eq!(second, "1 0\n1 -9999\n");
        Ok(())
    }

    #[test]
    fn generate_ids_per_layer_uses_encoding() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().to_string_lossy().to_string();
        let mut config = config_for(&out_dir);
        config.set_encoding(IdEncoding {
            above_all: 100,
            no_data: -1,
        })?;
        let mut store = RasterStore::new(Grid::from(&[[10.0, 10.0]])?);
        store.push_horizon("h0", Grid::from(&[[5.0, 12.0]])?)?;
        let mapper = Mapper::from_data(config, store, table(&[2.0]));
        mapper.generate_ids_per_layer()?;
        let ids = fs::read_to_string(FilePath::layer_ids(&out_dir, 0)).unwrap();
        assert_eq!(ids, "100 1\n");
        Ok(())
    }

    #[test]
    fn layer_report_works_with_sample_data() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().to_string_lossy().to_string();
        let mut config = config_for(&out_dir);
        config
            .set_input_dir("data/input")?
            .set_dem("dem.asc", " ")?
            .add_horizon("horizon_top.asc", " ", '#')?
            .add_horizon("horizon_base.csv", ",", '#')?;
        let mapper = Mapper::new(config)?;
        let layers = mapper.generate_ids_per_layer()?;

        // mean of the 11 valid DEM cells = 200 / 11; the -9999 cell is never classified
        let correct = [
            ["[OK] geology type mapped to 18.181818 m.", "[OK] delta z is 1.000000 m."],
            ["[OK] geology type mapped to 17.181818 m.", "[OK] delta z is 2.000000 m."],
            ["[OK] geology type mapped to 16.181818 m.", "[OK] delta z is 4.000000 m."],
            ["[OK] geology type mapped to 14.181818 m.", "[OK] delta z is 9.000000 m."],
        ];
        assert_eq!(layers.len(), correct.len());
        for (layer, lines) in layers.iter().zip(correct.iter()) {
            let warning = format!("[!!] layer {}: 1 cells left unclassified.", layer.index);
            assert_eq!(
                mapper.layer_report(layer),
                vec![lines[0].to_string(), lines[1].to_string(), warning]
            );
        }
        Ok(())
    }

    #[test]
    fn layer_report_skips_warning_when_all_classified() -> Result<(), MapperError> {
        let mut store = RasterStore::new(Grid::from(&[[10.0, 12.0]])?);
        store.push_horizon("h0", Grid::from(&[[5.0, 5.0]])?)?;
        let mapper = Mapper::from_data(config_for("/tmp/map2mesh/unused"), store, table(&[2.0]));
        let layers = HorizonClassifier::new(mapper.store())?.run(mapper.table());
        assert_eq!(
            mapper.layer_report(&layers[0]),
            vec![
                "[OK] geology type mapped to 11.000000 m.".to_string(),
                "[OK] delta z is 1.000000 m.".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn write_failure_removes_partial_output() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().to_string_lossy().to_string();
        fs::create_dir_all(FilePath::layer_ids(&out_dir, 1)).unwrap(); // blocks the file of layer 1
        let mut store = RasterStore::new(Grid::from(&[[10.0]])?);
        store.push_horizon("h0", Grid::from(&[[5.0]])?)?;
        let mapper = Mapper::from_data(config_for(&out_dir), store, table(&[1.0, 1.0, 1.0]));
        let err = mapper.generate_ids_per_layer().err().unwrap();
        assert!(matches!(err, MapperError::Write { .. }));
        assert!(!FilePath::layer_ids(&out_dir, 0).exists());
        assert!(!FilePath::layer_ids(&out_dir, 2).exists());
        Ok(())
    }

    #[test]
    fn no_horizons_writes_nothing() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("results").to_string_lossy().to_string();
        let store = RasterStore::new(Grid::from(&[[10.0]]).unwrap());
        let mapper = Mapper::from_data(config_for(&out_dir), store, table(&[1.0]));
        assert!(matches!(mapper.generate_ids_per_layer(), Err(MapperError::NoHorizons)));
        let mut dump = AttributeDump::new(None);
        assert!(matches!(mapper.map_to_mesh(&mut dump), Err(MapperError::NoHorizons)));
        assert!(!dump.has_mesh());
        assert!(!std::path::Path::new(&out_dir).exists());
    }

    #[test]
    fn map_to_mesh_reverses_layers() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().to_string_lossy().to_string();
        let mut config = config_for(&out_dir);
        config.add_faceset(Faceset::Sidesets {
            name: "outlet".to_string(),
            points: vec![[5.0, 1.0], [4.0, 0.5]],
            top_layer: true,
        })?;
        let mut dem = Grid::from(&[[10.0]])?;
        dem.set_header(Some(GridHeader {
            xll_corner: 100.0,
            yll_corner: 200.0,
            cellsize: 1.0,
            nodata: None,
        }));
        let mut store = RasterStore::new(dem);
        store.push_horizon("h0", Grid::from(&[[8.0]])?)?.push_horizon("h1", Grid::from(&[[4.0]])?)?;

        // targets: 9.5 (above all), 8.0 (h0), 4.0 (h1)
        let mapper = Mapper::from_data(config, store, table(&[1.0, 3.0, 8.0]));
        let mut dump = AttributeDump::new(None);
        let layers = mapper.map_to_mesh(&mut dump)?;
        assert_eq!(layers.len(), 3);
        assert_eq!(dump.thicknesses, vec![1.0, 3.0, 8.0]);
        assert_eq!(dump.material_ids, vec![1, 2, 3]);
        assert_eq!(dump.attributes.get(&1), Some(&vec![vec![2]])); // bottom = last table layer
        assert_eq!(dump.attributes.get(&2), Some(&vec![vec![1]]));
        assert_eq!(dump.attributes.get(&3), Some(&vec![vec![0]])); // top
        assert!(dump.exported);
        assert_eq!(
            dump.facesets,
            vec![Faceset::Sidesets {
                name: "outlet".to_string(),
                points: vec![[105.0, 201.0], [104.0, 200.5]],
                top_layer: true,
            }]
        );
        Ok(())
    }

    #[test]
    fn map_to_mesh_keeps_existing_mesh() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().to_string_lossy().to_string();
        let mut store = RasterStore::new(Grid::from(&[[10.0]])?);
        store.push_horizon("h0", Grid::from(&[[5.0]])?)?;
        let mapper = Mapper::from_data(config_for(&out_dir), store, table(&[1.0]));
        let mut dump = AttributeDump::with_mesh(&[1.0], &[7], None);
        mapper.map_to_mesh(&mut dump)?;
        assert_eq!(dump.material_ids, vec![7]);
        assert_eq!(dump.attributes.get(&1), Some(&vec![vec![0]]));
        Ok(())
    }
}
