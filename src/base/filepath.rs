use std::path::{Path, PathBuf};

/// Assembles the paths of the output files
pub struct FilePath {}

impl FilePath {
    /// Returns the filepath of the id raster of a layer (.asc text format)
    ///
    /// # Input
    ///
    /// * `output_dir` -- the directory of the results
    /// * `layer` -- the index of the layer in the layer table (0 is the topmost)
    pub fn layer_ids(output_dir: &str, layer: usize) -> PathBuf {
        Path::new(output_dir).join(format!("soil-id-layer-{}.asc", layer))
    }

    /// Returns the filepath of the mesh summary written by the attribute dump (.json)
    ///
    /// # Input
    ///
    /// * `output_dir` -- the directory of the results
    /// * `filename_stem` -- the filename without path and extension; "-mesh.json" is appended
    pub fn mesh_summary(output_dir: &str, filename_stem: &str) -> PathBuf {
        Path::new(output_dir).join(format!("{}-mesh.json", filename_stem))
    }

    /// Returns the filepath of a figure (.svg) file
    ///
    /// # Input
    ///
    /// * `output_dir` -- the directory of the results
    /// * `filename_key` -- the filename without path and extension; ".svg" is appended
    pub fn svg(output_dir: &str, filename_key: &str) -> PathBuf {
        Path::new(output_dir).join(format!("{}.svg", filename_key))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
