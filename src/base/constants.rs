/// Defines the directory where the per-layer id rasters are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/map2mesh/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/map2mesh/test";

/// Defines the directory holding the input rasters and the layer table
pub const DEFAULT_INPUT_DIR: &str = "input";

/// Defines the filename of the layer table
pub const DEFAULT_LAYER_TABLE: &str = "layer-thickness.dat";

/// Prefixes the progress messages reporting success
pub const MARK_OK: &str = "[OK]";

/// Prefixes the progress messages reporting a problem
pub const MARK_NA: &str = "[!!]";
