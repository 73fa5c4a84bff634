use super::{Delimiter, IdEncoding, MapperError, TopUpdate};
use super::{DEFAULT_INPUT_DIR, DEFAULT_LAYER_TABLE, DEFAULT_OUT_DIR};
use crate::mapper::Faceset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Holds the input data of a horizon raster
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizonInput {
    /// Filename relative to the input directory
    pub file: String,

    /// Separator of the fields (" " means any whitespace)
    #[serde(default = "default_sep")]
    pub sep: String,

    /// Comment indicator
    #[serde(default = "default_comment")]
    pub comment: char,
}

fn default_sep() -> String {
    " ".to_string()
}

fn default_comment() -> char {
    '#'
}

/// Holds configuration data such as input files, output directory, and the id encoding
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Directory of the input files
    pub input_dir: String,

    /// Filename of the DEM raster (relative to the input directory)
    pub dem: String,

    /// Separator of the DEM fields
    pub dem_sep: String,

    /// Filename of the layer table (relative to the input directory)
    pub layer_table: String,

    /// Comment indicator of the DEM and the layer table
    pub comment: char,

    /// Horizon rasters in traversal order
    pub horizons: Vec<HorizonInput>,

    /// Directory of the per-layer id rasters
    pub output_dir: String,

    /// Integer codes of the cell classes
    pub encoding: IdEncoding,

    /// Rule to obtain the top surface of the next layer
    pub top_update: TopUpdate,

    /// Moves the lower-left corner of the DEM to (0, 0) after loading
    pub reset_origin: bool,

    /// Prints progress messages
    pub verbose: bool,

    /// Face sets handed over to the mesh adapter (coordinates relative to the lower-left corner)
    pub facesets: Vec<Faceset>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig::new()
    }
}

impl MapperConfig {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        MapperConfig {
            input_dir: DEFAULT_INPUT_DIR.to_string(),
            dem: String::new(),
            dem_sep: default_sep(),
            layer_table: DEFAULT_LAYER_TABLE.to_string(),
            comment: default_comment(),
            horizons: Vec::new(),
            output_dir: DEFAULT_OUT_DIR.to_string(),
            encoding: IdEncoding::default(),
            top_update: TopUpdate::default(),
            reset_origin: false,
            verbose: true,
            facesets: Vec::new(),
        }
    }

    /// Sets the directory of the input files
    pub fn set_input_dir(&mut self, dir: &str) -> Result<&mut Self, MapperError> {
        if dir.is_empty() {
            return Err(MapperError::InvalidConfig("input directory must not be empty".to_string()));
        }
        self.input_dir = dir.to_string();
        Ok(self)
    }

    /// Sets the filename of the DEM and the separator of its fields
    pub fn set_dem(&mut self, file: &str, sep: &str) -> Result<&mut Self, MapperError> {
        if file.is_empty() {
            return Err(MapperError::InvalidConfig("DEM filename must not be empty".to_string()));
        }
        check_comment(self.comment, sep)?;
        self.dem = file.to_string();
        self.dem_sep = sep.to_string();
        Ok(self)
    }

    /// Sets the filename of the layer table
    pub fn set_layer_table(&mut self, file: &str) -> Result<&mut Self, MapperError> {
        if file.is_empty() {
            return Err(MapperError::InvalidConfig("layer table filename must not be empty".to_string()));
        }
        self.layer_table = file.to_string();
        Ok(self)
    }

    /// Sets the comment indicator of the DEM and the layer table
    pub fn set_comment(&mut self, comment: char) -> Result<&mut Self, MapperError> {
        check_comment(comment, ",")?;
        check_comment(comment, &self.dem_sep)?;
        self.comment = comment;
        Ok(self)
    }

    /// Appends a horizon raster (the order of calls is the traversal order)
    pub fn add_horizon(&mut self, file: &str, sep: &str, comment: char) -> Result<&mut Self, MapperError> {
        if file.is_empty() {
            return Err(MapperError::InvalidConfig("horizon filename must not be empty".to_string()));
        }
        check_comment(comment, sep)?;
        self.horizons.push(HorizonInput {
            file: file.to_string(),
            sep: sep.to_string(),
            comment,
        });
        Ok(self)
    }

    /// Sets the directory of the per-layer id rasters
    pub fn set_output_dir(&mut self, dir: &str) -> Result<&mut Self, MapperError> {
        if dir.is_empty() {
            return Err(MapperError::InvalidConfig("output directory must not be empty".to_string()));
        }
        self.output_dir = dir.to_string();
        Ok(self)
    }

    /// Sets the integer codes of the cell classes
    pub fn set_encoding(&mut self, encoding: IdEncoding) -> Result<&mut Self, MapperError> {
        encoding.validate(self.horizons.len())?;
        self.encoding = encoding;
        Ok(self)
    }

    /// Sets the rule to obtain the top surface of the next layer
    pub fn set_top_update(&mut self, option: TopUpdate) -> Result<&mut Self, MapperError> {
        self.top_update = option;
        Ok(self)
    }

    /// Sets the option to move the lower-left corner of the DEM to (0, 0)
    pub fn set_reset_origin(&mut self, flag: bool) -> Result<&mut Self, MapperError> {
        self.reset_origin = flag;
        Ok(self)
    }

    /// Enables or disables the progress messages
    pub fn set_verbose(&mut self, flag: bool) -> Result<&mut Self, MapperError> {
        self.verbose = flag;
        Ok(self)
    }

    /// Appends a face set for the mesh adapter
    pub fn add_faceset(&mut self, faceset: Faceset) -> Result<&mut Self, MapperError> {
        if let Faceset::Sidesets { name, points, .. } = &faceset {
            if points.len() < 2 {
                return Err(MapperError::InvalidConfig(format!(
                    "side set `{}` requires at least two points",
                    name
                )));
            }
        }
        self.facesets.push(faceset);
        Ok(self)
    }

    /// Returns the full path of an input file
    pub fn input_path(&self, file: &str) -> PathBuf {
        Path::new(&self.input_dir).join(file)
    }

    /// Checks the consistency of the data (e.g., after reading a JSON file)
    pub fn validate(&self) -> Result<(), MapperError> {
        if self.dem.is_empty() {
            return Err(MapperError::InvalidConfig("DEM filename must not be empty".to_string()));
        }
        check_comment(self.comment, ",")?;
        check_comment(self.comment, &self.dem_sep)?;
        for horizon in &self.horizons {
            check_comment(horizon.comment, &horizon.sep)?;
        }
        self.encoding.validate(self.horizons.len())
    }

    /// Reads a JSON file containing the configuration
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
        let config: MapperConfig = serde_json::from_reader(reader).map_err(|source| MapperError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Writes a JSON file with the configuration
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), MapperError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
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
        })?;
        Ok(())
    }
}

/// Checks that the comment indicator is usable with the separator
///
/// Also checks the separator itself; see [Delimiter::from_sep].
fn check_comment(comment: char, sep: &str) -> Result<(), MapperError> {
    let delimiter = Delimiter::from_sep(sep)?;
    if comment.is_whitespace() || delimiter == Delimiter::Char(comment) {
        return Err(MapperError::InvalidConfig(format!(
            "comment indicator `{}` conflicts with the separator `{}`",
            comment, sep
        )));
    }
    Ok(())
}

impl fmt::Display for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n")?;
        write!(f, "==================\n")?;
        write!(f, "input_dir = {:?}\n", self.input_dir)?;
        write!(f, "dem = {:?}\n", self.dem)?;
        write!(f, "layer_table = {:?}\n", self.layer_table)?;
        write!(f, "output_dir = {:?}\n", self.output_dir)?;
        write!(f, "encoding = {:?}\n", self.encoding)?;
        write!(f, "top_update = {:?}\n", self.top_update)?;
        write!(f, "reset_origin = {:?}\n", self.reset_origin)?;

        write!(f, "\nHorizons\n")?;
        write!(f, "========\n")?;
        for (i, horizon) in self.horizons.iter().enumerate() {
            write!(f, "{} → {:?} (sep = {:?})\n", i, horizon.file, horizon.sep)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::MapperConfig;
    use crate::base::{IdEncoding, MapperError, TopUpdate};
    use crate::mapper::Faceset;
    use std::ffi::OsStr;
    use tempfile::tempdir;

    #[test]
    fn new_works() -> Result<(), MapperError> {
        let mut config = MapperConfig::new();
        config
            .set_input_dir("../input")?
            .set_dem("dem.asc", " ")?
            .add_horizon("bottom_sh.asc", " ", '#')?
            .add_horizon("horizon_21.csv", ",", '#')?
            .set_output_dir("/tmp/map2mesh/results")?
            .set_top_update(TopUpdate::LayerBottom)?
            .set_encoding(IdEncoding {
                above_all: 100,
                no_data: -9999,
            })?;

        assert_eq!(config.input_path("dem.asc").as_os_str(), OsStr::new("../input/dem.asc"));
        config.validate()?;

        assert_eq!(
            format!("{}", config),
            "Configuration data\n\
             ==================\n\
             input_dir = \"../input\"\n\
             dem = \"dem.asc\"\n\
             layer_table = \"layer-thickness.dat\"\n\
             output_dir = \"/tmp/map2mesh/results\"\n\
             encoding = IdEncoding { above_all: 100, no_data: -9999 }\n\
             top_update = LayerBottom\n\
             reset_origin = false\n\
             \n\
             Horizons\n\
             ========\n\
             0 → \"bottom_sh.asc\" (sep = \" \")\n\
             1 → \"horizon_21.csv\" (sep = \",\")\n"
        );
        Ok(())
    }

    #[test]
    fn catch_some_errors() -> Result<(), MapperError> {
        let mut config = MapperConfig::new();
        assert!(config.validate().is_err()); // missing DEM
        assert!(config.set_dem("", " ").is_err());
        assert!(config.set_dem("dem.asc", ";;").is_err());
        assert!(config.set_output_dir("").is_err());
        assert!(config.set_comment(',').is_err());
        assert!(config.add_horizon("h.asc", "ab", '#').is_err());
        assert!(config.add_horizon("h.asc", " ", ' ').is_err());
        assert!(config.add_horizon("h.asc", " ", '\t').is_err());
        assert_eq!(
            format!("{}", config.add_horizon("h.csv", ";", ';').err().unwrap()),
            "invalid configuration: comment indicator `;` conflicts with the separator `;`"
        );
        assert!(config.horizons.is_empty());
        config.add_horizon("h.csv", ";", '%')?;
        config.horizons.clear();
        config.add_horizon("h.asc", " ", '#')?;
        assert_eq!(
            format!(
                "{}",
                config
                    .set_encoding(IdEncoding {
                        above_all: 1,
                        no_data: -9999
                    })
                    .err()
                    .unwrap()
            ),
            "invalid configuration: the above-all code 1 collides with the ids of 1 horizons"
        );
        let sidesets = Faceset::Sidesets {
            name: "north".to_string(),
            points: vec![[1325.0, 4395.0]],
            top_layer: true,
        };
        assert!(config.add_faceset(sidesets).is_err());
        Ok(())
    }

    #[test]
    fn validate_checks_horizon_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comment.json");
        let json = r#"{ "dem": "dem.asc", "horizons": [ { "file": "h1.csv", "sep": ",", "comment": "," } ] }"#;
        std::fs::write(&path, json).unwrap();
        let err = MapperConfig::read_json(&path).err().unwrap();
        assert!(matches!(err, MapperError::InvalidConfig(..)));
    }

    #[test]
    fn read_and_write_json_work() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = MapperConfig::new();
        config
            .set_dem("dem.asc", " ")?
            .add_horizon("bottom_sh.asc", " ", '#')?
            .add_faceset(Faceset::Basic {
                top: true,
                bottom: true,
                sides: false,
            })?;
        config.write_json(&path)?;
        let read = MapperConfig::read_json(&path)?;
        assert_eq!(read.dem, "dem.asc");
        assert_eq!(read.horizons, config.horizons);
        assert_eq!(read.facesets, config.facesets);
        assert_eq!(read.encoding, IdEncoding::default());
        Ok(())
    }

    #[test]
    fn read_json_fills_defaults() -> Result<(), MapperError> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.json");
        std::fs::write(&path, r#"{ "dem": "dem.asc", "horizons": [ { "file": "h1.asc" } ] }"#).unwrap();
        let config = MapperConfig::read_json(&path)?;
        assert_eq!(config.input_dir, "input");
        assert_eq!(config.layer_table, "layer-thickness.dat");
        assert_eq!(config.horizons[0].sep, " ");
        assert_eq!(config.horizons[0].comment, '#');
        assert_eq!(config.top_update, TopUpdate::Midpoint);
        assert!(config.verbose);
        Ok(())
    }
}
