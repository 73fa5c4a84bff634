use crate::base::{Delimiter, Grid, MapperError};
use std::path::Path;

/// Holds the elevation of a geological boundary surface
#[derive(Clone, Debug)]
pub struct Horizon {
    /// Name of the horizon (usually the file it was read from)
    pub name: String,

    /// Elevation at every cell of the DEM grid
    pub grid: Grid<f64>,
}

/// Holds the DEM and the ordered horizons
///
/// # Notes
///
/// * Every horizon has the same dimensions as the DEM; this is checked when the horizon is added
/// * The order of the horizons is the order of the calls to `add_horizon`/`push_horizon`
/// * The grids are not modified after loading (except for [RasterStore::reset_origin])
pub struct RasterStore {
    dem: Grid<f64>,
    horizons: Vec<Horizon>,
}

impl RasterStore {
    /// Allocates a new instance with the given DEM and no horizons
    pub fn new(dem: Grid<f64>) -> Self {
        RasterStore {
            dem,
            horizons: Vec::new(),
        }
    }

    /// Reads the DEM and allocates a new instance
    pub fn read<P>(dem_path: &P, delimiter: Delimiter, comment: char) -> Result<Self, MapperError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let dem = Grid::read(dem_path, delimiter, comment)?;
        Ok(RasterStore::new(dem))
    }

    /// Reads a horizon raster and appends it to the list of horizons
    ///
    /// Returns a [MapperError::ShapeMismatch] if the dimensions differ from those of the DEM.
    pub fn add_horizon<P>(&mut self, path: &P, delimiter: Delimiter, comment: char) -> Result<&mut Self, MapperError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = path.as_ref();
        let grid = Grid::read(path, delimiter, comment)?;
        validate_shape(&grid, &self.dem, path)?;
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => path.to_string_lossy().to_string(),
        };
        self.horizons.push(Horizon { name, grid });
        Ok(self)
    }

    /// Appends an in-memory horizon
    pub fn push_horizon(&mut self, name: &str, grid: Grid<f64>) -> Result<&mut Self, MapperError> {
        validate_shape(&grid, &self.dem, Path::new(name))?;
        self.horizons.push(Horizon {
            name: name.to_string(),
            grid,
        });
        Ok(self)
    }

    /// Moves the lower-left corner of the DEM to (0, 0)
    pub fn reset_origin(&mut self) -> &mut Self {
        self.dem.reset_origin();
        self
    }

    /// Returns the DEM
    pub fn dem(&self) -> &Grid<f64> {
        &self.dem
    }

    /// Returns the horizons in traversal order
    pub fn horizons(&self) -> &[Horizon] {
        &self.horizons
    }

    /// Returns the number of horizons
    pub fn n_horizon(&self) -> usize {
        self.horizons.len()
    }
}

/// Checks that a grid has the same dimensions as the reference grid (the DEM)
///
/// # Input
///
/// * `grid` -- the grid being checked
/// * `reference` -- the DEM
/// * `path` -- the file (or name) of the grid; used in the error message
pub fn validate_shape<T, U>(grid: &Grid<T>, reference: &Grid<U>, path: &Path) -> Result<(), MapperError>
where
    T: Copy,
    U: Copy,
{
    if grid.dims() != reference.dims() {
        return Err(MapperError::ShapeMismatch {
            path: path.to_path_buf(),
            expected: reference.dims(),
            actual: grid.dims(),
        });
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
