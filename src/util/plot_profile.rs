use crate::base::{Grid, MapperError};
use crate::geology::{LayerClassification, RasterStore};
use plotpy::{Curve, Plot};
use std::path::Path;

/// Returns the x-coordinates of the cell centers along a row
///
/// The column index is used if the grid has no georeference.
pub fn profile_coords(grid: &Grid<f64>) -> Vec<f64> {
    let (x0, dx) = match grid.header() {
        Some(h) => (h.xll_corner, h.cellsize),
        None => (0.0, 1.0),
    };
    (0..grid.ncol()).map(|j| x0 + (j as f64 + 0.5) * dx).collect()
}

/// Returns the values of a row with invalid cells replaced by NaN (drawn as gaps)
pub fn profile_values(grid: &Grid<f64>, row: usize) -> Result<Vec<f64>, MapperError> {
    if row >= grid.nrow() {
        return Err(MapperError::InvalidData(format!(
            "row {} is out of range; the grid has {} rows",
            row,
            grid.nrow()
        )));
    }
    Ok(grid
        .row(row)
        .iter()
        .map(|v| if Grid::is_valid(*v) { *v } else { f64::NAN })
        .collect())
}

/// Draws the DEM, the horizons, and the target surfaces of the layers along a grid row
///
/// # Input
///
/// * `store` -- the DEM and the horizons
/// * `layers` -- the classified layers (may be empty)
/// * `row` -- the grid row of the cross-section
/// * `full_path` -- the output figure (e.g., an SVG file)
pub fn plot_profile<P>(
    store: &RasterStore,
    layers: &[LayerClassification],
    row: usize,
    full_path: &P,
) -> Result<(), MapperError>
where
    P: AsRef<Path> + ?Sized,
{
    let xx = profile_coords(store.dem());

    let mut plot = Plot::new();
    let mut dem = Curve::new();
    dem.set_label("DEM")
        .set_line_color("black")
        .set_line_width(2.0)
        .draw(&xx, &profile_values(store.dem(), row)?);
    plot.add(&dem);

    for horizon in store.horizons() {
        let mut curve = Curve::new();
        curve.set_label(&horizon.name).draw(&xx, &profile_values(&horizon.grid, row)?);
        plot.add(&curve);
    }

    for layer in layers {
        let mut curve = Curve::new();
        curve
            .set_line_style("--")
            .set_line_color("#7f7f7f")
            .draw(&xx, &profile_values(&layer.target, row)?);
        plot.add(&curve);
    }

    plot.grid_labels_legend("$x$", "elevation $z$")
        .set_figure_size_points(600.0, 400.0)
        .save(full_path.as_ref())
        .map_err(|e| MapperError::Plot(e.to_string()))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
