use super::{Horizon, LayerTable, RasterStore};
use crate::base::{CellClass, Grid, MapperError, TopUpdate};
use rayon::prelude::*;

/// Holds the classification of one layer
///
/// All grids have the dimensions of the DEM.
#[derive(Clone, Debug)]
pub struct LayerClassification {
    /// Index of the layer in the layer table (0 is the topmost)
    ///
    /// **(readonly)**
    pub index: usize,

    /// Material id of the layer
    ///
    /// **(readonly)**
    pub material_id: i64,

    /// Thickness of the layer
    ///
    /// **(readonly)**
    pub thickness: f64,

    /// Top surface used to compute the target surface (the DEM for the first layer)
    ///
    /// **(readonly)**
    pub top: Grid<f64>,

    /// Elevation at the middle of the layer: `top - thickness / 2`
    ///
    /// **(readonly)**
    pub target: Grid<f64>,

    /// Class of each cell
    ///
    /// **(readonly)**
    pub classes: Grid<CellClass>,

    /// Number of cells left as [CellClass::NoData]
    ///
    /// **(readonly)**
    pub n_unclassified: usize,
}

/// Classifies the layers of the mesh against the geological horizons
///
/// # Notes
///
/// * The layers are processed from the top (first table entry) downwards
/// * The top surface of the first layer is the DEM; the top surface of layer `k + 1`
///   is obtained from the target surface of layer `k` according to [TopUpdate]
/// * The cells of a layer are independent and are classified in parallel (row-wise)
pub struct HorizonClassifier<'a> {
    dem: &'a Grid<f64>,
    horizons: &'a [Horizon],
    top_update: TopUpdate,
}

impl<'a> HorizonClassifier<'a> {
    /// Allocates a new instance
    ///
    /// Returns [MapperError::NoHorizons] if the store has no horizons.
    pub fn new(store: &'a RasterStore) -> Result<Self, MapperError> {
        if store.n_horizon() == 0 {
            return Err(MapperError::NoHorizons);
        }
        Ok(HorizonClassifier {
            dem: store.dem(),
            horizons: store.horizons(),
            top_update: TopUpdate::default(),
        })
    }

    /// Sets the rule to obtain the top surface of the next layer
    pub fn set_top_update(&mut self, option: TopUpdate) -> &mut Self {
        self.top_update = option;
        self
    }

    /// Classifies all layers of the table
    pub fn run(&self, table: &LayerTable) -> Vec<LayerClassification> {
        let start = (self.dem.clone(), Vec::with_capacity(table.len()));
        let (_, results) = table
            .entries()
            .iter()
            .enumerate()
            .fold(start, |(top, mut done), (index, entry)| {
                let layer = self.classify_layer(index, entry.material_id, entry.thickness, top);
                let next_top = self.top_update.next_top(&layer.target, entry.thickness);
                done.push(layer);
                (next_top, done)
            });
        results
    }

    /// Classifies all layers and calls `on_layer` as soon as each layer is done
    ///
    /// The first error returned by `on_layer` stops the loop.
    pub fn run_with<F>(&self, table: &LayerTable, mut on_layer: F) -> Result<Vec<LayerClassification>, MapperError>
    where
        F: FnMut(&LayerClassification) -> Result<(), MapperError>,
    {
        let start = (self.dem.clone(), Vec::with_capacity(table.len()));
        let (_, results) = table
            .entries()
            .iter()
            .enumerate()
            .try_fold(start, |(top, mut done), (index, entry)| {
                let layer = self.classify_layer(index, entry.material_id, entry.thickness, top);
                on_layer(&layer)?;
                let next_top = self.top_update.next_top(&layer.target, entry.thickness);
                done.push(layer);
                Ok::<_, MapperError>((next_top, done))
            })?;
        Ok(results)
    }

    /// Classifies a single layer given its top surface
    pub fn classify_layer(&self, index: usize, material_id: i64, thickness: f64, top: Grid<f64>) -> LayerClassification {
        let target = top.map(|z| z - 0.5 * thickness);
        let ncol = target.ncol();
        let mut data = vec![CellClass::NoData; target.as_slice().len()];
        data.par_chunks_mut(ncol.max(1)).enumerate().for_each(|(i, row)| {
            for (j, class) in row.iter_mut().enumerate() {
                let values = self.horizons.iter().map(|h| h.grid.get(i, j));
                *class = classify_cell(target.get(i, j), values);
            }
        });
        let n_unclassified = data.iter().filter(|c| !c.is_classified()).count();
        log::debug!(
            "layer {}: material {}, thickness {}, {} unclassified cells",
            index,
            material_id,
            thickness,
            n_unclassified
        );
        let classes = Grid::with_data_like(&target, data);
        LayerClassification {
            index,
            material_id,
            thickness,
            top,
            target,
            classes,
            n_unclassified,
        }
    }
}

/// Classifies a single cell
///
/// # Input
///
/// * `z` -- the elevation of the target surface at the cell
/// * `horizon_values` -- the elevations of the horizons at the cell, in traversal order
///
/// # Rules
///
/// 1. `z > h[0]` gives [CellClass::AboveAll]
/// 2. otherwise, `z ≤ 0` gives [CellClass::NoData]
/// 3. otherwise, the nearest horizon at or above `z` wins ("from above");
///    if none exists, the nearest horizon below `z` wins ("from below");
///    ties keep the lowest index
/// 4. a NaN elevation never takes part in a comparison; a cell without any
///    candidate is [CellClass::NoData]
pub fn classify_cell<I>(z: f64, horizon_values: I) -> CellClass
where
    I: IntoIterator<Item = f64>,
{
    let mut values = horizon_values.into_iter().enumerate().peekable();
    let first = match values.peek() {
        Some((_, h)) => *h,
        None => return CellClass::NoData,
    };
    if z > first {
        return CellClass::AboveAll;
    }
    if z <= 0.0 {
        return CellClass::NoData;
    }
    let mut above: Option<(usize, f64)> = None;
    let mut below: Option<(usize, f64)> = None;
    for (index, h) in values {
        let delta = h - z;
        if delta >= 0.0 {
            if above.map_or(true, |(_, best)| delta < best) {
                above = Some((index, delta));
            }
        } else if delta < 0.0 {
            let distance = -delta;
            if below.map_or(true, |(_, best)| distance < best) {
                below = Some((index, distance));
            }
        }
    }
    match above.or(below) {
        Some((index, _)) => CellClass::Horizon(index),
        None => CellClass::NoData,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
