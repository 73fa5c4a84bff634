use super::{CellClass, MapperError};
use serde::{Deserialize, Serialize};

/// Converts cell classes into the integers written to files and mesh attributes
///
/// Horizons are numbered from one, i.e., `Horizon(i)` becomes `i + 1`.
/// The two remaining classes use the codes below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdEncoding {
    /// Code of the cells above the first horizon (default = 0)
    pub above_all: i32,

    /// Code of the unclassified cells (default = -9999)
    pub no_data: i32,
}

impl Default for IdEncoding {
    fn default() -> Self {
        IdEncoding {
            above_all: 0,
            no_data: -9999,
        }
    }
}

impl IdEncoding {
    /// Checks that the codes cannot be confused with each other or with a horizon id
    pub fn validate(&self, n_horizon: usize) -> Result<(), MapperError> {
        if self.above_all == self.no_data {
            return Err(MapperError::InvalidConfig(format!(
                "the above-all and no-data codes must differ; both are {}",
                self.above_all
            )));
        }
        let is_horizon_id = |code: i32| code >= 1 && (code as i64) <= (n_horizon as i64);
        if is_horizon_id(self.above_all) {
            return Err(MapperError::InvalidConfig(format!(
                "the above-all code {} collides with the ids of {} horizons",
                self.above_all, n_horizon
            )));
        }
        if is_horizon_id(self.no_data) {
            return Err(MapperError::InvalidConfig(format!(
                "the no-data code {} collides with the ids of {} horizons",
                self.no_data, n_horizon
            )));
        }
        Ok(())
    }

    /// Returns the integer code of a class
    #[inline]
    pub fn encode(&self, class: CellClass) -> i32 {
        match class {
            CellClass::AboveAll => self.above_all,
            CellClass::Horizon(index) => index as i32 + 1,
            CellClass::NoData => self.no_data,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
