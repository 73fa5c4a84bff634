//! Implements the base structures: grids, text parsing, configuration, and errors

mod config;
mod constants;
mod enums;
mod error;
mod filepath;
mod grid;
mod id_encoding;
mod text_rows;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::error::*;
pub use crate::base::filepath::*;
pub use crate::base::grid::*;
pub use crate::base::id_encoding::*;
pub use crate::base::text_rows::*;
