//! Implements the mapping workflow and the hand-off to the meshing library

mod attribute_dump;
mod faceset;
mod mapper;
mod mesh_adapter;
pub use crate::mapper::attribute_dump::*;
pub use crate::mapper::faceset::*;
pub use crate::mapper::mapper::*;
pub use crate::mapper::mesh_adapter::*;
