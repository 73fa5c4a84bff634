//! Contains some utility functions

mod plot_profile;
pub use plot_profile::*;
