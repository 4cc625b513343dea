pub mod azure;
pub mod cli;
pub mod config;
pub mod error;
pub mod heat;
pub mod model;
pub mod render;

pub use config::{Config, Scale};
pub use error::{HeatmapError, Result};
