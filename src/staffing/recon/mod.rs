pub mod aggregate;
pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod report;
pub mod sync;

pub use config::ReconConfig;
pub use error::{ReconError, Result};
