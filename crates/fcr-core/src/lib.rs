pub mod config;
pub mod error;
pub mod output;
pub mod paths;

pub use error::{FcrError, FcrResult};
