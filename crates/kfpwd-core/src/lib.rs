//! kfpwd core - shared functionality for the kfpwd credential helper
//!
//! Standard locations, the optional config file, and output formatting.

pub mod config;
pub mod format;
pub mod paths;

pub use config::Config;
pub use paths::Paths;
