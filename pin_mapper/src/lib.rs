#![warn(clippy::all, rust_2018_idioms)]

pub mod comet;
pub mod comet_dcb;
pub mod comet_path_finder;
pub mod config;

pub use config::MappingConfig;
