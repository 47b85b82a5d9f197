mod config;
pub mod exchange;
mod geo;
pub mod plan;
mod routingparameters;

pub use config::*;
pub use geo::*;
pub use routingparameters::*;
