pub mod binning;
pub mod point_aggregator;

pub use binning::{binning, decimal_precision, Grid};
pub use point_aggregator::PointAggregator;
