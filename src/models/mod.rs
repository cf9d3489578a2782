pub mod heatmap;
pub mod point;
pub mod settings;

pub use heatmap::{CountGroups, HeatmapData, RunStatistics};
pub use point::{GeoPoint, RawPoint};
pub use settings::{ConfigOverrides, HeatmapConfig, InputSelection};
