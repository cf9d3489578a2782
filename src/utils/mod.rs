pub mod constants;
pub mod coordinates;
pub mod progress;

pub use constants::*;
pub use coordinates::great_circle_distance;
pub use progress::ProgressReporter;
