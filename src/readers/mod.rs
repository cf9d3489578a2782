pub mod file_discovery;
pub mod track_reader;

pub use file_discovery::FileDiscovery;
pub use track_reader::{TrackPointIterator, TrackReader};
