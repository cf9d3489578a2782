use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Latitude and longitude tokens exactly as scanned from a trackpoint line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPoint {
    pub latitude: String,
    pub longitude: String,
    /// 1-based line in the source file, 0 when not read from a file
    pub line: usize,
}

impl RawPoint {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            line: 0,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// A binned position. Equality and hashing compare bit patterns, which is
/// sound because every `GeoPoint` used as a key has already been snapped and
/// rounded by [`crate::processors::Grid`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: normalize_zero(latitude),
            longitude: normalize_zero(longitude),
        }
    }

    fn key(&self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

// -0.0 and 0.0 must land in the same bin
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for GeoPoint {}

impl Hash for GeoPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for GeoPoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GeoPoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.latitude
            .total_cmp(&other.latitude)
            .then(self.longitude.total_cmp(&other.longitude))
    }
}
