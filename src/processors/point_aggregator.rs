use crate::error::{ProcessingError, Result};
use crate::models::{GeoPoint, HeatmapConfig, HeatmapData, RawPoint};
use crate::processors::binning::Grid;
use crate::readers::TrackReader;
use crate::utils::coordinates::great_circle_distance;
use std::path::Path;
use tracing::{debug, warn};

/// Folds trackpoint streams into a [`HeatmapData`].
///
/// Each file is decimated on its own: a point is kept only if it lands in a
/// different bin than the last kept point and at least `skip_distance` meters
/// away from it. Kept points bump a counter that saturates at `max_val`.
pub struct PointAggregator {
    grid: Grid,
    skip_distance: f64,
    max_val: u32,
    skip_malformed: bool,
}

impl PointAggregator {
    pub fn new(config: &HeatmapConfig) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(config.bin_size)?,
            skip_distance: config.skip_distance,
            max_val: config.max_val,
            skip_malformed: config.skip_malformed,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read one track file into `heatmap`. Returns the number of trackpoints read.
    pub fn accept_file(
        &self,
        reader: &TrackReader,
        path: &Path,
        heatmap: &mut HeatmapData,
    ) -> Result<u64> {
        let points = reader.stream_trackpoints(path)?;
        let read = self.accept_points(path, points, heatmap)?;
        debug!(path = %path.display(), trackpoints = read, locations = heatmap.len(), "accepted file");
        Ok(read)
    }

    /// Fold one file's trackpoint sequence into `heatmap`.
    ///
    /// Returns how many trackpoints were read, including those dropped by
    /// decimation. The first malformed point aborts unless the aggregator was
    /// configured to skip malformed points.
    pub fn accept_points<I>(&self, path: &Path, points: I, heatmap: &mut HeatmapData) -> Result<u64>
    where
        I: IntoIterator<Item = Result<RawPoint>>,
    {
        let mut last_point: Option<GeoPoint> = None;
        let mut read = 0u64;

        for raw in points {
            let point = match raw.and_then(|raw| self.bin(path, &raw)) {
                Ok(point) => {
                    read += 1;
                    point
                }
                Err(err @ ProcessingError::Parse { .. }) if self.skip_malformed => {
                    read += 1;
                    warn!("skipping trackpoint: {}", err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            if !self.is_far_enough(last_point, point) {
                continue;
            }

            last_point = Some(point);
            heatmap.increment(point, self.max_val);
        }

        Ok(read)
    }

    /// Parse and snap both coordinates of a raw point
    pub fn bin(&self, path: &Path, raw: &RawPoint) -> Result<GeoPoint> {
        let latitude = parse_coordinate(path, raw, &raw.latitude)?;
        let longitude = parse_coordinate(path, raw, &raw.longitude)?;
        Ok(self.grid.snap_point(latitude, longitude))
    }

    fn is_far_enough(&self, last_point: Option<GeoPoint>, point: GeoPoint) -> bool {
        match last_point {
            None => true,
            Some(last) if last == point => false,
            Some(last) => great_circle_distance(last, point) >= self.skip_distance,
        }
    }
}

fn parse_coordinate(path: &Path, raw: &RawPoint, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ProcessingError::Parse {
            path: path.to_path_buf(),
            line: raw.line,
            message: format!("invalid coordinate value '{}'", token),
        })
}
