use crate::error::{ProcessingError, Result};
use crate::models::{GeoPoint, HeatmapData};
use crate::processors::Grid;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const COLLECTION_HEADER: &[u8] = br#"{"type":"FeatureCollection","features":["#;
const COLLECTION_FOOTER: &[u8] = b"\n]}\n";

/// One MultiPoint feature: every location sharing a visit count.
#[derive(Debug, Clone, Copy)]
pub struct HeatmapFeature<'a> {
    pub count: u32,
    pub points: &'a [GeoPoint],
}

#[derive(Serialize)]
struct FeatureProperties {
    count: u32,
}

/// Incremental writer for a GeoJSON FeatureCollection.
///
/// `begin` writes the collection header, `write_feature` appends one feature,
/// `end` closes the collection and flushes. Features must arrive with strictly
/// increasing counts. Coordinates are written `[longitude, latitude]`.
pub struct FeatureStream<W: Write> {
    out: W,
    precision: usize,
    features_written: usize,
    last_count: Option<u32>,
}

impl<W: Write> FeatureStream<W> {
    pub fn begin(mut out: W, precision: usize) -> Result<Self> {
        out.write_all(COLLECTION_HEADER)?;
        Ok(Self {
            out,
            precision,
            features_written: 0,
            last_count: None,
        })
    }

    pub fn write_feature(&mut self, feature: &HeatmapFeature<'_>) -> Result<()> {
        if let Some(last) = self.last_count {
            if feature.count <= last {
                return Err(ProcessingError::InvalidFormat(format!(
                    "feature with count {} written after count {}",
                    feature.count, last
                )));
            }
        }

        let separator: &[u8] = if self.features_written == 0 { b"\n" } else { b",\n" };
        self.out.write_all(separator)?;
        self.out.write_all(br#"{"type":"Feature","properties":"#)?;
        serde_json::to_writer(
            &mut self.out,
            &FeatureProperties {
                count: feature.count,
            },
        )
        .map_err(std::io::Error::from)?;
        self.out
            .write_all(br#","geometry":{"type":"MultiPoint","coordinates":["#)?;

        let p = self.precision;
        for (i, point) in feature.points.iter().enumerate() {
            if i > 0 {
                self.out.write_all(b",")?;
            }
            write!(self.out, "[{:.*},{:.*}]", p, point.longitude, p, point.latitude)?;
        }

        self.out.write_all(b"]}}")?;
        self.features_written += 1;
        self.last_count = Some(feature.count);
        Ok(())
    }

    pub fn features_written(&self) -> usize {
        self.features_written
    }

    /// Close the collection and hand back the flushed writer
    pub fn end(mut self) -> Result<W> {
        self.out.write_all(COLLECTION_FOOTER)?;
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Writes a finished heatmap as one feature per distinct count, ascending.
pub struct GeoJsonWriter {
    precision: usize,
}

impl GeoJsonWriter {
    pub fn new(grid: &Grid) -> Self {
        Self {
            precision: grid.precision(),
        }
    }

    pub fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    /// Stream the heatmap into `out`; returns the writer and the feature count
    pub fn write_to<W: Write>(&self, heatmap: &HeatmapData, out: W) -> Result<(W, usize)> {
        let mut stream = FeatureStream::begin(out, self.precision)?;

        for (count, points) in &heatmap.group_by_count() {
            stream.write_feature(&HeatmapFeature {
                count: *count,
                points,
            })?;
        }

        let features = stream.features_written();
        Ok((stream.end()?, features))
    }

    /// Write the heatmap to `path`.
    ///
    /// The document goes to a temporary file next to `path` first and is
    /// renamed into place only once complete, so a failed run never leaves a
    /// truncated document at `path`.
    pub fn write_heatmap(&self, heatmap: &HeatmapData, path: &Path) -> Result<usize> {
        let output_error = |source: std::io::Error| ProcessingError::Output {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let temp = NamedTempFile::new_in(dir).map_err(output_error)?;
        set_output_permissions(&temp).map_err(output_error)?;

        let (out, features) = self
            .write_to(heatmap, BufWriter::new(temp))
            .map_err(|err| match err {
                ProcessingError::Io(source) => output_error(source),
                other => other,
            })?;

        let temp = out
            .into_inner()
            .map_err(|err| output_error(err.into_error()))?;
        temp.persist(path).map_err(|err| output_error(err.error))?;

        debug!(path = %path.display(), features, "wrote geojson");
        Ok(features)
    }
}

// Temporary files are created owner-only; the heatmap is an ordinary output file
#[cfg(unix)]
fn set_output_permissions(temp: &NamedTempFile) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    temp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_output_permissions(_temp: &NamedTempFile) -> std::io::Result<()> {
    Ok(())
}
