use crate::error::{ProcessingError, Result};
use crate::models::RawPoint;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, TRACKPOINT_MARKER};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?[0-9]*\.?[0-9]+").expect("number pattern is valid"))
}

/// Line-oriented GPX scanner.
///
/// No XML parsing happens here: each physical line holding a `<trkpt` marker is
/// assumed to carry one trackpoint, and its first two signed decimals are taken
/// as latitude and longitude.
pub struct TrackReader {
    buffer_size: usize,
}

impl TrackReader {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self { buffer_size }
    }

    /// Stream the trackpoints of a file, one line at a time
    pub fn stream_trackpoints<'a>(&self, path: &'a Path) -> Result<TrackPointIterator<'a, File>> {
        let file = File::open(path).map_err(|source| ProcessingError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(TrackPointIterator::new(
            BufReader::with_capacity(self.buffer_size, file),
            path,
        ))
    }

    /// Stream trackpoints from any reader; `path` is only used in error messages
    pub fn stream_from_reader<'a, R: Read>(
        &self,
        reader: R,
        path: &'a Path,
    ) -> TrackPointIterator<'a, R> {
        TrackPointIterator::new(BufReader::with_capacity(self.buffer_size, reader), path)
    }

    /// Scan a single line. `Ok(None)` for lines without a trackpoint marker,
    /// `Err` with a description when a trackpoint line has fewer than two numbers.
    pub fn parse_trackpoint_line(line: &str) -> std::result::Result<Option<RawPoint>, String> {
        if !line.contains(TRACKPOINT_MARKER) {
            return Ok(None);
        }

        let mut numbers = number_pattern().find_iter(line).map(|m| m.as_str());
        match (numbers.next(), numbers.next()) {
            (Some(latitude), Some(longitude)) => Ok(Some(RawPoint::new(latitude, longitude))),
            _ => Err(format!(
                "expected latitude and longitude in '{}'",
                line.trim()
            )),
        }
    }
}

impl Default for TrackReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-pass iterator over the trackpoints of one file
pub struct TrackPointIterator<'a, R> {
    reader: BufReader<R>,
    line: String,
    line_count: usize,
    path: &'a Path,
}

impl<'a, R: Read> TrackPointIterator<'a, R> {
    fn new(reader: BufReader<R>, path: &'a Path) -> Self {
        Self {
            reader,
            line: String::new(),
            line_count: 0,
            path,
        }
    }

    pub fn path(&self) -> &Path {
        self.path
    }
}

impl<R: Read> Iterator for TrackPointIterator<'_, R> {
    type Item = Result<RawPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();

            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_count += 1;

                    match TrackReader::parse_trackpoint_line(&self.line) {
                        Ok(Some(point)) => return Some(Ok(point.at_line(self.line_count))),
                        Ok(None) => continue,
                        Err(message) => {
                            return Some(Err(ProcessingError::Parse {
                                path: self.path.to_path_buf(),
                                line: self.line_count,
                                message,
                            }))
                        }
                    }
                }
                Err(source) => {
                    return Some(Err(ProcessingError::Input {
                        path: self.path.to_path_buf(),
                        source,
                    }))
                }
            }
        }
    }
}
