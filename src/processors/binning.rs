use crate::error::{ProcessingError, Result};
use crate::models::GeoPoint;
use crate::utils::constants::MAX_DECIMAL_PRECISION;

/// Decimal places needed to hold multiples of `bin_size` exactly:
/// `max(ceil(-log10(bin_size) + 1), 0)`.
pub fn decimal_precision(bin_size: f64) -> i32 {
    let places = (-bin_size.log10() + 1.0).ceil();
    if places > 0.0 {
        places as i32
    } else {
        0
    }
}

/// Snap `value` to the grid of `bin_size`. Convenience wrapper around
/// [`Grid`]; prefer building the grid once when binning many values.
pub fn binning(value: f64, bin_size: f64) -> Result<f64> {
    Ok(Grid::new(bin_size)?.snap(value))
}

/// A square lat/lon grid with its output precision derived once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    bin_size: f64,
    precision: usize,
    scale: f64,
}

impl Grid {
    pub fn new(bin_size: f64) -> Result<Self> {
        if !bin_size.is_finite() || bin_size <= 0.0 {
            return Err(ProcessingError::Config(format!(
                "bin size must be a positive number of degrees, got {}",
                bin_size
            )));
        }

        let precision = decimal_precision(bin_size);
        if precision > MAX_DECIMAL_PRECISION as i32 {
            return Err(ProcessingError::Config(format!(
                "bin size {} needs {} decimal places, at most {} are supported",
                bin_size, precision, MAX_DECIMAL_PRECISION
            )));
        }

        Ok(Self {
            bin_size,
            precision: precision as usize,
            scale: 10f64.powi(precision),
        })
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// Decimal places used for grid values and for output formatting
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Nearest multiple of the bin size, rounded to the grid precision.
    ///
    /// Ties go to the even multiple. The final rounding strips the noise left
    /// by the multiplication so that equal cells yield bit-identical values.
    pub fn snap(&self, value: f64) -> f64 {
        let snapped = (value / self.bin_size).round_ties_even() * self.bin_size;
        let rounded = (snapped * self.scale).round() / self.scale;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    pub fn snap_point(&self, latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(self.snap(latitude), self.snap(longitude))
    }

    /// True if `value` already lies on this grid
    pub fn contains(&self, value: f64) -> bool {
        self.snap(value).to_bits() == value.to_bits()
    }
}
