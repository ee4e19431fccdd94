//! Core types for the location subsystem.

use std::fmt;
use thiserror::Error;

/// A point on the globe, latitude first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside lat -90..90 / lon -180..180.
    pub fn new(lat: f64, lon: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(LocationError::InvalidResponse(format!(
                "coordinate out of range: {}, {}",
                lat, lon
            )));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Resolved coordinates in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateSet {
    points: Vec<Coordinate>,
}

impl CoordinateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, coordinate: Coordinate) {
        self.points.push(coordinate);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of latitudes and longitudes. `None` when empty.
    pub fn mean(&self) -> Option<Coordinate> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (lat_sum, lon_sum) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(la, lo), c| (la + c.lat, lo + c.lon));
        // the mean of in-range values stays in range
        Some(Coordinate {
            lat: lat_sum / n,
            lon: lon_sum / n,
        })
    }
}

impl FromIterator<Coordinate> for CoordinateSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CoordinateSet {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Which provider produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Database,
    Remote,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "local database"),
            Self::Remote => write!(f, "remote lookup"),
        }
    }
}

/// Outcome of resolving a single address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Found {
        coordinate: Coordinate,
        source: LocationSource,
    },
    NotFound,
}

/// Provider failures. These never abort a run; the resolver turns them
/// into [`Resolution::NotFound`] or a fallback attempt.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("database error: {0}")]
    Database(#[from] maxminddb::MaxMindDbError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_coordinate_range_checked() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_mean_of_two_points() {
        let set: CoordinateSet = [(0.0, 0.0), (10.0, 10.0)]
            .iter()
            .map(|&(la, lo)| Coordinate::new(la, lo).unwrap())
            .collect();
        let mean = set.mean().unwrap();
        assert_abs_diff_eq!(mean.lat(), 5.0);
        assert_abs_diff_eq!(mean.lon(), 5.0);
    }

    #[test]
    fn test_mean_of_empty_set() {
        assert!(CoordinateSet::new().mean().is_none());
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut set = CoordinateSet::new();
        set.push(Coordinate::new(1.0, 2.0).unwrap());
        set.push(Coordinate::new(3.0, 4.0).unwrap());
        let lats: Vec<f64> = set.iter().map(|c| c.lat()).collect();
        assert_eq!(lats, vec![1.0, 3.0]);
    }
}
