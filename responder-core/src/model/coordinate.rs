//! WGS84 coordinates

use geo::{Bearing, Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::{Error, Meters};

/// Mean earth radius in meters, matching [`Haversine`]
const EARTH_RADIUS: Meters = 6_371_008.8;

/// Latitude/longitude pair in decimal degrees.
///
/// Values coming from the outside should go through [`Coordinate::new`] or
/// [`Coordinate::validate`] before they reach the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting values outside the WGS84 range
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for non-finite or out of range values
    pub fn new(lat: f64, lon: f64) -> Result<Self, Error> {
        let coordinate = Self { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Checks the `-90..=90` / `-180..=180` invariant
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] when the invariant does not hold
    pub fn validate(&self) -> Result<(), Error> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lon_ok = self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    /// Great circle distance in meters
    pub fn distance_to(&self, other: &Coordinate) -> Meters {
        Haversine.distance(self.to_point(), other.to_point())
    }

    /// Initial bearing towards `other` in degrees, `0..360` clockwise from north
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        Haversine
            .bearing(self.to_point(), other.to_point())
            .rem_euclid(360.0)
    }

    /// Earth-centered cartesian position in meters.
    ///
    /// Straight-line distance between two of these grows with the great
    /// circle distance, so nearest neighbours agree with [`Coordinate::distance_to`].
    pub fn to_cartesian(&self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [
            EARTH_RADIUS * lat.cos() * lon.sin(),
            EARTH_RADIUS * lat.cos() * lon.cos(),
            EARTH_RADIUS * lat.sin(),
        ]
    }

    /// Point with `x = lon`, `y = lat`
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_point()
    }
}
