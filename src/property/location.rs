//! Geographic coordinates of a property.

use super::error::PropertyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// A validated `(latitude, longitude)` pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "(f64, f64)", try_from = "(f64, f64)")]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// NaN fails both range checks.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PropertyError> {
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(PropertyError::Latitude(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(PropertyError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Accepts a two-element array whose items are numbers or numeric strings.
    /// Booleans are not numbers here: `[true, false]` is a type error.
    pub fn from_value(value: &Value) -> Result<Self, PropertyError> {
        let pair = match value {
            Value::Array(items) if items.len() == 2 => items,
            _ => return Err(PropertyError::LocationShape),
        };
        let lat = to_float(&pair[0]).ok_or(PropertyError::LocationNotNumeric)?;
        let lon = to_float(&pair[1]).ok_or(PropertyError::LocationNotNumeric)?;
        Self::new(lat, lon)
    }

    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
    pub fn as_tuple(&self) -> (f64, f64) { (self.latitude, self.longitude) }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl From<Location> for (f64, f64) {
    fn from(loc: Location) -> Self {
        loc.as_tuple()
    }
}

impl TryFrom<(f64, f64)> for Location {
    type Error = PropertyError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        Location::new(lat, lon)
    }
}
