use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Web Mercator projection constants
pub(crate) const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude, longitude and an optional altitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, alt: None }
    }

    /// Creates a coordinate, rejecting non-finite components
    pub fn try_new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(MapError::InvalidCoordinates(format!("({}, {})", lat, lng)).into());
        }
        Ok(Self::new(lat, lng))
    }

    /// Attaches an altitude to the coordinate
    pub fn with_alt(mut self, alt: f64) -> Self {
        self.alt = Some(alt);
        self
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Conversion of heterogeneous coordinate inputs into a canonical [`LatLng`].
///
/// Accepts coordinates, `(lat, lng)` tuples, `[lat, lng]` / `[lat, lng, alt]`
/// arrays and slices, and JSON values shaped as `{"lat", "lng"}`,
/// `{"lat", "lon"}` or `[lat, lng(, alt)]`.
pub trait IntoLatLng {
    fn into_lat_lng(self) -> Result<LatLng>;
}

impl IntoLatLng for LatLng {
    fn into_lat_lng(self) -> Result<LatLng> {
        let lat_lng = LatLng::try_new(self.lat, self.lng)?;
        Ok(LatLng { alt: self.alt, ..lat_lng })
    }
}

impl IntoLatLng for (f64, f64) {
    fn into_lat_lng(self) -> Result<LatLng> {
        LatLng::try_new(self.0, self.1)
    }
}

impl IntoLatLng for [f64; 2] {
    fn into_lat_lng(self) -> Result<LatLng> {
        LatLng::try_new(self[0], self[1])
    }
}

impl IntoLatLng for [f64; 3] {
    fn into_lat_lng(self) -> Result<LatLng> {
        Ok(LatLng::try_new(self[0], self[1])?.with_alt(self[2]))
    }
}

impl IntoLatLng for &[f64] {
    fn into_lat_lng(self) -> Result<LatLng> {
        match *self {
            [lat, lng] => LatLng::try_new(lat, lng),
            [lat, lng, alt] => Ok(LatLng::try_new(lat, lng)?.with_alt(alt)),
            _ => Err(MapError::InvalidCoordinates(format!(
                "expected 2 or 3 components, got {}",
                self.len()
            ))
            .into()),
        }
    }
}

impl IntoLatLng for &serde_json::Value {
    fn into_lat_lng(self) -> Result<LatLng> {
        use serde_json::Value;

        let number = |value: Option<&Value>, field: &str| -> Result<f64> {
            value.and_then(Value::as_f64).ok_or_else(|| {
                MapError::InvalidCoordinates(format!("missing or non-numeric '{}' in {}", field, self))
                    .into()
            })
        };

        match self {
            Value::Array(items) => {
                let components = items
                    .iter()
                    .map(|item| number(Some(item), "component"))
                    .collect::<Result<Vec<f64>>>()?;
                components.as_slice().into_lat_lng()
            }
            Value::Object(map) => {
                let lat = number(map.get("lat"), "lat")?;
                let lng = number(map.get("lng").or_else(|| map.get("lon")), "lng")?;
                let lat_lng = LatLng::try_new(lat, lng)?;
                match map.get("alt") {
                    Some(alt) => Ok(lat_lng.with_alt(number(Some(alt), "alt")?)),
                    None => Ok(lat_lng),
                }
            }
            other => Err(MapError::InvalidCoordinates(other.to_string()).into()),
        }
    }
}

impl IntoLatLng for serde_json::Value {
    fn into_lat_lng(self) -> Result<LatLng> {
        (&self).into_lat_lng()
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
