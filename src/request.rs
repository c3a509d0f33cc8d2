//! Detection request and result types, plus the validation layer.
//!
//! A [`DetectionRequest`] can only be obtained through validation, so code
//! that holds one may rely on every field being present, finite and in range:
//!
//! | field         | domain          |
//! |---------------|-----------------|
//! | `lat`         | `[0, 90]`       |
//! | `lon`         | `[-180, 180]`   |
//! | `epoch`       | any finite      |
//! | `orientation` | `[-180, 180]`   |

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::InputError;

/// Unvalidated request fields, as they arrive from a transport.
///
/// Field names follow the JSON wire format (`lat`, `lon`, `epoch`,
/// `orientation`). Unknown fields are rejected.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDetectionRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub epoch: Option<f64>,
    pub orientation: Option<f64>,
}

impl RawDetectionRequest {
    /// Set a field from its textual form, e.g. `("lat", "49.27")`.
    ///
    /// Surrounding whitespace is ignored. A later value for the same field
    /// replaces an earlier one.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), InputError> {
        let (field, slot): (&'static str, &mut Option<f64>) = match key {
            "lat" => ("lat", &mut self.lat),
            "lon" => ("lon", &mut self.lon),
            "epoch" => ("epoch", &mut self.epoch),
            "orientation" => ("orientation", &mut self.orientation),
            other => return Err(InputError::UnknownField(other.to_string())),
        };

        let parsed = value
            .trim()
            .parse::<f64>()
            .map_err(|_| InputError::Malformed {
                field,
                value: value.to_string(),
            })?;
        *slot = Some(parsed);
        Ok(())
    }

    /// Parse a `key=value` pair, as in a form-encoded body.
    pub fn set_pair(&mut self, pair: &str) -> Result<(), InputError> {
        match pair.split_once('=') {
            Some((key, value)) => self.set(key.trim(), value),
            None => Err(InputError::UnknownField(pair.to_string())),
        }
    }

    /// Validate into a [`DetectionRequest`].
    ///
    /// Presence of every field is checked before any value is inspected, so a
    /// partial request always reports a missing field.
    pub fn validate(&self) -> Result<DetectionRequest, InputError> {
        let lat = self.lat.ok_or(InputError::MissingField("lat"))?;
        let lon = self.lon.ok_or(InputError::MissingField("lon"))?;
        let epoch = self.epoch.ok_or(InputError::MissingField("epoch"))?;
        let orientation = self
            .orientation
            .ok_or(InputError::MissingField("orientation"))?;

        DetectionRequest::new(lat, lon, epoch, orientation)
    }
}

/// A validated, immutable detection request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionRequest {
    latitude: f64,
    longitude: f64,
    epoch: f64,
    orientation: f64,
}

impl DetectionRequest {
    /// Build a request, enforcing finiteness and the range of every field.
    pub fn new(
        latitude: f64,
        longitude: f64,
        epoch: f64,
        orientation: f64,
    ) -> Result<Self, InputError> {
        check_finite("lat", latitude)?;
        check_finite("lon", longitude)?;
        check_finite("epoch", epoch)?;
        check_finite("orientation", orientation)?;

        check_range("lat", latitude, MINIMUM_LATITUDE, MAXIMUM_LATITUDE)?;
        check_range("lon", longitude, MINIMUM_LONGITUDE, MAXIMUM_LONGITUDE)?;
        check_range(
            "orientation",
            orientation,
            MINIMUM_ORIENTATION,
            MAXIMUM_ORIENTATION,
        )?;

        Ok(Self {
            latitude,
            longitude,
            epoch,
            orientation,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Unix timestamp in seconds, fractional part allowed.
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Direction of travel, signed degrees from true north.
    pub fn orientation(&self) -> f64 {
        self.orientation
    }
}

impl TryFrom<RawDetectionRequest> for DetectionRequest {
    type Error = InputError;

    fn try_from(raw: RawDetectionRequest) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

/// The verdict, serialized as `{"glare": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub glare: bool,
}

impl DetectionResult {
    pub fn to_json(&self) -> String {
        // A struct with a single bool field always serializes
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"glare\":{}}}", self.glare))
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { field, value })
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), InputError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;

    fn full_raw() -> RawDetectionRequest {
        RawDetectionRequest {
            lat: Some(TEST_VANCOUVER_LAT),
            lon: Some(TEST_VANCOUVER_LON),
            epoch: Some(TEST_CLEAR_EPOCH),
            orientation: Some(TEST_CLEAR_ORIENTATION),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = full_raw().validate().unwrap();
        assert_eq!(request.latitude(), TEST_VANCOUVER_LAT);
        assert_eq!(request.longitude(), TEST_VANCOUVER_LON);
        assert_eq!(request.epoch(), TEST_CLEAR_EPOCH);
        assert_eq!(request.orientation(), TEST_CLEAR_ORIENTATION);
    }

    #[test]
    fn test_missing_fields() {
        let mut raw = full_raw();
        raw.lon = None;
        assert_eq!(raw.validate(), Err(InputError::MissingField("lon")));

        // Missing field wins over an out-of-range one
        let raw = RawDetectionRequest {
            lat: Some(-5.0),
            lon: Some(10.0),
            epoch: None,
            orientation: None,
        };
        assert_eq!(raw.validate(), Err(InputError::MissingField("epoch")));
    }

    #[test]
    fn test_out_of_range() {
        let err = DetectionRequest::new(-1.1096235, -123.1, 0.0, -10.2).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "lat", .. }));

        let err = DetectionRequest::new(49.0, 480.206395, 0.0, -10.2).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "lon", .. }));

        let err = DetectionRequest::new(49.0, -123.1, 0.0, -190.5).unwrap_err();
        assert!(matches!(
            err,
            InputError::OutOfRange {
                field: "orientation",
                ..
            }
        ));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(DetectionRequest::new(0.0, -180.0, 0.0, -180.0).is_ok());
        assert!(DetectionRequest::new(90.0, 180.0, 0.0, 180.0).is_ok());
    }

    #[test]
    fn test_epoch_is_unbounded_but_finite() {
        assert!(DetectionRequest::new(10.0, 10.0, -1.0e9, 0.0).is_ok());
        assert!(DetectionRequest::new(10.0, 10.0, 4.0e10, 0.0).is_ok());
        assert!(matches!(
            DetectionRequest::new(10.0, 10.0, f64::NAN, 0.0),
            Err(InputError::NotFinite { field: "epoch", .. })
        ));
        assert!(matches!(
            DetectionRequest::new(10.0, 10.0, f64::INFINITY, 0.0),
            Err(InputError::NotFinite { field: "epoch", .. })
        ));
    }

    #[test]
    fn test_set_from_strings() {
        let mut raw = RawDetectionRequest::default();
        raw.set("lat", "49.2699648").unwrap();
        raw.set("lon", " -123.1290368 ").unwrap();
        raw.set_pair("epoch=1588704959.321").unwrap();
        raw.set_pair("orientation=-10.2").unwrap();
        assert_eq!(raw, full_raw());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut raw = RawDetectionRequest::default();
        assert_eq!(
            raw.set("lon", "negative 123"),
            Err(InputError::Malformed {
                field: "lon",
                value: "negative 123".to_string()
            })
        );
        assert_eq!(
            raw.set("epoch", "False"),
            Err(InputError::Malformed {
                field: "epoch",
                value: "False".to_string()
            })
        );
        assert_eq!(
            raw.set_pair("hello=world"),
            Err(InputError::UnknownField("hello".to_string()))
        );
        assert_eq!(
            raw.set_pair("refraction"),
            Err(InputError::UnknownField("refraction".to_string()))
        );
    }

    #[test]
    fn test_field_names_match_wire_format() {
        let mut raw = RawDetectionRequest::default();
        assert_eq!(
            raw.set_pair("latitude=49.27"),
            Err(InputError::UnknownField("latitude".to_string()))
        );
        assert_eq!(
            raw.set("longitude", "-123.13"),
            Err(InputError::UnknownField("longitude".to_string()))
        );

        let body = r#"{"latitude": 49.2, "lon": -123.1, "epoch": 1.0, "orientation": 0.0}"#;
        assert!(serde_json::from_str::<RawDetectionRequest>(body).is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let body = r#"{"lat": 49.2, "lon": -123.1, "epoch": 1.0, "orientation": 0.0, "hello": "world"}"#;
        assert!(serde_json::from_str::<RawDetectionRequest>(body).is_err());

        let body = r#"{"lat": 49.2, "lon": -123.1, "epoch": 1.0, "orientation": 0.0}"#;
        let raw: RawDetectionRequest = serde_json::from_str(body).unwrap();
        assert!(DetectionRequest::try_from(raw).is_ok());
    }

    #[test]
    fn test_result_json() {
        assert_eq!(DetectionResult { glare: true }.to_json(), r#"{"glare":true}"#);
        assert_eq!(DetectionResult { glare: false }.to_json(), r#"{"glare":false}"#);
    }
}
