//! Coordinate to timezone resolution.
//!
//! The exact lookup uses the timezone boundary polygons shipped with tzf-rs.
//! Coordinates outside every polygon go through [`TimezoneResolver::closest`],
//! which searches outward for the nearest polygon and finally falls back to
//! the nautical zone for the longitude.

use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

use crate::constants::{
    CLOSEST_SEARCH_BEARINGS, DEFAULT_CLOSEST_SEARCH_RADIUS, DEFAULT_CLOSEST_SEARCH_STEP,
};

/// Maps a coordinate to an IANA timezone identifier.
#[cfg_attr(test, mockall::automock)]
pub trait TimezoneResolver {
    /// Exact polygon lookup. `None` means no polygon contains the point.
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<String>;

    /// Nearest-timezone heuristic, consulted only when [`resolve`] found
    /// nothing. `None` means even the heuristic produced no identifier.
    ///
    /// [`resolve`]: TimezoneResolver::resolve
    fn closest(&self, latitude: f64, longitude: f64) -> Option<String>;
}

/// Shared polygon index, built on first use and read-only afterwards.
fn finder() -> &'static DefaultFinder {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    FINDER.get_or_init(DefaultFinder::new)
}

/// [`TimezoneResolver`] backed by tzf-rs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TzfResolver {
    /// How far the nearest-zone search reaches, degrees
    pub search_radius: f64,
    /// Distance between search rings, degrees
    pub search_step: f64,
}

impl Default for TzfResolver {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_CLOSEST_SEARCH_RADIUS,
            search_step: DEFAULT_CLOSEST_SEARCH_STEP,
        }
    }
}

impl TzfResolver {
    pub fn new(search_radius: f64, search_step: f64) -> Self {
        Self {
            search_radius,
            search_step,
        }
    }

    fn lookup(latitude: f64, longitude: f64) -> Option<String> {
        // Note: tzf-rs uses (longitude, latitude) order
        let name = finder().get_tz_name(longitude, latitude);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Probe rings of points around the coordinate, nearest ring first.
    fn ring_search(&self, latitude: f64, longitude: f64) -> Option<String> {
        if self.search_step <= 0.0 || self.search_radius <= 0.0 {
            return None;
        }

        let rings = (self.search_radius / self.search_step).floor() as usize;
        for ring in 1..=rings {
            let radius = ring as f64 * self.search_step;
            for bearing_index in 0..CLOSEST_SEARCH_BEARINGS {
                let bearing = (bearing_index as f64 * 360.0 / CLOSEST_SEARCH_BEARINGS as f64)
                    .to_radians();
                let probe_lat = (latitude + radius * bearing.cos()).clamp(-90.0, 90.0);
                let probe_lon = wrap_longitude(longitude + radius * bearing.sin());

                if let Some(name) = Self::lookup(probe_lat, probe_lon) {
                    return Some(name);
                }
            }
        }

        None
    }
}

impl TimezoneResolver for TzfResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<String> {
        Self::lookup(latitude, longitude)
    }

    fn closest(&self, latitude: f64, longitude: f64) -> Option<String> {
        self.ring_search(latitude, longitude)
            .or_else(|| Some(nautical_zone(longitude)))
    }
}

/// Wrap a longitude into `[-180, 180)`, crossing the antimeridian.
pub fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Nautical timezone for a longitude: one hour per 15°.
///
/// `Etc/` zones invert the sign (POSIX style), so 30°E is `Etc/GMT-2`.
pub fn nautical_zone(longitude: f64) -> String {
    let offset_hours = (longitude / 15.0).round().clamp(-12.0, 12.0) as i32;
    if offset_hours == 0 {
        "Etc/GMT".to_string()
    } else {
        format!("Etc/GMT{:+}", -offset_hours)
    }
}

/// Parse an identifier into a timezone database entry.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_cities() {
        let resolver = TzfResolver::default();
        let cases = [
            (49.2699648, -123.1290368, "America/Vancouver"),
            (39.7392, -104.9903, "America/Denver"),
            (49.8951, -97.1384, "America/Winnipeg"),
            (40.7128, -74.0060, "America/New_York"),
            (51.5074, -0.1278, "Europe/London"),
            (35.6762, 139.6503, "Asia/Tokyo"),
        ];

        for (lat, lon, expected) in cases {
            assert_eq!(
                resolver.resolve(lat, lon).as_deref(),
                Some(expected),
                "wrong timezone for ({}, {})",
                lat,
                lon
            );
        }
    }

    #[test]
    fn test_closest_never_fails() {
        let resolver = TzfResolver::default();
        for (lat, lon) in [(0.0, -180.0), (0.0, 180.0), (90.0, 0.0), (45.0, -150.0)] {
            let name = resolver.closest(lat, lon).expect("closest must produce a name");
            assert!(parse_timezone(&name).is_some(), "unparseable zone {}", name);
        }
    }

    #[test]
    fn test_nautical_zone_signs() {
        assert_eq!(nautical_zone(0.0), "Etc/GMT");
        assert_eq!(nautical_zone(7.4), "Etc/GMT");
        assert_eq!(nautical_zone(30.0), "Etc/GMT-2");
        assert_eq!(nautical_zone(-123.1), "Etc/GMT+8");
        assert_eq!(nautical_zone(180.0), "Etc/GMT-12");
        assert_eq!(nautical_zone(-180.0), "Etc/GMT+12");
    }

    #[test]
    fn test_nautical_zones_exist() {
        let mut lon = -180.0;
        while lon <= 180.0 {
            let name = nautical_zone(lon);
            assert!(parse_timezone(&name).is_some(), "{} is not a known zone", name);
            lon += 7.5;
        }
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(0.0), 0.0);
        assert_eq!(wrap_longitude(181.0), -179.0);
        assert_eq!(wrap_longitude(-181.0), 179.0);
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert_eq!(wrap_longitude(-180.0), -180.0);
    }

    #[test]
    fn test_ring_search_disabled_by_zero_step() {
        let resolver = TzfResolver::new(2.0, 0.0);
        assert_eq!(resolver.ring_search(49.27, -123.13), None);
        // Still falls through to the nautical zone
        assert_eq!(resolver.closest(49.27, -123.13).as_deref(), Some("Etc/GMT+8"));
    }

    #[test]
    fn test_parse_timezone_rejects_unknown() {
        assert!(parse_timezone("America/Vancouver").is_some());
        assert!(parse_timezone("Mars/Olympus_Mons").is_none());
        assert!(parse_timezone("").is_none());
    }
}
