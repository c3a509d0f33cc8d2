use chrono::{Offset, TimeZone, Utc};
use glarecheck::geo::{TimezoneResolver, TzfResolver, nautical_zone, parse_timezone};
use glarecheck::{DetectionError, DetectionPipeline, DetectionRequest};
use proptest::prelude::*;

/// Generate latitudes inside the request domain (northern hemisphere)
fn latitude_strategy() -> impl Strategy<Value = f64> {
    0.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Resolve the way the pipeline does: exact first, nearest on a miss
fn resolve_with_fallback(resolver: &TzfResolver, lat: f64, lon: f64) -> Option<chrono_tz::Tz> {
    resolver
        .resolve(lat, lon)
        .or_else(|| resolver.closest(lat, lon))
        .as_deref()
        .and_then(parse_timezone)
}

#[cfg(test)]
mod timezone_resolution_tests {
    use super::*;

    /// Continental interiors, well away from any coastline
    fn land_coordinates_strategy() -> impl Strategy<Value = (f64, f64)> {
        prop_oneof![
            // North America
            (35.0..48.0, -110.0..-85.0),
            // Europe
            (46.0..52.0, 5.0..30.0),
            // Asia
            (25.0..50.0, 75.0..115.0),
            // North Africa
            (15.0..28.0, 0.0..30.0),
        ]
    }

    proptest! {
        /// Every coordinate in the request domain yields a known timezone
        #[test]
        fn test_every_coordinate_resolves(
            lat in latitude_strategy(),
            lon in longitude_strategy()
        ) {
            let resolver = TzfResolver::default();
            prop_assert!(resolve_with_fallback(&resolver, lat, lon).is_some(),
                "No timezone for ({}, {})", lat, lon);
        }

        /// The nearest-zone heuristic never gives up
        #[test]
        fn test_closest_always_answers(
            lat in latitude_strategy(),
            lon in longitude_strategy()
        ) {
            let resolver = TzfResolver::default();
            let name = resolver.closest(lat, lon);
            prop_assert!(name.as_deref().and_then(parse_timezone).is_some(),
                "closest gave {:?} for ({}, {})", name, lat, lon);
        }

        /// Land points hit a polygon directly
        #[test]
        fn test_land_resolves_exactly((lat, lon) in land_coordinates_strategy()) {
            let resolver = TzfResolver::default();
            let name = resolver.resolve(lat, lon);
            prop_assert!(name.is_some(), "No polygon for ({}, {})", lat, lon);
        }

        /// UTC offsets of resolved zones stay within -12..=+14 hours
        #[test]
        fn test_timezone_offset_bounds(
            lat in latitude_strategy(),
            lon in longitude_strategy()
        ) {
            let resolver = TzfResolver::default();
            let tz = resolve_with_fallback(&resolver, lat, lon).unwrap();
            let instant = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
            let offset_hours =
                tz.offset_from_utc_datetime(&instant.naive_utc()).fix().local_minus_utc() as f64
                    / 3600.0;
            prop_assert!((-12.0..=14.0).contains(&offset_hours),
                "Unreasonable offset {} hours for ({}, {})", offset_hours, lat, lon);
        }

        /// Nautical zones exist in the database for every longitude
        #[test]
        fn test_nautical_zone_parses(lon in longitude_strategy()) {
            prop_assert!(parse_timezone(&nautical_zone(lon)).is_some());
        }

        /// The pipeline never reports an unresolved location for valid input
        #[test]
        fn test_pipeline_never_unresolved(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            epoch in 0.0..2_000_000_000.0f64,
            orientation in -180.0..=180.0f64
        ) {
            let pipeline = DetectionPipeline::default();
            let request = DetectionRequest::new(lat, lon, epoch, orientation).unwrap();
            let result = pipeline.detect(&request);
            prop_assert!(
                !matches!(result, Err(DetectionError::LocationUnresolved { .. })),
                "({}, {}) unresolved", lat, lon
            );
            prop_assert!(result.is_ok(), "({}, {}, {}) failed: {:?}", lat, lon, epoch, result.err());
        }
    }

    /// Points straddling the antimeridian both resolve
    #[test]
    fn test_antimeridian_edges() {
        let resolver = TzfResolver::default();
        for lon in [-180.0, -179.9999, 179.9999, 180.0] {
            for lat in [0.0, 52.0, 65.5, 89.9] {
                assert!(
                    resolve_with_fallback(&resolver, lat, lon).is_some(),
                    "No timezone for ({}, {})",
                    lat,
                    lon
                );
            }
        }
    }
}
