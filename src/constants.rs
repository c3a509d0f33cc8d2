//! Application constants and default values for glarecheck.
//!
//! This module contains the glare rule defaults, request and configuration
//! validation limits, and the exit codes used by the binary.

// ═══ Glare Rule Defaults ═══

pub const DEFAULT_AZIMUTH_WINDOW: f64 = 30.0; // degrees - forward cone, one-sided
pub const DEFAULT_ALTITUDE_CEILING: f64 = 45.0; // degrees - above this the sun is overhead

// ═══ Solar Position Defaults ═══

pub const DEFAULT_OBSERVER_ELEVATION: f64 = 0.0; // metres above sea level
pub const FALLBACK_DELTA_T: f64 = 69.0; // seconds - used when the estimator rejects a date

// ═══ Timezone Fallback Defaults ═══
// Ring search around a coordinate that sits outside every timezone polygon

pub const DEFAULT_CLOSEST_SEARCH_RADIUS: f64 = 2.0; // degrees
pub const DEFAULT_CLOSEST_SEARCH_STEP: f64 = 0.25; // degrees between rings
pub const CLOSEST_SEARCH_BEARINGS: usize = 8; // probes per ring

// ═══ Request Validation Limits ═══

pub const MINIMUM_LATITUDE: f64 = 0.0; // northern hemisphere only
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;
pub const MINIMUM_ORIENTATION: f64 = -180.0;
pub const MAXIMUM_ORIENTATION: f64 = 180.0;

// ═══ Configuration Validation Limits ═══

pub const MAXIMUM_AZIMUTH_WINDOW: f64 = 180.0;
pub const MAXIMUM_ALTITUDE_CEILING: f64 = 90.0;
pub const MINIMUM_OBSERVER_ELEVATION: f64 = -500.0; // metres (Dead Sea shore is ~-430)
pub const MAXIMUM_OBSERVER_ELEVATION: f64 = 9000.0;
pub const MINIMUM_DELTA_T: f64 = -100.0;
pub const MAXIMUM_DELTA_T: f64 = 500.0;
pub const MAXIMUM_CLOSEST_SEARCH_RADIUS: f64 = 10.0;
pub const MAXIMUM_CLOSEST_SEARCH_STEP: f64 = 5.0;

// ═══ Files ═══

pub const CONFIG_DIR_NAME: &str = "glarecheck";
pub const CONFIG_FILE_NAME: &str = "glarecheck.toml";

// ═══ Exit Codes ═══

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1; // Internal failure
pub const EXIT_INVALID_INPUT: i32 = 2; // Usage or validation error
pub const EXIT_LOCATION_UNRESOLVED: i32 = 3; // No timezone for the coordinate

// ═══ Test Constants ═══
// Vancouver scenarios from the reference data set
#[cfg(test)]
pub mod test_constants {
    pub const TEST_VANCOUVER_LAT: f64 = 49.2699648;
    pub const TEST_VANCOUVER_LON: f64 = -123.1290368;
    pub const TEST_GLARE_EPOCH: f64 = 1591351810.154;
    pub const TEST_GLARE_ORIENTATION: f64 = 85.1;
    pub const TEST_CLEAR_EPOCH: f64 = 1588704959.321;
    pub const TEST_CLEAR_ORIENTATION: f64 = -10.2;
}
