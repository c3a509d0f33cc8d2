//! Geographic collaborators of the detection pipeline.
//!
//! - **timezone**: coordinate to IANA timezone, with a nearest-zone fallback
//! - **solar**: solar azimuth/altitude for a timezone-aware instant
//!
//! Both are traits so the pipeline can run against any conforming
//! implementation. The defaults are pure local computations; the tzf-rs
//! polygon index is built once per process and shared read-only.

pub mod solar;
pub mod timezone;

pub use solar::{SolarPosition, SolarPositionCalculator, SpaCalculator, sun_times_for_display};
pub use timezone::{TimezoneResolver, TzfResolver, nautical_zone, parse_timezone};
