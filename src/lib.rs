//! # Glarecheck
//!
//! Decides whether direct sunlight is likely to glare into a forward-facing
//! camera or driver, given a position, a Unix timestamp and a direction of travel.
//!
//! ## Architecture
//!
//! - **args**: Command-line parsing for the `glarecheck` binary
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Defaults, validation limits and exit codes
//! - **error**: Input and detection error types
//! - **geo**: Timezone resolution and solar position collaborators
//! - **glare**: Orientation normalization and the glare predicate
//! - **logger**: Structured logging with visual formatting
//! - **pipeline**: The detection pipeline tying the pieces together
//! - **request**: Detection request/result types and input validation

pub mod args;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod glare;
pub mod logger;
pub mod pipeline;
pub mod request;

// Re-export important types for easier access
pub use config::Config;
pub use error::{DetectionError, InputError};
pub use geo::{SolarPosition, SolarPositionCalculator, SpaCalculator, TimezoneResolver, TzfResolver};
pub use glare::{GlareRule, classify, normalize_orientation};
pub use logger::{Log, LogLevel};
pub use pipeline::{DetectionPipeline, DetectionReport, PipelineStage};
pub use request::{DetectionRequest, DetectionResult, RawDetectionRequest};
