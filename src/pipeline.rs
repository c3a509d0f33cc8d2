//! The glare detection pipeline.
//!
//! A request moves through a fixed sequence of stages:
//!
//! ```text
//! Received -> TimezoneResolved -> InstantLocalized -> PositionComputed -> Classified -> Done
//!                    |
//!                    +-> Failed (LocationUnresolved)
//! ```
//!
//! Every stage runs exactly once and synchronously. Nothing is retried and
//! nothing is cached; the pipeline holds no per-request state, so a single
//! instance can serve any number of callers.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use std::fmt;

use crate::config::Config;
use crate::error::DetectionError;
use crate::geo::{
    SolarPosition, SolarPositionCalculator, SpaCalculator, TimezoneResolver, TzfResolver,
    parse_timezone,
};
use crate::glare::{GlareRule, normalize_orientation};
use crate::logger::Log;
use crate::request::{DetectionRequest, DetectionResult};

/// Stages of a single detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    TimezoneResolved,
    InstantLocalized,
    PositionComputed,
    Classified,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::TimezoneResolved => "timezone resolved",
            PipelineStage::InstantLocalized => "instant localized",
            PipelineStage::PositionComputed => "position computed",
            PipelineStage::Classified => "classified",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything the pipeline derived on the way to a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub timezone: Tz,
    pub instant: DateTime<Tz>,
    pub position: SolarPosition,
    pub normalized_orientation: f64,
    pub glare: bool,
}

impl DetectionReport {
    pub fn result(&self) -> DetectionResult {
        DetectionResult { glare: self.glare }
    }
}

/// Orchestrates timezone resolution, localization, solar position and
/// classification for one request at a time.
#[derive(Debug, Clone)]
pub struct DetectionPipeline<R = TzfResolver, S = SpaCalculator> {
    resolver: R,
    calculator: S,
    rule: GlareRule,
    debug: bool,
}

impl DetectionPipeline {
    /// Pipeline with the default collaborators tuned by `config`.
    pub fn from_config(config: &Config) -> Self {
        DetectionPipeline::new(config.timezone_resolver(), config.solar_calculator())
            .with_rule(config.glare_rule())
            .with_debug(config.debug_enabled())
    }
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        DetectionPipeline::new(TzfResolver::default(), SpaCalculator::default())
    }
}

impl<R, S> DetectionPipeline<R, S>
where
    R: TimezoneResolver,
    S: SolarPositionCalculator,
{
    pub fn new(resolver: R, calculator: S) -> Self {
        Self {
            resolver,
            calculator,
            rule: GlareRule::default(),
            debug: false,
        }
    }

    pub fn with_rule(mut self, rule: GlareRule) -> Self {
        self.rule = rule;
        self
    }

    /// Log every stage transition.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn rule(&self) -> GlareRule {
        self.rule
    }

    /// Run the pipeline and return only the verdict.
    pub fn detect(&self, request: &DetectionRequest) -> Result<DetectionResult, DetectionError> {
        self.evaluate(request).map(|report| report.result())
    }

    /// Run the pipeline and return every intermediate value.
    pub fn evaluate(&self, request: &DetectionRequest) -> Result<DetectionReport, DetectionError> {
        let (latitude, longitude) = (request.latitude(), request.longitude());
        self.trace(PipelineStage::Received, || {
            format!(
                "lat={}, lon={}, epoch={}, orientation={}",
                latitude,
                longitude,
                request.epoch(),
                request.orientation()
            )
        });

        let timezone = match self.resolve_timezone(latitude, longitude) {
            Ok(tz) => tz,
            Err(e) => {
                self.trace(PipelineStage::Failed, || e.to_string());
                return Err(e);
            }
        };
        self.trace(PipelineStage::TimezoneResolved, || timezone.name().to_string());

        let instant = localize_epoch(request.epoch(), timezone).ok_or(
            DetectionError::InstantOutOfRange {
                epoch: request.epoch(),
            },
        )?;
        self.trace(PipelineStage::InstantLocalized, || instant.to_rfc3339());

        let position = self
            .calculator
            .position(latitude, longitude, &instant)
            .map_err(DetectionError::Ephemeris)?;
        self.trace(PipelineStage::PositionComputed, || {
            format!(
                "azimuth={:.4}°, altitude={:.4}°",
                position.azimuth, position.altitude
            )
        });

        let normalized_orientation = normalize_orientation(request.orientation());
        let glare = self
            .rule
            .classify(position.azimuth, position.altitude, normalized_orientation);
        self.trace(PipelineStage::Classified, || {
            format!(
                "orientation={:.4}°, glare={}",
                normalized_orientation, glare
            )
        });

        self.trace(PipelineStage::Done, String::new);
        Ok(DetectionReport {
            timezone,
            instant,
            position,
            normalized_orientation,
            glare,
        })
    }

    /// Exact lookup first; the nearest-zone fallback only on a miss.
    fn resolve_timezone(&self, latitude: f64, longitude: f64) -> Result<Tz, DetectionError> {
        let name = match self.resolver.resolve(latitude, longitude) {
            Some(name) => Some(name),
            None => {
                self.trace(PipelineStage::Received, || {
                    "point outside every timezone polygon, trying nearest zone".to_string()
                });
                self.resolver.closest(latitude, longitude)
            }
        };

        name.as_deref()
            .and_then(parse_timezone)
            .ok_or(DetectionError::LocationUnresolved {
                latitude,
                longitude,
            })
    }

    fn trace(&self, stage: PipelineStage, detail: impl FnOnce() -> String) {
        if !self.debug {
            return;
        }
        let detail = detail();
        if detail.is_empty() {
            Log::log_debug(&format!("Pipeline {}", stage));
        } else {
            Log::log_debug(&format!("Pipeline {}: {}", stage, detail));
        }
    }
}

/// Bind a Unix timestamp (fractional seconds allowed) to a timezone.
///
/// Returns `None` when the timestamp does not fit chrono's date range.
pub fn localize_epoch(epoch: f64, timezone: Tz) -> Option<DateTime<Tz>> {
    if !epoch.is_finite() {
        return None;
    }

    let secs = epoch.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }

    let nanos = (((epoch - secs) * 1e9).round() as u32).min(999_999_999);
    timezone.timestamp_opt(secs as i64, nanos).single()
}
