//! Configuration for glarecheck.
//!
//! Settings live in `glarecheck.toml` under the user's config directory
//! (`$XDG_CONFIG_HOME/glarecheck/glarecheck.toml` on Linux). Every key is
//! optional, and a missing file simply means built-in defaults:
//!
//! ```toml
//! # Glare rule
//! azimuth_window = 30.0          # Degrees; glare when azimuth - heading < window
//! altitude_ceiling = 45.0        # Degrees; glare only when the sun is below this
//!
//! # Solar position
//! observer_elevation = 0.0       # Metres above sea level
//! # delta_t = 69.0               # Seconds; estimated per date when omitted
//!
//! # Timezone fallback for points outside every timezone polygon
//! closest_search_radius = 2.0    # Degrees
//! closest_search_step = 0.25     # Degrees between search rings
//!
//! debug = false                  # Log every pipeline stage
//! ```
//!
//! Values outside their allowed range make loading fail with a message that
//! names the key and the limits.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::geo::{SpaCalculator, TzfResolver};
use crate::glare::GlareRule;
use crate::logger::Log;

/// Configuration loaded from `glarecheck.toml`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Upper bound on `azimuth - normalized_orientation`, degrees.
    pub azimuth_window: Option<f64>,
    /// Upper bound on solar altitude, degrees.
    pub altitude_ceiling: Option<f64>,
    pub observer_elevation: Option<f64>, // metres
    pub delta_t: Option<f64>,            // seconds, None = estimate per date
    pub closest_search_radius: Option<f64>,
    pub closest_search_step: Option<f64>,
    pub debug: Option<bool>,
}

impl Config {
    /// Default location of the configuration file.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        validate_config(&config)?;

        Ok(config)
    }

    /// Write a commented default configuration file.
    ///
    /// Refuses to overwrite an existing file.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Configuration file already exists: {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = ConfigBuilder::new()
            .add_section("Glare rule")
            .add_setting(
                "azimuth_window",
                &format!("{:.1}", DEFAULT_AZIMUTH_WINDOW),
                "Degrees; glare when azimuth - heading is below this",
            )
            .add_setting(
                "altitude_ceiling",
                &format!("{:.1}", DEFAULT_ALTITUDE_CEILING),
                "Degrees; glare only when the sun is lower than this",
            )
            .add_section("Solar position")
            .add_setting(
                "observer_elevation",
                &format!("{:.1}", DEFAULT_OBSERVER_ELEVATION),
                "Metres above sea level",
            )
            .add_section("Timezone fallback")
            .add_setting(
                "closest_search_radius",
                &format!("{:.2}", DEFAULT_CLOSEST_SEARCH_RADIUS),
                "Degrees to search for the nearest timezone",
            )
            .add_setting(
                "closest_search_step",
                &format!("{:.2}", DEFAULT_CLOSEST_SEARCH_STEP),
                "Degrees between search rings",
            )
            .add_section("Diagnostics")
            .add_setting("debug", "false", "Log every pipeline stage")
            .build();

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    pub fn glare_rule(&self) -> GlareRule {
        GlareRule {
            azimuth_window: self.azimuth_window.unwrap_or(DEFAULT_AZIMUTH_WINDOW),
            altitude_ceiling: self.altitude_ceiling.unwrap_or(DEFAULT_ALTITUDE_CEILING),
        }
    }

    pub fn solar_calculator(&self) -> SpaCalculator {
        SpaCalculator::new(
            self.observer_elevation
                .unwrap_or(DEFAULT_OBSERVER_ELEVATION),
            self.delta_t,
        )
    }

    pub fn timezone_resolver(&self) -> TzfResolver {
        TzfResolver::new(
            self.closest_search_radius
                .unwrap_or(DEFAULT_CLOSEST_SEARCH_RADIUS),
            self.closest_search_step
                .unwrap_or(DEFAULT_CLOSEST_SEARCH_STEP),
        )
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    pub fn log_config(&self, path: Option<&Path>) {
        match path {
            Some(path) => Log::log_block_start(&format!(
                "Loaded configuration from {}",
                path.display()
            )),
            None => Log::log_block_start("Using default configuration"),
        }

        let rule = self.glare_rule();
        Log::log_indented(&format!("Azimuth window: {}°", rule.azimuth_window));
        Log::log_indented(&format!("Altitude ceiling: {}°", rule.altitude_ceiling));

        let calculator = self.solar_calculator();
        Log::log_indented(&format!("Observer elevation: {} m", calculator.elevation));
        match calculator.delta_t {
            Some(delta_t) => Log::log_indented(&format!("ΔT: {} s", delta_t)),
            None => Log::log_indented("ΔT: estimated per date"),
        }

        let resolver = self.timezone_resolver();
        Log::log_indented(&format!(
            "Nearest-zone search: {}° in {}° steps",
            resolver.search_radius, resolver.search_step
        ));
    }
}

/// Range validation for every configured value.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(window) = config.azimuth_window {
        if !(window > 0.0 && window <= MAXIMUM_AZIMUTH_WINDOW) {
            anyhow::bail!(
                "azimuth_window ({}) must be greater than 0 and at most {} degrees",
                window,
                MAXIMUM_AZIMUTH_WINDOW
            );
        }
    }

    if let Some(ceiling) = config.altitude_ceiling {
        if !(ceiling > 0.0 && ceiling <= MAXIMUM_ALTITUDE_CEILING) {
            anyhow::bail!(
                "altitude_ceiling ({}) must be greater than 0 and at most {} degrees",
                ceiling,
                MAXIMUM_ALTITUDE_CEILING
            );
        }
    }

    if let Some(elevation) = config.observer_elevation {
        if !(MINIMUM_OBSERVER_ELEVATION..=MAXIMUM_OBSERVER_ELEVATION).contains(&elevation) {
            anyhow::bail!(
                "observer_elevation ({} m) must be between {} and {} metres",
                elevation,
                MINIMUM_OBSERVER_ELEVATION,
                MAXIMUM_OBSERVER_ELEVATION
            );
        }
    }

    if let Some(delta_t) = config.delta_t {
        if !(MINIMUM_DELTA_T..=MAXIMUM_DELTA_T).contains(&delta_t) {
            anyhow::bail!(
                "delta_t ({} s) must be between {} and {} seconds",
                delta_t,
                MINIMUM_DELTA_T,
                MAXIMUM_DELTA_T
            );
        }
    }

    if let Some(radius) = config.closest_search_radius {
        if !(0.0..=MAXIMUM_CLOSEST_SEARCH_RADIUS).contains(&radius) {
            anyhow::bail!(
                "closest_search_radius ({}) must be between 0 and {} degrees",
                radius,
                MAXIMUM_CLOSEST_SEARCH_RADIUS
            );
        }
    }

    if let Some(step) = config.closest_search_step {
        if !(step > 0.0 && step <= MAXIMUM_CLOSEST_SEARCH_STEP) {
            anyhow::bail!(
                "closest_search_step ({}) must be greater than 0 and at most {} degrees",
                step,
                MAXIMUM_CLOSEST_SEARCH_STEP
            );
        }
    }

    Ok(())
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        // Align comments one space past the longest setting line
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        for (index, entry) in self.entries.into_iter().enumerate() {
            match entry {
                ConfigEntry::Section(title) => {
                    if index > 0 {
                        result.push(String::new());
                    }
                    result.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}
