use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use glarecheck::args::{CliAction, ParsedArgs, display_help, display_version_info};
use glarecheck::constants::*;
use glarecheck::geo::sun_times_for_display;
use glarecheck::{
    Config, DetectionError, DetectionPipeline, DetectionReport, DetectionRequest, InputError, Log,
    RawDetectionRequest,
};

fn main() {
    let code = match ParsedArgs::from_env().action {
        CliAction::ShowVersion => {
            display_version_info();
            EXIT_SUCCESS
        }
        CliAction::ShowHelp => {
            display_help();
            EXIT_SUCCESS
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            EXIT_INVALID_INPUT
        }
        CliAction::InvalidInput(e) => report_invalid_input(&e, false),
        CliAction::InitConfig { config_path } => match init_config(config_path) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                Log::log_error(&format!("{:#}", e));
                EXIT_FAILURE
            }
        },
        CliAction::Detect {
            request,
            config_path,
            debug_enabled,
            json_output,
        } => run_detection(&request, config_path.as_deref(), debug_enabled, json_output),
    };

    std::process::exit(code);
}

/// Validate, evaluate and print one request. Returns the exit code.
fn run_detection(
    raw: &RawDetectionRequest,
    config_path: Option<&Path>,
    debug_enabled: bool,
    json_output: bool,
) -> i32 {
    if json_output {
        Log::set_enabled(false);
    }

    Log::log_version();

    let request = match raw.validate() {
        Ok(request) => request,
        Err(e) => return report_invalid_input(&e, json_output),
    };

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => return report_config_error(&e, json_output),
    };

    let debug_enabled = debug_enabled || config.debug_enabled();
    if debug_enabled {
        let shown_path = config_path
            .map(Path::to_path_buf)
            .or_else(|| Config::get_config_path().ok().filter(|p| p.exists()));
        config.log_config(shown_path.as_deref());
        Log::log_pipe();
    }

    let pipeline = DetectionPipeline::from_config(&config).with_debug(debug_enabled);

    match pipeline.evaluate(&request) {
        Ok(report) => {
            if json_output {
                println!("{}", report.result().to_json());
            } else {
                log_report(&request, &report, debug_enabled);
            }
            EXIT_SUCCESS
        }
        Err(e) => report_detection_error(&e, json_output),
    }
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn init_config(config_path: Option<PathBuf>) -> Result<()> {
    let path = match config_path {
        Some(path) => path,
        None => Config::get_config_path()?,
    };

    Config::create_default_config(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    Log::log_version();
    Log::log_decorated(&format!("Created default configuration: {}", path.display()));
    Log::log_end();
    Ok(())
}

fn log_report(request: &DetectionRequest, report: &DetectionReport, debug_enabled: bool) {
    Log::log_block_start(&format!(
        "Location {:.4}°N, {:.4}°{} heading {:.1}°",
        request.latitude(),
        request.longitude().abs(),
        if request.longitude() >= 0.0 { "E" } else { "W" },
        request.orientation()
    ));
    Log::log_indented(&format!("Timezone: {}", report.timezone));
    Log::log_indented(&format!(
        "Local time: {}",
        report.instant.format("%Y-%m-%d %H:%M:%S %Z")
    ));

    if debug_enabled {
        Log::log_indented(&format!("Sun azimuth: {:.4}°", report.position.azimuth));
        Log::log_indented(&format!("Sun altitude: {:.4}°", report.position.altitude));
        Log::log_indented(&format!(
            "Normalized heading: {:.4}°",
            report.normalized_orientation
        ));

        match sun_times_for_display(
            request.latitude(),
            request.longitude(),
            report.instant.date_naive(),
            &report.timezone,
        ) {
            Ok((sunrise, sunset)) => {
                Log::log_indented(&format!("Sunrise: {}", sunrise.format("%H:%M:%S")));
                Log::log_indented(&format!("Sunset: {}", sunset.format("%H:%M:%S")));
            }
            Err(e) => Log::log_warning(&format!("Could not calculate sun times: {}", e)),
        }
    }

    Log::log_block_start(&format!("Result: {}", report.result().to_json()));
    Log::log_end();
}

/// Error body written to stderr in `--json` mode.
fn error_json(message: &str) -> String {
    serde_json::json!({ "message": message }).to_string()
}

fn report_invalid_input(error: &InputError, json_output: bool) -> i32 {
    if json_output {
        eprintln!("{}", error_json(&error.to_string()));
    }
    Log::log_error(&format!("Invalid request: {}", error));
    EXIT_INVALID_INPUT
}

fn report_config_error(error: &anyhow::Error, json_output: bool) -> i32 {
    if json_output {
        eprintln!("{}", error_json(&format!("{:#}", error)));
    }
    Log::log_error(&format!("{:#}", error));
    EXIT_FAILURE
}

fn report_detection_error(error: &DetectionError, json_output: bool) -> i32 {
    if json_output {
        eprintln!("{}", error_json(&error.to_string()));
    }

    if error.is_client_facing() {
        Log::log_error("We cannot locate your timezone.");
        Log::log_indented(&error.to_string());
        EXIT_LOCATION_UNRESOLVED
    } else {
        Log::log_critical(&format!("Internal error: {}", error));
        EXIT_FAILURE
    }
}
