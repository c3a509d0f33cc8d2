//! Command-line argument parsing.
//!
//! Request fields can be given as flags (`--lat 49.27`) or as form-style
//! pairs (`lat=49.27`), using the same field names as the JSON body.
//! Parsing is strict: unknown options are usage errors, and values that are
//! not numbers or name an unknown field are reported as input errors.

use std::path::PathBuf;

use crate::error::InputError;
use crate::logger::Log;
use crate::request::RawDetectionRequest;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Evaluate a request
    Detect {
        request: RawDetectionRequest,
        config_path: Option<PathBuf>,
        debug_enabled: bool,
        json_output: bool,
    },
    /// Write a default configuration file
    InitConfig { config_path: Option<PathBuf> },
    /// A request field was malformed or unknown
    InvalidInput(InputError),
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut json_output = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut init_config = false;
        let mut unknown_arg_found = false;
        let mut config_path: Option<PathBuf> = None;
        let mut request = RawDetectionRequest::default();
        let mut input_error: Option<InputError> = None;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--json" | "-j" => json_output = true,
                "--init-config" => init_config = true,
                "--config" | "-c" => match args_vec.get(i + 1) {
                    Some(path) => {
                        config_path = Some(PathBuf::from(path));
                        i += 1;
                    }
                    None => {
                        Log::log_warning("Missing path for --config");
                        unknown_arg_found = true;
                    }
                },
                "--lat" | "--lon" | "--epoch" | "--orientation" => {
                    let field = &arg_str[2..];
                    match args_vec.get(i + 1) {
                        Some(value) => {
                            if let Err(e) = request.set(field, value) {
                                input_error.get_or_insert(e);
                            }
                            i += 1;
                        }
                        None => {
                            Log::log_warning(&format!("Missing value for {}", arg_str));
                            unknown_arg_found = true;
                        }
                    }
                }
                _ => {
                    if arg_str.contains('=') {
                        if let Err(e) = request.set_pair(arg_str) {
                            input_error.get_or_insert(e);
                        }
                    } else if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                        unknown_arg_found = true;
                    } else {
                        input_error.get_or_insert(InputError::UnknownField(arg_str.clone()));
                    }
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if init_config {
            CliAction::InitConfig { config_path }
        } else if let Some(e) = input_error {
            CliAction::InvalidInput(e)
        } else {
            CliAction::Detect {
                request,
                config_path,
                debug_enabled,
                json_output,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start(
        "Usage: glarecheck --lat <deg> --lon <deg> --epoch <secs> --orientation <deg> [OPTIONS]",
    );
    Log::log_indented("   or: glarecheck lat=<deg> lon=<deg> epoch=<secs> orientation=<deg> [OPTIONS]");
    Log::log_block_start("Request fields:");
    Log::log_indented("--lat <deg>               Latitude, 0 to 90");
    Log::log_indented("--lon <deg>               Longitude, -180 to 180");
    Log::log_indented("--epoch <secs>            Unix timestamp, fractions allowed");
    Log::log_indented("--orientation <deg>       Direction of travel, -180 to 180 from north");
    Log::log_block_start("Options:");
    Log::log_indented("-c, --config <path>       Use this configuration file");
    Log::log_indented("-d, --debug               Enable detailed debug output");
    Log::log_indented("-j, --json                Print only the JSON result");
    Log::log_indented("    --init-config         Write a default configuration file");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-V, --version             Print version information");
    Log::log_end();
}
