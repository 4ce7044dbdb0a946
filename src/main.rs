//! Main application entry point.
//!
//! Parses arguments, loads the configuration, generates one orbital year with the
//! analytic ephemeris and prints it either as a logger summary or as JSON.

use anyhow::{Context, Result};

use orbitcal::args::{self, CliAction, ParsedArgs};
use orbitcal::config::{self, Config};
use orbitcal::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use orbitcal::logger::Log;
use orbitcal::{MeeusEphemeris, generate, report};
use orbitcal::{log_block_start, log_end, log_error_exit, log_indented, log_version};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let code = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            EXIT_SUCCESS
        }
        CliAction::ShowHelp => {
            args::display_help();
            EXIT_SUCCESS
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            EXIT_FAILURE
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            year,
            json,
            log_file,
        } => match run(debug_enabled, config_dir, year, json, log_file) {
            Ok(()) => EXIT_SUCCESS,
            Err(_) => EXIT_FAILURE,
        },
    };

    std::process::exit(code);
}

fn run(
    debug_enabled: bool,
    config_dir: Option<String>,
    year: Option<i32>,
    json: bool,
    log_file: Option<String>,
) -> Result<()> {
    // Keep the guard alive until the end of the run so the log file is flushed
    let log_guard = match log_file {
        Some(path) => match Log::start_file_logging(path) {
            Ok(guard) => Some(guard),
            Err(e) => {
                log_error_exit!("{:#}", e);
                return Err(e);
            }
        },
        None => None,
    };

    // JSON goes to stdout, so the decorated log would corrupt it
    if json && log_guard.is_none() {
        Log::set_enabled(false);
    }

    // Report while the file logger is still alive
    let result = generate_and_print(debug_enabled, config_dir, year, json);
    if let Err(e) = &result {
        Log::set_enabled(true);
        log_error_exit!("{:#}", e);
    }
    result
}

fn generate_and_print(
    debug_enabled: bool,
    config_dir: Option<String>,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    config::set_config_dir(config_dir)?;

    log_version!();

    let config = Config::load()?;
    Log::set_debug(debug_enabled || config.debug_enabled());
    config.log_config(&Config::get_config_path()?);

    let request = config.to_request(year)?;
    log_block_start!(
        "Generating orbital year {} for a birth at {}",
        request.year(),
        request.birth_instant()
    );

    let calendar = generate(&request, &MeeusEphemeris::new())
        .with_context(|| format!("Failed to generate the calendar for {}", request.year()))?;

    if json {
        println!("{}", report::to_json(&calendar)?);
        log_indented!("Wrote {} days as JSON", calendar.total_days());
    } else {
        report::log_summary(&calendar);
    }

    log_end!();
    Ok(())
}
