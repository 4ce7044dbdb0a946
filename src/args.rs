//! Command-line argument parsing and processing.
//!
//! Turns the raw argument list into a [`CliAction`] for `main`. Unknown options
//! and malformed values never abort parsing; they are reported and turn the
//! action into [`CliAction::ShowHelpDueToError`].

use crate::constants::{MAXIMUM_YEAR, MINIMUM_YEAR};

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Generate a calendar with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        /// Overrides the configured year
        year: Option<i32>,
        /// Print JSON on stdout instead of the summary
        json: bool,
        /// Route log output to this file
        log_file: Option<String>,
    },
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
        let mut display_help = false;
        let mut display_version = false;
        let mut json = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;
        let mut year: Option<i32> = None;
        let mut log_file: Option<String> = None;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Value of a flag that takes one argument, if the next item is not a flag
        let value_after = |i: usize| args_vec.get(i + 1).filter(|next| !next.starts_with('-'));

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--json" | "-j" => json = true,
                "--config" | "-c" => match value_after(i) {
                    Some(dir) => {
                        config_dir = Some(dir.clone());
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                },
                "--log" | "-l" => match value_after(i) {
                    Some(file) => {
                        log_file = Some(file.clone());
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing file for --log. Usage: --log <file>");
                        unknown_arg_found = true;
                    }
                },
                "--year" | "-y" => match args_vec.get(i + 1) {
                    Some(value) => {
                        match value.parse::<i32>() {
                            Ok(parsed) if (MINIMUM_YEAR..=MAXIMUM_YEAR).contains(&parsed) => {
                                year = Some(parsed);
                            }
                            Ok(parsed) => {
                                log_warning!(
                                    "Year {} is out of range ({}-{})",
                                    parsed,
                                    MINIMUM_YEAR,
                                    MAXIMUM_YEAR
                                );
                                unknown_arg_found = true;
                            }
                            Err(_) => {
                                log_warning!("Invalid year value: {}", value);
                                unknown_arg_found = true;
                            }
                        }
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing value for --year. Usage: --year <year>");
                        unknown_arg_found = true;
                    }
                },
                _ => {
                    log_warning!("Unknown argument: {arg_str}");
                    unknown_arg_found = true;
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
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
                year,
                json,
                log_file,
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
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("orbitcal [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-y, --year <year>      Generate this orbital year instead of the configured one");
    log_indented!("-j, --json             Print the calendar as JSON");
    log_indented!("-l, --log <file>       Write log output to a file");
    log_indented!("-d, --debug            Print every day of the calendar");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        debug_enabled: bool,
        config_dir: Option<&str>,
        year: Option<i32>,
        json: bool,
        log_file: Option<&str>,
    ) -> CliAction {
        CliAction::Run {
            debug_enabled,
            config_dir: config_dir.map(str::to_string),
            year,
            json,
            log_file: log_file.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["orbitcal"]);
        assert_eq!(parsed.action, run(false, None, None, false, None));
    }

    #[test]
    fn test_parse_debug_flag() {
        let parsed = ParsedArgs::parse(vec!["orbitcal", "--debug"]);
        assert_eq!(parsed.action, run(true, None, None, false, None));

        let parsed = ParsedArgs::parse(vec!["orbitcal", "-d"]);
        assert_eq!(parsed.action, run(true, None, None, false, None));
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(
            ParsedArgs::parse(vec!["orbitcal", "--help"]).action,
            CliAction::ShowHelp
        );
        assert_eq!(
            ParsedArgs::parse(vec!["orbitcal", "-h"]).action,
            CliAction::ShowHelp
        );
    }

    #[test]
    fn test_parse_version_short_flags() {
        assert_eq!(
            ParsedArgs::parse(vec!["orbitcal", "-V"]).action,
            CliAction::ShowVersion
        );
        assert_eq!(
            ParsedArgs::parse(vec!["orbitcal", "-v"]).action,
            CliAction::ShowVersion
        );
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["orbitcal", "--version", "--help", "--debug"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_all_run_options() {
        let parsed = ParsedArgs::parse(vec![
            "orbitcal", "-c", "/tmp/cal", "--year", "2025", "--json", "-l", "out.log",
        ]);
        assert_eq!(
            parsed.action,
            run(false, Some("/tmp/cal"), Some(2025), true, Some("out.log"))
        );
    }

    #[test]
    fn test_parse_invalid_year() {
        for value in ["twenty", "1500", "3000"] {
            let parsed = ParsedArgs::parse(vec!["orbitcal", "--year", value]);
            assert_eq!(parsed.action, CliAction::ShowHelpDueToError, "{value}");
        }
    }

    #[test]
    fn test_parse_missing_values() {
        for flag in ["--year", "--config", "--log"] {
            let parsed = ParsedArgs::parse(vec!["orbitcal", flag]);
            assert_eq!(parsed.action, CliAction::ShowHelpDueToError, "{flag}");
        }

        // A flag is not taken as the config directory
        let parsed = ParsedArgs::parse(vec!["orbitcal", "--config", "--debug"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["orbitcal", "--debug", "--invalid"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);

        let parsed = ParsedArgs::parse(vec!["orbitcal", "stray"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }
}
