//! Snarl CLI entry point: argument parsing, logging setup and command
//! dispatch.

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use snarl_cli::{cli, commands, error, logger, ui};

fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Check(check_args) => {
            // log_level from the config file is only known after loading it
            commands::check::load_config(&check_args).and_then(|config| {
                logger::init_logger(
                    args.verbose,
                    args.quiet,
                    args.no_color,
                    config.settings.log_level.as_deref(),
                );
                commands::check::execute(&check_args, &config)
            })
        }
        cli::Command::Init(init_args) => {
            logger::init_logger(args.verbose, args.quiet, args.no_color, None);
            commands::init::execute(&init_args).map(|()| commands::Outcome::Clean)
        }
    };

    result
        .map(commands::Outcome::exit_code)
        .map_err(error::cli_error_to_miette)
}
