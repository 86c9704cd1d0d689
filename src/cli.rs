//! Command-line interface definition

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

const OUTPUT_HELP: &str = "\
Output:
  IFACE=<interface-name>
  IPADDR=<configured-ip>";

#[derive(Parser, Debug)]
#[command(
    name = "ifacepicker",
    version,
    about = "List and easily select network interfaces, displaying their respective IP addresses.",
    after_help = OUTPUT_HELP
)]
pub struct Cli {
    #[arg(short = 'c', long, help = "Configuration file path", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'i',
        long,
        help = "Read the interface listing from FILE instead of running the listing command",
        value_name = "FILE"
    )]
    pub input: Option<PathBuf>,

    #[arg(short = 'v', long, help = "Increase log verbosity on stderr", action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, help = "Print the effective configuration as TOML and exit")]
    pub print_config: bool,
}

impl Cli {
    /// Validate combinations clap cannot express on its own.
    ///
    /// Failures are clap usage errors, so `Error::exit` reports them like any
    /// other bad argument and exits with status 2.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if let Some(input) = &self.input {
            if input.as_os_str() == "-" {
                return Err(Self::command().error(
                    ErrorKind::ArgumentConflict,
                    "--input cannot read from stdin; stdin is used for the selection",
                ));
            }
        }
        Ok(())
    }
}
