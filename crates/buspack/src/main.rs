mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "buspack", version, about = "Packet framing CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pack_subcommand() {
        let cli = Cli::try_parse_from(["buspack", "pack", "--data", "hello"])
            .expect("pack args should parse");

        assert!(matches!(cli.command, Command::Pack(_)));
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from(["buspack", "pack", "--data", "hi", "--hex", "0102"])
            .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_unpack_with_input_file() {
        let cli = Cli::try_parse_from(["buspack", "unpack", "frames.bin"])
            .expect("unpack args should parse");

        assert!(matches!(cli.command, Command::Unpack(_)));
    }

    #[test]
    fn parses_global_format_flag() {
        let cli = Cli::try_parse_from(["buspack", "--format", "json", "inspect", "frame.bin"])
            .expect("inspect args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
