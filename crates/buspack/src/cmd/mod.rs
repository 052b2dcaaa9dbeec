use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod inspect;
pub mod pack;
pub mod unpack;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame a payload and emit the packet bytes.
    Pack(PackArgs),
    /// Decode packets and emit their payloads.
    Unpack(UnpackArgs),
    /// Decode a packet and print its layout without extracting.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Pack(args) => pack::run(args, format),
        Command::Unpack(args) => unpack::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Payload text.
    #[arg(long, conflicts_with_all = ["file", "hex"])]
    pub data: Option<String>,
    /// Payload as hex digits (whitespace allowed).
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read the payload from a file. Defaults to stdin when no payload
    /// argument is given.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Write the packet to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// File holding packet bytes. Defaults to stdin.
    pub input: Option<PathBuf>,
    /// Write the payload(s) to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File holding packet bytes. Defaults to stdin.
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print extended build information.
    #[arg(long)]
    pub extended: bool,
}
