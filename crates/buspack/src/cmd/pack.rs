use std::fs;
use std::io::Read;

use buspack_frame::{Packer, MAX_PAYLOAD};

use crate::cmd::PackArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: PackArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;

    let mut packer = Packer::new();
    let accepted = packer.write_bytes(&payload);
    if accepted < payload.len() {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "payload too large ({} bytes, max {MAX_PAYLOAD})",
                payload.len()
            ),
        ));
    }
    packer.close();

    let mut frame = Vec::with_capacity(packer.packet_length());
    while let Some(byte) = packer.read() {
        frame.push(byte);
    }

    tracing::debug!(payload = payload.len(), frame = frame.len(), "packed frame");

    if let Some(path) = &args.out {
        fs::write(path, &frame)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
        return Ok(SUCCESS);
    }

    print_packet(&frame, &payload, format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &PackArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }

    let mut payload = Vec::new();
    std::io::stdin()
        .read_to_end(&mut payload)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(payload)
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "--hex needs an even number of digits"));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex digits: {input}")))
        })
        .collect()
}
