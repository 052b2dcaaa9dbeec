use std::fs;
use std::io::Read;
use std::path::PathBuf;

use buspack_frame::{Crc8, FrameChecksum, BUFFER_CAPACITY, FRAME_END, FRAME_OVERHEAD, FRAME_START};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::cmd::InspectArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{hex_string, payload_preview, OutputFormat};

#[derive(Serialize)]
struct FrameReport {
    frame_size: usize,
    start_byte: u8,
    start_ok: bool,
    length_field: u8,
    length_ok: bool,
    payload_size: usize,
    payload: String,
    stored_crc: u8,
    computed_crc: u8,
    crc_ok: bool,
    end_byte: u8,
    end_ok: bool,
    valid: bool,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = read_input(args.input.as_ref())?;
    let report = build_report(&bytes)?;
    print_report(&report, &bytes, format);

    if report.valid {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

fn build_report(bytes: &[u8]) -> CliResult<FrameReport> {
    if bytes.len() < FRAME_OVERHEAD {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "input too short to be a frame ({} bytes, min {FRAME_OVERHEAD})",
                bytes.len()
            ),
        ));
    }

    let start_byte = bytes[0];
    let length_field = bytes[1];
    let total = length_field as usize;
    let length_ok = (FRAME_OVERHEAD..=BUFFER_CAPACITY).contains(&total) && total == bytes.len();

    // Field offsets only make sense relative to a trusted length; fall back
    // to the input size when the length field is unusable.
    let effective = if length_ok { total } else { bytes.len() };
    let payload_size = effective - FRAME_OVERHEAD;
    let payload = &bytes[2..2 + payload_size];
    let stored_crc = bytes[effective - 2];
    let end_byte = bytes[effective - 1];

    let mut crc = Crc8::new();
    crc.prime(&[length_field]);
    let computed_crc = crc.update(payload);

    let start_ok = start_byte == FRAME_START;
    let end_ok = end_byte == FRAME_END;
    let crc_ok = computed_crc == stored_crc;

    Ok(FrameReport {
        frame_size: bytes.len(),
        start_byte,
        start_ok,
        length_field,
        length_ok,
        payload_size,
        payload: payload_preview(payload),
        stored_crc,
        computed_crc,
        crc_ok,
        end_byte,
        end_ok,
        valid: start_ok && length_ok && crc_ok && end_ok,
    })
}

fn print_report(report: &FrameReport, bytes: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE", "STATUS"]);
            table.add_row(vec![
                "start".to_string(),
                format!("0x{:02X}", report.start_byte),
                status(report.start_ok),
            ]);
            table.add_row(vec![
                "length".to_string(),
                report.length_field.to_string(),
                status(report.length_ok),
            ]);
            table.add_row(vec![
                "payload".to_string(),
                format!("{} bytes: {}", report.payload_size, report.payload),
                "-".to_string(),
            ]);
            table.add_row(vec![
                "crc".to_string(),
                format!(
                    "stored 0x{:02X}, computed 0x{:02X}",
                    report.stored_crc, report.computed_crc
                ),
                status(report.crc_ok),
            ]);
            table.add_row(vec![
                "end".to_string(),
                format!("0x{:02X}", report.end_byte),
                status(report.end_ok),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} start=0x{:02X}[{}] length={}[{}] payload={} crc=stored 0x{:02X}/computed 0x{:02X}[{}] end=0x{:02X}[{}] valid={}",
                report.frame_size,
                report.start_byte,
                status(report.start_ok),
                report.length_field,
                status(report.length_ok),
                report.payload_size,
                report.stored_crc,
                report.computed_crc,
                status(report.crc_ok),
                report.end_byte,
                status(report.end_ok),
                report.valid,
            );
        }
        OutputFormat::Raw => {
            println!("{}", hex_string(bytes));
        }
    }
}

fn status(ok: bool) -> String {
    if ok { "ok" } else { "BAD" }.to_string()
}

fn read_input(path: Option<&PathBuf>) -> CliResult<Vec<u8>> {
    match path {
        Some(path) => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(bytes)
        }
    }
}
