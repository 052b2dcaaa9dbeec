use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Raw
        }
    }
}

#[derive(Serialize)]
struct PacketOutput {
    frame_size: usize,
    payload_size: usize,
    frame_hex: String,
    payload: String,
}

/// Print a finished frame: raw bytes for pipelines, a summary otherwise.
pub fn print_packet(frame: &[u8], payload: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                frame_size: frame.len(),
                payload_size: payload.len(),
                frame_hex: hex_string(frame),
                payload: payload_preview(payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FRAME", "PAYLOAD", "BYTES"])
                .add_row(vec![
                    frame.len().to_string(),
                    payload.len().to_string(),
                    hex_string(frame),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} payload={} bytes={}",
                frame.len(),
                payload.len(),
                hex_string(frame)
            );
        }
        OutputFormat::Raw => {
            print_raw(frame);
        }
    }
}

#[derive(Serialize)]
struct PayloadOutput {
    index: usize,
    payload_size: usize,
    payload: String,
}

/// Print one decoded payload.
pub fn print_payload(payload: &[u8], index: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PayloadOutput {
                index,
                payload_size: payload.len(),
                payload: payload_preview(payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    index.to_string(),
                    payload.len().to_string(),
                    payload_preview(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame {} size={} payload={}",
                index,
                payload.len(),
                payload_preview(payload)
            );
        }
        OutputFormat::Raw => {
            print_raw(payload);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if text.chars().all(|c| !c.is_control()) => text.to_string(),
        _ => format!("<binary {} bytes>", payload.len()),
    }
}
