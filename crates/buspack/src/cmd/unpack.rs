use std::fs;
use std::io::Read;
use std::path::PathBuf;

use buspack_frame::decode_frame;
use bytes::BytesMut;

use crate::cmd::UnpackArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_payload, OutputFormat};

pub fn run(args: UnpackArgs, format: OutputFormat) -> CliResult<i32> {
    let mut buf = BytesMut::from(read_input(args.input.as_ref())?.as_slice());

    let mut payloads = Vec::new();
    loop {
        match decode_frame(&mut buf) {
            Ok(Some(payload)) => payloads.push(payload),
            Ok(None) => break,
            Err(err) => return Err(frame_error("decode failed", err)),
        }
    }

    if !buf.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!("trailing incomplete frame ({} bytes)", buf.len()),
        ));
    }
    if payloads.is_empty() {
        return Err(CliError::new(DATA_INVALID, "input holds no frames"));
    }

    tracing::debug!(frames = payloads.len(), "unpacked input");

    if let Some(path) = &args.out {
        let joined: Vec<u8> = payloads.iter().flat_map(|p| p.iter().copied()).collect();
        fs::write(path, joined)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
        return Ok(SUCCESS);
    }

    for (index, payload) in payloads.iter().enumerate() {
        print_payload(payload, index, format);
    }
    Ok(SUCCESS)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(tag: &str, contents: &[u8]) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("buspack-unpack-{tag}-{}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn unpacks_two_frames() {
        let mut wire = BytesMut::new();
        buspack_frame::encode_frame(b"one", &mut wire).unwrap();
        buspack_frame::encode_frame(b"two", &mut wire).unwrap();
        let path = temp_file("two-frames", &wire);

        let args = UnpackArgs {
            input: Some(path.clone()),
            out: None,
        };
        assert_eq!(run(args, OutputFormat::Pretty).unwrap(), SUCCESS);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_input_exits_data_invalid() {
        let path = temp_file("corrupt", &[0xFF, 0x00, 0x01]);

        let args = UnpackArgs {
            input: Some(path.clone()),
            out: None,
        };
        let err = run(args, OutputFormat::Pretty).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn truncated_input_exits_data_invalid() {
        let mut wire = BytesMut::new();
        buspack_frame::encode_frame(b"cut", &mut wire).unwrap();
        let path = temp_file("truncated", &wire[..wire.len() - 2]);

        let args = UnpackArgs {
            input: Some(path.clone()),
            out: None,
        };
        let err = run(args, OutputFormat::Pretty).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("incomplete"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn out_file_receives_payload() {
        let mut wire = BytesMut::new();
        buspack_frame::encode_frame(b"to-disk", &mut wire).unwrap();
        let input = temp_file("out-in", &wire);
        let output =
            std::env::temp_dir().join(format!("buspack-unpack-out-{}", std::process::id()));

        let args = UnpackArgs {
            input: Some(input.clone()),
            out: Some(output.clone()),
        };
        assert_eq!(run(args, OutputFormat::Raw).unwrap(), SUCCESS);
        assert_eq!(fs::read(&output).unwrap(), b"to-disk");
        let _ = fs::remove_file(input);
        let _ = fs::remove_file(output);
    }
}
