//! Build a frame with the packer, push it over an in-memory link one byte
//! at a time, and recover the payload on the other side.

use buspack::frame::{FrameReader, Packer};

fn main() {
    let mut packer = Packer::new();
    packer.write_bytes(b"hello from the sending peer");
    packer.close();

    // The transport sees the frame strictly byte-by-byte.
    let mut link = Vec::new();
    while let Some(byte) = packer.read() {
        link.push(byte);
    }
    println!("wire: {} bytes", link.len());

    let mut reader = FrameReader::new(std::io::Cursor::new(link));
    let payload = reader.read_frame().expect("frame should decode");
    println!("payload: {}", String::from_utf8_lossy(&payload));
}
