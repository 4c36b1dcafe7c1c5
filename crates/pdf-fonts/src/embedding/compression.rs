//! Zlib compression for embedded font programs and generated CMap streams.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Compresses bytes using zlib (FlateDecode in PDF terminology).
pub fn compress_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .expect("writing to an in-memory buffer cannot fail");
    encoder
        .finish()
        .expect("zlib finish on an in-memory buffer cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compresses_nonempty_input() {
        let compressed = compress_bytes(b"Hello, World!");
        assert!(!compressed.is_empty());
    }

    #[test]
    fn compresses_empty_input() {
        let compressed = compress_bytes(&[]);
        assert!(!compressed.is_empty());
    }

    #[test]
    fn compresses_repetitive_data_smaller_than_input() {
        let data: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();
        let compressed = compress_bytes(&data);
        assert!(compressed.len() < data.len());
    }
}
