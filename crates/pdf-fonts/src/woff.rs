//! WOFF decompression: unwraps a web font's zlib-compressed TrueType tables
//! back into a plain sfnt binary so [`crate::embedding`] can embed it.
//!
//! Reference: <https://www.w3.org/TR/WOFF/>

use flate2::read::ZlibDecoder;
use std::io::Read;
use thiserror::Error;

const WOFF_MAGIC: u32 = 0x774F4646;

/// Above this decompressed size, refuse rather than keep inflating; guards
/// against a hostile WOFF claiming a tiny compressed size but an enormous
/// `origLength`.
pub const DEFAULT_MAX_FONT_SIZE: usize = 2 * 1024 * 1024;

type DecompressedTables = Vec<([u8; 4], Vec<u8>)>;

fn format_hex_dump(bytes: &[u8], max_bytes: usize) -> String {
    bytes[..max_bytes.min(bytes.len())]
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Error, Debug)]
pub enum WoffError {
    #[error("invalid WOFF file: {0}")]
    InvalidFormat(String),
    #[error("decompression failed: {0}")]
    DecompressionError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("font too large after decompression: {0} bytes (max {1} bytes)")]
    FontTooLarge(usize, usize),
}

#[derive(Debug, Clone)]
struct WoffTableEntry {
    tag: [u8; 4],
    offset: u32,
    comp_length: u32,
    orig_length: u32,
}

/// Parses the 44-byte WOFF header, returning the sfnt flavor and table count.
fn parse_woff_header(woff_bytes: &[u8]) -> Result<(u32, usize), WoffError> {
    if woff_bytes.len() < 44 {
        return Err(WoffError::InvalidFormat(format!(
            "file too small: {} bytes (need at least 44). header: {}",
            woff_bytes.len(),
            format_hex_dump(woff_bytes, 16)
        )));
    }

    let magic = u32::from_be_bytes([woff_bytes[0], woff_bytes[1], woff_bytes[2], woff_bytes[3]]);
    if magic != WOFF_MAGIC {
        return Err(WoffError::InvalidFormat(format!(
            "bad magic 0x{:08X} (expected 0x{:08X}). header: {}",
            magic,
            WOFF_MAGIC,
            format_hex_dump(woff_bytes, 16)
        )));
    }

    let flavor = u32::from_be_bytes([woff_bytes[4], woff_bytes[5], woff_bytes[6], woff_bytes[7]]);
    let num_tables = u16::from_be_bytes([woff_bytes[12], woff_bytes[13]]) as usize;
    if num_tables == 0 {
        return Err(WoffError::InvalidFormat("0 tables in directory".to_string()));
    }

    Ok((flavor, num_tables))
}

fn read_table_directory(
    woff_bytes: &[u8],
    num_tables: usize,
) -> Result<Vec<WoffTableEntry>, WoffError> {
    let mut tables = Vec::with_capacity(num_tables);
    let mut offset = 44;

    for i in 0..num_tables {
        if offset + 20 > woff_bytes.len() {
            return Err(WoffError::InvalidFormat(format!(
                "table directory entry {} extends past end of file (offset {}, file size {})",
                i,
                offset,
                woff_bytes.len()
            )));
        }

        let tag = [
            woff_bytes[offset],
            woff_bytes[offset + 1],
            woff_bytes[offset + 2],
            woff_bytes[offset + 3],
        ];
        let table_offset = u32::from_be_bytes([
            woff_bytes[offset + 4],
            woff_bytes[offset + 5],
            woff_bytes[offset + 6],
            woff_bytes[offset + 7],
        ]);
        let comp_length = u32::from_be_bytes([
            woff_bytes[offset + 8],
            woff_bytes[offset + 9],
            woff_bytes[offset + 10],
            woff_bytes[offset + 11],
        ]);
        let orig_length = u32::from_be_bytes([
            woff_bytes[offset + 12],
            woff_bytes[offset + 13],
            woff_bytes[offset + 14],
            woff_bytes[offset + 15],
        ]);
        // origChecksum (bytes 16..20) isn't needed: build_truetype_font
        // recomputes table checksums from the decompressed data directly.

        tables.push(WoffTableEntry {
            tag,
            offset: table_offset,
            comp_length,
            orig_length,
        });

        offset += 20;
    }

    Ok(tables)
}

fn decompress_tables(
    woff_bytes: &[u8],
    tables: &[WoffTableEntry],
    max_size: Option<usize>,
) -> Result<DecompressedTables, WoffError> {
    let mut decompressed = Vec::with_capacity(tables.len());
    let mut total_size = 0usize;

    for table in tables {
        let offset = table.offset as usize;
        let comp_len = table.comp_length as usize;
        let orig_len = table.orig_length as usize;

        if offset + comp_len > woff_bytes.len() {
            return Err(WoffError::InvalidFormat(format!(
                "table '{}' extends past end of file (offset {}, compressed length {}, file size {})",
                String::from_utf8_lossy(&table.tag),
                offset,
                comp_len,
                woff_bytes.len()
            )));
        }

        // A table whose stored length already equals its compressed length
        // was left uncompressed by the encoder (WOFF permits this per-table).
        let table_data = if comp_len < orig_len {
            let compressed = &woff_bytes[offset..offset + comp_len];
            let mut decoder = ZlibDecoder::new(compressed);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out).map_err(|e| {
                WoffError::DecompressionError(format!(
                    "table '{}' ({} -> {} bytes): {}",
                    String::from_utf8_lossy(&table.tag),
                    comp_len,
                    orig_len,
                    e
                ))
            })?;

            if out.len() != orig_len {
                return Err(WoffError::DecompressionError(format!(
                    "table '{}' size mismatch after decompression: got {} bytes, directory claimed {}",
                    String::from_utf8_lossy(&table.tag),
                    out.len(),
                    orig_len
                )));
            }
            out
        } else {
            woff_bytes[offset..offset + comp_len].to_vec()
        };

        total_size += table_data.len();
        if let Some(max) = max_size {
            if total_size > max {
                return Err(WoffError::FontTooLarge(total_size, max));
            }
        }

        decompressed.push((table.tag, table_data));
    }

    Ok(decompressed)
}

/// Decompresses a WOFF font to a plain sfnt TrueType binary, refusing to
/// inflate past `max_size` bytes total. Pass `None` to disable the limit.
pub fn decompress_woff_with_limit(
    woff_bytes: &[u8],
    max_size: Option<usize>,
) -> Result<Vec<u8>, WoffError> {
    let (flavor, num_tables) = parse_woff_header(woff_bytes)?;
    let tables = read_table_directory(woff_bytes, num_tables)?;
    let decompressed_tables = decompress_tables(woff_bytes, &tables, max_size)?;
    let ttf_bytes = build_truetype_font(flavor, &decompressed_tables)?;
    validate_truetype_font(&ttf_bytes)?;
    Ok(ttf_bytes)
}

/// [`decompress_woff_with_limit`] with the [`DEFAULT_MAX_FONT_SIZE`] cap.
pub fn decompress_woff(woff_bytes: &[u8]) -> Result<Vec<u8>, WoffError> {
    decompress_woff_with_limit(woff_bytes, Some(DEFAULT_MAX_FONT_SIZE))
}

/// Reassembles an sfnt binary (header + table directory + 4-byte-aligned
/// table data) from the decompressed tables, per the TrueType spec.
fn build_truetype_font(flavor: u32, tables: &[([u8; 4], Vec<u8>)]) -> Result<Vec<u8>, WoffError> {
    let num_tables = tables.len();

    let entry_selector = (num_tables as f64).log2().floor() as u16;
    let search_range = (2u16.pow(entry_selector as u32)) * 16;
    let range_shift = (num_tables as u16 * 16) - search_range;

    let table_dir_size = 12 + (num_tables * 16);
    let mut data_offset = table_dir_size;

    let mut padded_sizes = Vec::with_capacity(num_tables);
    for (_, data) in tables {
        let padded_size = (data.len() + 3) & !3;
        padded_sizes.push(padded_size);
        data_offset += padded_size;
    }

    let mut output = vec![0u8; data_offset];

    output[0..4].copy_from_slice(&flavor.to_be_bytes());
    output[4..6].copy_from_slice(&(num_tables as u16).to_be_bytes());
    output[6..8].copy_from_slice(&search_range.to_be_bytes());
    output[8..10].copy_from_slice(&entry_selector.to_be_bytes());
    output[10..12].copy_from_slice(&range_shift.to_be_bytes());

    let mut current_data_offset = table_dir_size;
    for (i, (tag, data)) in tables.iter().enumerate() {
        let entry_offset = 12 + (i * 16);
        let checksum = calculate_checksum(data);

        output[entry_offset..entry_offset + 4].copy_from_slice(tag);
        output[entry_offset + 4..entry_offset + 8].copy_from_slice(&checksum.to_be_bytes());
        output[entry_offset + 8..entry_offset + 12]
            .copy_from_slice(&(current_data_offset as u32).to_be_bytes());
        output[entry_offset + 12..entry_offset + 16]
            .copy_from_slice(&(data.len() as u32).to_be_bytes());

        output[current_data_offset..current_data_offset + data.len()].copy_from_slice(data);
        current_data_offset += padded_sizes[i];
    }

    Ok(output)
}

#[inline]
fn calculate_checksum(data: &[u8]) -> u32 {
    let mut sum: u32 = 0;
    let mut i = 0;
    while i + 3 < data.len() {
        let chunk = u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
        sum = sum.wrapping_add(chunk);
        i += 4;
    }
    if i < data.len() {
        let mut last_chunk = [0u8; 4];
        for (j, byte) in data[i..].iter().enumerate() {
            last_chunk[j] = *byte;
        }
        sum = sum.wrapping_add(u32::from_be_bytes(last_chunk));
    }
    sum
}

/// Re-parses the reassembled sfnt with `ttf-parser` and rejects fonts that
/// would be useless for text layout: no glyphs, no horizontal metrics, or
/// no cmap entry for any of A/a/0/space.
fn validate_truetype_font(ttf_bytes: &[u8]) -> Result<(), WoffError> {
    let face = ttf_parser::Face::parse(ttf_bytes, 0).map_err(|err| {
        WoffError::InvalidFormat(format!("rebuilt font is not valid TrueType: {}", err))
    })?;

    if face.number_of_glyphs() == 0 {
        return Err(WoffError::InvalidFormat("font has no glyphs".to_string()));
    }
    if face.glyph_hor_advance(ttf_parser::GlyphId(0)).is_none() {
        return Err(WoffError::InvalidFormat(
            "font is missing horizontal metrics (hmtx)".to_string(),
        ));
    }
    let has_mappings = face.glyph_index('A').is_some()
        || face.glyph_index('a').is_some()
        || face.glyph_index('0').is_some()
        || face.glyph_index(' ').is_some();
    if !has_mappings {
        return Err(WoffError::InvalidFormat(
            "font's cmap has no entries for common characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn woff_header(num_tables: u16) -> Vec<u8> {
        let mut bytes = vec![
            0x77, 0x4F, 0x46, 0x46, // magic
            0x00, 0x01, 0x00, 0x00, // flavor: TrueType
            0x00, 0x00, 0x00, 0x64, // length
        ];
        bytes.extend(num_tables.to_be_bytes());
        bytes.extend(vec![0; 30]);
        bytes
    }

    #[test]
    fn parses_header_fields() {
        let bytes = woff_header(3);
        let (flavor, num_tables) = parse_woff_header(&bytes).unwrap();
        assert_eq!(flavor, 0x00010000);
        assert_eq!(num_tables, 3);
    }

    #[test]
    fn rejects_short_header() {
        let small_bytes = vec![0x77, 0x4F, 0x46, 0x46];
        assert!(matches!(
            parse_woff_header(&small_bytes),
            Err(WoffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
        bytes.extend(vec![0; 40]);
        let err = parse_woff_header(&bytes).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn rejects_zero_tables() {
        let bytes = woff_header(0);
        assert!(matches!(
            parse_woff_header(&bytes),
            Err(WoffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn reads_multiple_table_entries() {
        let mut bytes = woff_header(2);
        bytes.extend([0x68, 0x65, 0x61, 0x64, 0, 0, 0, 0x64, 0, 0, 0, 0x20, 0, 0, 0, 0x36, 0, 0, 0, 0]);
        bytes.extend([0x6E, 0x61, 0x6D, 0x65, 0, 0, 0, 0x84, 0, 0, 0, 0x40, 0, 0, 0, 0x50, 0, 0, 0, 0]);

        let tables = read_table_directory(&bytes, 2).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(&tables[0].tag, b"head");
        assert_eq!(tables[0].offset, 100);
        assert_eq!(&tables[1].tag, b"name");
    }

    #[test]
    fn rejects_truncated_table_directory() {
        let bytes = woff_header(2);
        assert!(matches!(
            read_table_directory(&bytes, 2),
            Err(WoffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn passes_through_uncompressed_table() {
        let mut bytes = vec![0; 100];
        bytes[64..68].copy_from_slice(b"DATA");
        let tables = vec![WoffTableEntry {
            tag: *b"head",
            offset: 64,
            comp_length: 4,
            orig_length: 4,
        }];
        let decompressed = decompress_tables(&bytes, &tables, None).unwrap();
        assert_eq!(&decompressed[0].1, b"DATA");
    }

    #[test]
    fn refuses_past_size_limit() {
        let mut bytes = vec![0; 100];
        bytes[64..68].copy_from_slice(b"DATA");
        let tables = vec![WoffTableEntry {
            tag: *b"head",
            offset: 64,
            comp_length: 4,
            orig_length: 4,
        }];
        assert!(matches!(
            decompress_tables(&bytes, &tables, Some(2)),
            Err(WoffError::FontTooLarge(..))
        ));
    }

    #[test]
    fn rejects_table_past_end_of_file() {
        let bytes = vec![0; 50];
        let tables = vec![WoffTableEntry {
            tag: *b"head",
            offset: 100,
            comp_length: 10,
            orig_length: 10,
        }];
        assert!(matches!(
            decompress_tables(&bytes, &tables, None),
            Err(WoffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_non_woff_input() {
        let invalid_bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            decompress_woff(&invalid_bytes),
            Err(WoffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn checksum_matches_known_value_and_pads_remainder() {
        assert_eq!(calculate_checksum(&[0x01, 0x02, 0x03, 0x04]), 0x01020304);
        assert_eq!(calculate_checksum(&[0x01, 0x02, 0x03]), 0x01020300);
        assert_eq!(calculate_checksum(&[]), 0);
    }

    #[test]
    fn reports_decompression_failure_on_corrupt_zlib_stream() {
        let mut bytes = woff_header(1);
        bytes.extend([0x68, 0x65, 0x61, 0x64, 0, 0, 0, 0x3C, 0, 0, 0, 0x08, 0, 0, 0, 0x10, 0, 0, 0, 0]);
        bytes.extend([0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

        let result = decompress_woff(&bytes);
        assert!(matches!(result, Err(WoffError::DecompressionError(_))));
    }

    #[test]
    fn reports_size_mismatch_between_directory_and_inflated_data() {
        // zlib-compressed "Hello" (5 bytes inflated), but the table entry
        // below claims origLength 100 to force the mismatch check.
        let mut bytes = woff_header(1);
        bytes.extend([0x74, 0x65, 0x73, 0x74, 0, 0, 0, 0x64, 0, 0, 0, 0x0D, 0, 0, 0, 0x64, 0, 0, 0, 0]);
        bytes.resize(100, 0);
        bytes.extend([0x78, 0x9C, 0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00, 0x05, 0x8C, 0x01, 0xF5]);

        let tables = vec![WoffTableEntry {
            tag: *b"test",
            offset: 100,
            comp_length: 13,
            orig_length: 100,
        }];
        let err = decompress_tables(&bytes, &tables, None).unwrap_err();
        assert!(matches!(err, WoffError::DecompressionError(_)));
        assert!(err.to_string().contains("size mismatch"));
    }

    #[test]
    fn rejects_glyphless_truetype_structure() {
        let invalid_ttf = vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            validate_truetype_font(&invalid_ttf),
            Err(WoffError::InvalidFormat(_))
        ));
    }

    #[test]
    fn hex_dump_formats_and_truncates() {
        let data = vec![0x77, 0x4F, 0x46, 0x46, 0xAB, 0xCD];
        assert_eq!(format_hex_dump(&data, 16), "77 4F 46 46 AB CD");
        assert_eq!(format_hex_dump(&data, 4), "77 4F 46 46");
        assert_eq!(format_hex_dump(&[], 16), "");
    }

    #[test]
    fn error_message_includes_header_dump_for_bad_magic() {
        let mut bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
        bytes.extend(vec![0x00; 44]);
        let err = decompress_woff(&bytes).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DE AD BE EF"));
    }
}
