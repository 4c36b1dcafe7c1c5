//! CIDFont and CIDSet creation for PDF embedding: builds CIDFontType2
//! dictionaries and CIDSet streams for PDF/A compliance.

use pdf_core::dictionary;
use pdf_core::object::{Object, ObjectId, Stream};
use pdf_core::registry::ObjectRegistry;
use std::collections::BTreeMap;
use ttf_parser::Face;

use super::compression::compress_bytes;
use super::constants::{CID_SET_SIZE_BYTES, CID_TO_GID_MAP_SIZE, DEFAULT_GLYPH_WIDTH};
use super::EmbedError;
use crate::truetype::extract_glyph_widths;

/// Creates the CIDFont (descendant font) dictionary.
///
/// Builds the `/W` and `/CIDToGIDMap` entries from `cid_to_gid`, which
/// works the same whether the caller passed a full-font or a subsetted
/// mapping.
pub fn create_cid_font(
    registry: &mut ObjectRegistry,
    font_name: &str,
    font_descriptor_id: ObjectId,
    face: &Face,
    cid_to_gid: &BTreeMap<u32, u16>,
) -> Result<ObjectId, EmbedError> {
    let widths = extract_glyph_widths(face);
    let default_width = widths.first().copied().unwrap_or(DEFAULT_GLYPH_WIDTH) as i64;

    let (w_array, cid_to_gid_map_id) = build_cid_font_data(registry, cid_to_gid, &widths)?;

    let mut cid_font = dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => Object::Name(font_name.as_bytes().to_vec()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => Object::Reference(font_descriptor_id),
        "DW" => default_width,
        "CIDToGIDMap" => Object::Reference(cid_to_gid_map_id),
    };

    cid_font.set(
        "W",
        Object::Array(w_array.into_iter().map(Object::Integer).collect()),
    );

    Ok(registry.register(Object::Dictionary(cid_font)))
}

/// Creates the CIDSet stream for PDF/A-1b compliance: a bitmap where bit
/// `cid % 8` (counting from the high bit) of byte `cid / 8` is set if the
/// CID is present in the embedded font.
pub fn create_cid_set_stream(
    registry: &mut ObjectRegistry,
    cid_to_gid: &BTreeMap<u32, u16>,
) -> Result<ObjectId, EmbedError> {
    let mut cid_set = vec![0u8; CID_SET_SIZE_BYTES];
    cid_set[0] |= 0x80; // CID 0 (.notdef) is always present

    for &cid in cid_to_gid.keys() {
        if cid < 0x10000 {
            let byte_index = (cid / 8) as usize;
            let bit_index = 7 - (cid % 8) as u8;
            if byte_index < cid_set.len() {
                cid_set[byte_index] |= 1 << bit_index;
            }
        }
    }

    let compressed = compress_bytes(&cid_set);
    let stream = Object::Stream(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        compressed,
    ));

    Ok(registry.register(stream))
}

/// Builds the CIDToGIDMap stream (2 bytes per CID, big-endian GID, across
/// the full BMP) and the `/W` widths array.
fn build_cid_font_data(
    registry: &mut ObjectRegistry,
    cid_to_gid: &BTreeMap<u32, u16>,
    glyph_widths: &[u16],
) -> Result<(Vec<i64>, ObjectId), EmbedError> {
    let mut cid_to_gid_data = vec![0u8; CID_TO_GID_MAP_SIZE];

    for (&cid, &gid) in cid_to_gid {
        if cid < 0x10000 {
            let offset = (cid as usize) * 2;
            cid_to_gid_data[offset] = (gid >> 8) as u8;
            cid_to_gid_data[offset + 1] = (gid & 0xFF) as u8;
        }
    }

    let compressed = compress_bytes(&cid_to_gid_data);
    let cid_to_gid_stream = Object::Stream(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        compressed,
    ));
    let cid_to_gid_map_id = registry.register(cid_to_gid_stream);

    let w_array = build_width_array(cid_to_gid, glyph_widths);
    Ok((w_array, cid_to_gid_map_id))
}

/// Builds the `/W` array, grouping consecutive CIDs that share a width
/// into a single `[start end w]` range.
fn build_width_array(cid_to_gid: &BTreeMap<u32, u16>, glyph_widths: &[u16]) -> Vec<i64> {
    let mut entries: Vec<(u32, u16)> = cid_to_gid
        .iter()
        .filter_map(|(&cid, &gid)| {
            let gid_idx = gid as usize;
            glyph_widths.get(gid_idx).map(|&w| (cid, w))
        })
        .collect();
    entries.sort_by_key(|(cid, _)| *cid);

    let mut w_array = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let (start_cid, width) = entries[i];
        let mut end_cid = start_cid;

        while i + 1 < entries.len() {
            let (next_cid, next_width) = entries[i + 1];
            if next_cid == end_cid + 1 && next_width == width {
                end_cid = next_cid;
                i += 1;
            } else {
                break;
            }
        }

        w_array.push(start_cid as i64);
        w_array.push(end_cid as i64);
        w_array.push(width as i64);
        i += 1;
    }

    w_array
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_array_groups_consecutive_equal_widths() {
        let mut mapping = BTreeMap::new();
        mapping.insert(65, 1u16);
        mapping.insert(66, 2u16);
        mapping.insert(67, 3u16);
        let widths = vec![0, 500, 500, 600]; // gid 1,2 share width 500; gid 3 differs
        let w = build_width_array(&mapping, &widths);
        assert_eq!(w, vec![65, 66, 500, 67, 67, 600]);
    }

    #[test]
    fn width_array_skips_cids_whose_gid_has_no_width_entry() {
        let mut mapping = BTreeMap::new();
        mapping.insert(65, 10u16); // out of range for `widths`
        let widths = vec![0, 500];
        let w = build_width_array(&mapping, &widths);
        assert!(w.is_empty());
    }
}
