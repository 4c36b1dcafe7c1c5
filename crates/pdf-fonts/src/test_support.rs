//! Hand-built minimal TrueType bytes for tests that need a real
//! `ttf_parser::Face` without a shipped font fixture file.
//!
//! The synthetic font defines four glyphs (.notdef, space, 'A', 'a') with
//! empty outlines — enough to exercise cmap lookup and hmtx-derived
//! advance widths, which is all this crate's glyph-level code touches.

pub const GID_SPACE: u16 = 1;
pub const GID_A: u16 = 2;
pub const GID_LOWER_A: u16 = 3;

const ADVANCES: [u16; 4] = [0, 569, 1366, 1138]; // .notdef, space, A, a
const UNITS_PER_EM: u16 = 2048;

pub fn synthetic_ttf() -> Vec<u8> {
    let tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
        (b"cmap", build_cmap()),
        (b"glyf", Vec::new()),
        (b"head", build_head()),
        (b"hhea", build_hhea(ADVANCES.len() as u16)),
        (b"hmtx", build_hmtx(&ADVANCES)),
        (b"loca", build_loca(ADVANCES.len())),
        (b"maxp", build_maxp(ADVANCES.len() as u16)),
    ];
    build_sfnt(&tables)
}

/// Same as [`synthetic_ttf`] but with a `fpgm`/`prep`/`cvt ` hinting
/// program tacked on, for exercising hinting-table stripping.
pub fn synthetic_ttf_with_hinting() -> Vec<u8> {
    let tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
        (b"cmap", build_cmap()),
        (b"cvt ", vec![0u8; 8]),
        (b"fpgm", vec![0x40, 0x00, 0x1D, 0x2C]),
        (b"glyf", Vec::new()),
        (b"head", build_head()),
        (b"hhea", build_hhea(ADVANCES.len() as u16)),
        (b"hmtx", build_hmtx(&ADVANCES)),
        (b"loca", build_loca(ADVANCES.len())),
        (b"maxp", build_maxp(ADVANCES.len() as u16)),
        (b"prep", vec![0xB0, 0x2C, 0x2C]),
    ];
    build_sfnt(&tables)
}

fn search_params(count: u16, unit: u16) -> (u16, u16, u16) {
    let mut entry_selector = 0u16;
    while (1u16 << (entry_selector + 1)) <= count {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * unit;
    let range_shift = count * unit - search_range;
    (search_range, entry_selector, range_shift)
}

fn build_sfnt(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let (search_range, entry_selector, range_shift) = search_params(num_tables, 16);

    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let header_len = 12 + 16 * tables.len();
    let mut offset = header_len;
    let mut directory = Vec::new();
    let mut data = Vec::new();
    for (tag, bytes) in tables {
        let len = bytes.len();
        directory.extend_from_slice(*tag);
        directory.extend_from_slice(&0u32.to_be_bytes());
        directory.extend_from_slice(&(offset as u32).to_be_bytes());
        directory.extend_from_slice(&(len as u32).to_be_bytes());

        data.extend_from_slice(bytes);
        let padded = (len + 3) & !3;
        data.resize(data.len() + (padded - len), 0);
        offset += padded;
    }

    out.extend_from_slice(&directory);
    out.extend_from_slice(&data);
    out
}

fn build_head() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
    out.extend_from_slice(&0u32.to_be_bytes()); // checkSumAdjustment
    out.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magicNumber
    out.extend_from_slice(&0u16.to_be_bytes()); // flags
    out.extend_from_slice(&UNITS_PER_EM.to_be_bytes());
    out.extend_from_slice(&0i64.to_be_bytes()); // created
    out.extend_from_slice(&0i64.to_be_bytes()); // modified
    out.extend_from_slice(&0i16.to_be_bytes()); // xMin
    out.extend_from_slice(&(-500i16).to_be_bytes()); // yMin
    out.extend_from_slice(&1000i16.to_be_bytes()); // xMax
    out.extend_from_slice(&1500i16.to_be_bytes()); // yMax
    out.extend_from_slice(&0u16.to_be_bytes()); // macStyle
    out.extend_from_slice(&8u16.to_be_bytes()); // lowestRecPPEM
    out.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
    out.extend_from_slice(&0i16.to_be_bytes()); // indexToLocFormat (short)
    out.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
    out
}

fn build_hhea(num_h_metrics: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&1900i16.to_be_bytes()); // ascender
    out.extend_from_slice(&(-500i16).to_be_bytes()); // descender
    out.extend_from_slice(&0i16.to_be_bytes()); // lineGap
    out.extend_from_slice(&1400u16.to_be_bytes()); // advanceWidthMax
    out.extend_from_slice(&0i16.to_be_bytes());
    out.extend_from_slice(&0i16.to_be_bytes());
    out.extend_from_slice(&1000i16.to_be_bytes()); // xMaxExtent
    out.extend_from_slice(&1i16.to_be_bytes()); // caretSlopeRise
    out.extend_from_slice(&0i16.to_be_bytes()); // caretSlopeRun
    out.extend_from_slice(&0i16.to_be_bytes()); // caretOffset
    for _ in 0..4 {
        out.extend_from_slice(&0i16.to_be_bytes()); // reserved
    }
    out.extend_from_slice(&0i16.to_be_bytes()); // metricDataFormat
    out.extend_from_slice(&num_h_metrics.to_be_bytes());
    out
}

fn build_maxp(num_glyphs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&num_glyphs.to_be_bytes());
    out.resize(out.len() + 13 * 2, 0);
    out
}

fn build_hmtx(advances: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    for &adv in advances {
        out.extend_from_slice(&adv.to_be_bytes());
        out.extend_from_slice(&0i16.to_be_bytes()); // lsb
    }
    out
}

fn build_loca(num_glyphs: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for _ in 0..=num_glyphs {
        out.extend_from_slice(&0u16.to_be_bytes());
    }
    out
}

fn build_cmap() -> Vec<u8> {
    let segments: [(u16, u16, i16, u16); 4] = [
        (0x20, 0x20, GID_SPACE as i16 - 0x20, 0),
        (0x41, 0x41, GID_A as i16 - 0x41, 0),
        (0x61, 0x61, GID_LOWER_A as i16 - 0x61, 0),
        (0xFFFF, 0xFFFF, 1, 0),
    ];
    let seg_count = segments.len() as u16;
    let (search_range, entry_selector, range_shift) = search_params(seg_count, 2);

    let mut sub = Vec::new();
    sub.extend_from_slice(&4u16.to_be_bytes()); // format
    let length_at = sub.len();
    sub.extend_from_slice(&0u16.to_be_bytes()); // length, patched below
    sub.extend_from_slice(&0u16.to_be_bytes()); // language
    sub.extend_from_slice(&(seg_count * 2).to_be_bytes());
    sub.extend_from_slice(&search_range.to_be_bytes());
    sub.extend_from_slice(&entry_selector.to_be_bytes());
    sub.extend_from_slice(&range_shift.to_be_bytes());
    for &(_, end, _, _) in &segments {
        sub.extend_from_slice(&end.to_be_bytes());
    }
    sub.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
    for &(start, _, _, _) in &segments {
        sub.extend_from_slice(&start.to_be_bytes());
    }
    for &(_, _, delta, _) in &segments {
        sub.extend_from_slice(&(delta as u16).to_be_bytes());
    }
    for &(_, _, _, range_offset) in &segments {
        sub.extend_from_slice(&range_offset.to_be_bytes());
    }
    let sub_len = sub.len() as u16;
    sub[length_at..length_at + 2].copy_from_slice(&sub_len.to_be_bytes());

    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_be_bytes()); // version
    out.extend_from_slice(&1u16.to_be_bytes()); // numTables
    out.extend_from_slice(&3u16.to_be_bytes()); // platformID: Windows
    out.extend_from_slice(&1u16.to_be_bytes()); // encodingID: BMP Unicode
    out.extend_from_slice(&12u32.to_be_bytes()); // subtable offset
    out.extend_from_slice(&sub);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_parser::Face;

    #[test]
    fn synthetic_font_parses_and_maps_ascii() {
        let bytes = synthetic_ttf();
        let face = Face::parse(&bytes, 0).expect("synthetic font must parse");
        assert_eq!(face.glyph_index('A').unwrap().0, GID_A);
        assert_eq!(face.glyph_index('a').unwrap().0, GID_LOWER_A);
        assert_eq!(face.glyph_index(' ').unwrap().0, GID_SPACE);
    }
}
