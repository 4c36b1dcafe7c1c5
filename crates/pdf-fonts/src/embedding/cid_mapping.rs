//! CID-to-GID mapping construction by scanning a font's cmap table.

use std::collections::BTreeMap;
use ttf_parser::Face;

use super::constants::BMP_MAX_CODEPOINT;

/// CID to GID mapping type (Unicode codepoint -> glyph ID).
pub type CidToGidMap = BTreeMap<u32, u16>;

/// Builds a CID->GID mapping by scanning the font's cmap table.
///
/// For Identity-H encoding, CID = Unicode codepoint, so this walks every
/// codepoint in the Basic Multilingual Plane and records the ones the font
/// actually has a glyph for.
pub fn build_cid_mapping_from_font(face: &Face) -> CidToGidMap {
    let mut mapping = BTreeMap::new();
    mapping.insert(0u32, 0u16); // .notdef

    for codepoint in 0x0001..=BMP_MAX_CODEPOINT {
        if let Some(ch) = char::from_u32(codepoint) {
            if let Some(glyph_id) = face.glyph_index(ch) {
                mapping.insert(codepoint, glyph_id.0);
            }
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{synthetic_ttf, GID_A, GID_LOWER_A, GID_SPACE};

    #[test]
    fn mapping_always_includes_notdef() {
        let bytes = synthetic_ttf();
        let face = Face::parse(&bytes, 0).unwrap();
        let mapping = build_cid_mapping_from_font(&face);
        assert_eq!(mapping.get(&0), Some(&0));
    }

    #[test]
    fn mapping_covers_every_cmap_entry_in_the_font() {
        let bytes = synthetic_ttf();
        let face = Face::parse(&bytes, 0).unwrap();
        let mapping = build_cid_mapping_from_font(&face);
        assert_eq!(mapping.get(&0x41), Some(&GID_A));
        assert_eq!(mapping.get(&0x61), Some(&GID_LOWER_A));
        assert_eq!(mapping.get(&0x20), Some(&GID_SPACE));
    }
}
