//! TrueType font embedding for PDF, following ISO 32000-2's Type 0
//! composite-font path: a Type0 font wraps a CIDFontType2 descendant,
//! which in turn references a FontFile2, an optional CIDToGIDMap, and a
//! ToUnicode CMap.

mod cid_font;
mod cid_mapping;
mod compression;
mod constants;
mod pdf_objects;
mod to_unicode;

use pdf_core::object::ObjectId;
use pdf_core::registry::ObjectRegistry;
use std::collections::BTreeMap;
use ttf_parser::Face;

pub use cid_mapping::CidToGidMap;

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("failed to parse font: {0}")]
    ParseError(String),
    #[error("failed to extract font metrics: {0}")]
    MetricsError(String),
    #[error("failed to create PDF object: {0}")]
    PDFError(String),
    #[error("font embedding not supported for this font type")]
    UnsupportedFont,
}

pub struct EmbeddedFont {
    pub resource_name: String,
    pub font_id: ObjectId,
    pub family: String,
    pub weight: u16,
    pub is_italic: bool,
}

/// Sniffs the magic bytes of an incoming font program and decompresses
/// WOFF to raw TrueType before running [`embed_truetype_font`], so callers
/// feeding in a web font don't need to convert out-of-band first. WOFF2
/// (Brotli-compressed) programs are rejected rather than silently treated
/// as raw TrueType.
pub fn embed_font_program(
    registry: &mut ObjectRegistry,
    program_bytes: &[u8],
    font_name: &str,
    weight: u16,
    is_italic: bool,
    cid_mapping: Option<&BTreeMap<u32, u16>>,
) -> Result<EmbeddedFont, EmbedError> {
    let sniffed = match program_bytes.get(0..4) {
        Some(b"wOFF") => crate::woff::decompress_woff(program_bytes)
            .map_err(|e| EmbedError::ParseError(e.to_string()))?,
        Some(b"wOF2") => {
            return Err(EmbedError::ParseError(
                "WOFF2 font programs are not supported".to_string(),
            ))
        }
        _ => program_bytes.to_vec(),
    };
    embed_truetype_font(registry, &sniffed, font_name, weight, is_italic, cid_mapping)
}

/// Embeds a TrueType font program as a Type0/CIDFontType2 composite font.
///
/// `cid_mapping` supplies the CID->GID map to use (the caller passes one
/// built by the subsetter when the font bytes have already been
/// subsetted); when absent, a mapping covering every glyph the font's
/// cmap resolves is built and the font is embedded in full.
pub fn embed_truetype_font(
    registry: &mut ObjectRegistry,
    font_bytes: &[u8],
    font_name: &str,
    weight: u16,
    is_italic: bool,
    cid_mapping: Option<&BTreeMap<u32, u16>>,
) -> Result<EmbeddedFont, EmbedError> {
    let face =
        Face::parse(font_bytes, 0).map_err(|e| EmbedError::ParseError(format!("{:?}", e)))?;

    let is_subsetted = cid_mapping.is_some();
    let owned_mapping;
    let cid_to_gid = match cid_mapping {
        Some(mapping) => mapping,
        None => {
            owned_mapping = cid_mapping::build_cid_mapping_from_font(&face);
            &owned_mapping
        }
    };

    let base_ps_name = pdf_objects::generate_postscript_name(font_name, weight, is_italic);
    let ps_font_name = if is_subsetted {
        format!("{}+{}", pdf_objects::generate_subset_prefix(), base_ps_name)
    } else {
        base_ps_name
    };

    let font_file_id = pdf_objects::create_font_file_stream(registry, font_bytes)?;
    let cid_set_id = if is_subsetted {
        Some(cid_font::create_cid_set_stream(registry, cid_to_gid)?)
    } else {
        None
    };
    let font_descriptor_id =
        pdf_objects::create_font_descriptor(registry, &ps_font_name, &face, font_file_id, cid_set_id)?;
    let to_unicode_id = to_unicode::create_to_unicode_cmap(registry, cid_to_gid)?;
    let cid_font_id =
        cid_font::create_cid_font(registry, &ps_font_name, font_descriptor_id, &face, cid_to_gid)?;
    let font_id = pdf_objects::create_type0_font(registry, &ps_font_name, cid_font_id, to_unicode_id)?;

    Ok(EmbeddedFont {
        resource_name: format!("F{}", font_id.0),
        font_id,
        family: font_name.to_string(),
        weight,
        is_italic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_ttf;
    use pdf_core::xref::XRefTable;

    fn empty_registry() -> ObjectRegistry {
        ObjectRegistry::new(Vec::new(), XRefTable::default())
    }

    #[test]
    fn embeds_full_font_as_type0_composite() {
        let font = synthetic_ttf();
        let mut registry = empty_registry();

        let embedded =
            embed_truetype_font(&mut registry, &font, "Roboto", 400, false, None).unwrap();

        assert_eq!(embedded.family, "Roboto");
        assert_eq!(embedded.weight, 400);
        assert!(!embedded.is_italic);

        let font_obj = registry.resolve(embedded.font_id).unwrap();
        let dict = font_obj.as_dict().unwrap();
        assert_eq!(dict.get_name(b"Subtype"), Some(&b"Type0"[..]));
        assert_eq!(dict.get_name(b"BaseFont"), Some(b"Roboto-Regular".as_slice()));
    }

    #[test]
    fn embeds_with_custom_subset_mapping_and_adds_cid_set() {
        let font = synthetic_ttf();
        let mut registry = empty_registry();
        let mut mapping = BTreeMap::new();
        mapping.insert(0u32, 0u16);
        mapping.insert(0x41, 2u16);

        let embedded =
            embed_truetype_font(&mut registry, &font, "Roboto", 700, true, Some(&mapping))
                .unwrap();

        let font_obj = registry.resolve(embedded.font_id).unwrap();
        let base_font = font_obj.as_dict().unwrap().get_name(b"BaseFont").unwrap();
        assert!(base_font.ends_with(b"+Roboto-BoldItalic"));

        let descendants = font_obj
            .as_dict()
            .unwrap()
            .get_array(b"DescendantFonts")
            .unwrap();
        let cid_font_id = descendants[0].as_reference().unwrap();
        let cid_font = registry.resolve(cid_font_id).unwrap();
        assert!(cid_font.as_dict().unwrap().get(b"FontDescriptor").is_some());
    }

    #[test]
    fn rejects_invalid_font_bytes() {
        let mut registry = empty_registry();
        let result = embed_truetype_font(&mut registry, b"not a font", "X", 400, false, None);
        assert!(matches!(result, Err(EmbedError::ParseError(_))));
    }
}
