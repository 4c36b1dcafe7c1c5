//! PDF object construction for font embedding: FontFile2, FontDescriptor,
//! Type0 Font, and PostScript name generation.

use pdf_core::dictionary;
use pdf_core::object::{Object, ObjectId, Stream};
use pdf_core::registry::ObjectRegistry;
use std::sync::atomic::{AtomicU64, Ordering};
use ttf_parser::Face;

use super::compression::compress_bytes;
use super::constants::{
    DEFAULT_STEM_V, FONT_FLAGS_SYMBOLIC, HASH_MULTIPLIER_1, HASH_MULTIPLIER_2, STEM_V_MAX,
    STEM_V_MIN, SUBSET_PREFIX_LENGTH, WEIGHT_BOLD_MIN, WEIGHT_LIGHT_MAX, WEIGHT_MEDIUM_MAX,
    WEIGHT_REGULAR_MAX,
};
use super::EmbedError;

/// Creates a `FontFile2` stream (compressed TrueType bytes).
pub fn create_font_file_stream(
    registry: &mut ObjectRegistry,
    font_bytes: &[u8],
) -> Result<ObjectId, EmbedError> {
    let compressed = compress_bytes(font_bytes);

    let stream = Object::Stream(Stream::new(
        dictionary! {
            "Length1" => font_bytes.len() as i64,
            "Filter" => "FlateDecode",
        },
        compressed,
    ));

    Ok(registry.register(stream))
}

/// Creates a `FontDescriptor` dictionary.
///
/// `cid_set_id`, when present, is a reference to a CIDSet stream (required
/// for PDF/A-1b compliant subsetted CIDFonts).
pub fn create_font_descriptor(
    registry: &mut ObjectRegistry,
    font_name: &str,
    face: &Face,
    font_file_id: ObjectId,
    cid_set_id: Option<ObjectId>,
) -> Result<ObjectId, EmbedError> {
    let bbox = face.global_bounding_box();
    let ascent = face.ascender();
    let descent = face.descender();
    let cap_height = face.capital_height().unwrap_or(ascent);
    let italic_angle = face.italic_angle();
    let stem_v = calculate_stem_v(face);

    let mut descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(font_name.as_bytes().to_vec()),
        "Flags" => FONT_FLAGS_SYMBOLIC,
        "FontBBox" => Object::Array(vec![
            Object::Integer(bbox.x_min as i64),
            Object::Integer(bbox.y_min as i64),
            Object::Integer(bbox.x_max as i64),
            Object::Integer(bbox.y_max as i64),
        ]),
        "ItalicAngle" => Object::Real(italic_angle as f64),
        "Ascent" => Object::Integer(ascent as i64),
        "Descent" => Object::Integer(descent as i64),
        "CapHeight" => Object::Integer(cap_height as i64),
        "StemV" => Object::Integer(stem_v),
        "FontFile2" => Object::Reference(font_file_id),
    };

    if let Some(cid_set) = cid_set_id {
        descriptor.set("CIDSet", Object::Reference(cid_set));
    }

    Ok(registry.register(Object::Dictionary(descriptor)))
}

/// Builds a `FontDescriptor` for a non-subsettable `/FontFile3` program:
/// the program bytes pass through untouched and only its `/Subtype` is
/// recorded, so width/metrics lookups still work without CFF outline
/// parsing.
pub fn create_font_descriptor_for_font_file3(
    registry: &mut ObjectRegistry,
    font_name: &str,
    program_bytes: &[u8],
    subtype: &str,
    flags: i32,
) -> Result<ObjectId, EmbedError> {
    let compressed = compress_bytes(program_bytes);
    let file_stream = Object::Stream(Stream::new(
        dictionary! {
            "Subtype" => Object::name(subtype),
            "Filter" => "FlateDecode",
        },
        compressed,
    ));
    let font_file_id = registry.register(file_stream);

    let descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(font_name.as_bytes().to_vec()),
        "Flags" => flags,
        "FontFile3" => Object::Reference(font_file_id),
    };
    Ok(registry.register(Object::Dictionary(descriptor)))
}

/// Creates a Type 0 Font dictionary (the top-level composite font).
pub fn create_type0_font(
    registry: &mut ObjectRegistry,
    font_name: &str,
    cid_font_id: ObjectId,
    to_unicode_id: ObjectId,
) -> Result<ObjectId, EmbedError> {
    let type0_font = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => Object::Name(font_name.as_bytes().to_vec()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => Object::Array(vec![Object::Reference(cid_font_id)]),
        "ToUnicode" => Object::Reference(to_unicode_id),
    };

    Ok(registry.register(Object::Dictionary(type0_font)))
}

/// Generates a 6-character uppercase subset prefix.
///
/// PDF convention for subsetted fonts prefixes the font name with 6 random
/// uppercase letters followed by `+` (e.g. `ABCDEF+FontName`). Uses a
/// counter and hash mixing rather than system time, since time isn't
/// available in every embedding context (e.g. WASM).
pub fn generate_subset_prefix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut n = count.wrapping_mul(HASH_MULTIPLIER_1);
    n ^= n >> 32;
    n = n.wrapping_mul(HASH_MULTIPLIER_2);

    let mut prefix = String::with_capacity(SUBSET_PREFIX_LENGTH);
    for _ in 0..SUBSET_PREFIX_LENGTH {
        let letter = (n % 26) as u8 + b'A';
        prefix.push(letter as char);
        n /= 26;
    }

    prefix
}

/// Generates a PostScript-compatible font name, e.g. `Roboto-Bold`,
/// `OpenSans-Italic`.
pub fn generate_postscript_name(family: &str, weight: u16, is_italic: bool) -> String {
    let family_no_spaces = family.replace(' ', "");

    let weight_suffix = match weight {
        w if w <= WEIGHT_LIGHT_MAX => "Light",
        w if w <= WEIGHT_REGULAR_MAX => "Regular",
        w if w <= WEIGHT_MEDIUM_MAX => "Medium",
        _ => "Bold",
    };

    if is_italic {
        if weight >= WEIGHT_BOLD_MIN {
            format!("{}-BoldItalic", family_no_spaces)
        } else {
            format!("{}-Italic", family_no_spaces)
        }
    } else if weight >= WEIGHT_BOLD_MIN {
        format!("{}-Bold", family_no_spaces)
    } else {
        format!("{}-{}", family_no_spaces, weight_suffix)
    }
}

/// Estimates StemV (vertical stem width) from the bounding box of a
/// character with a clear vertical stroke. Falls back to a default if
/// neither probe glyph is present.
fn calculate_stem_v(face: &Face) -> i64 {
    for probe in ['I', 'l'] {
        if let Some(glyph_id) = face.glyph_index(probe) {
            if let Some(bbox) = face.glyph_bounding_box(glyph_id) {
                let width = bbox.x_max - bbox.x_min;
                return (width as i64).clamp(STEM_V_MIN, STEM_V_MAX);
            }
        }
    }
    DEFAULT_STEM_V
}
