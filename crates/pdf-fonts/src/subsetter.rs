//! TrueType font subsetting: keeps only the glyphs a document's text
//! actually uses, via the [`subsetter`](https://crates.io/crates/subsetter)
//! crate (glyph table extraction/rebuilding) on top of `ttf-parser` (glyph
//! lookup on the source font).

use std::collections::HashSet;
use subsetter::{subset, GlyphRemapper};
use ttf_parser::{Face, GlyphId};

#[derive(Debug, thiserror::Error)]
pub enum SubsetError {
    #[error("failed to parse TrueType font at index {index}: {reason}")]
    ParseError { index: u32, reason: String },

    #[error("failed to extract glyph data (used {used_glyphs} of {total_glyphs} glyphs): {reason}")]
    GlyphExtractionError {
        used_glyphs: usize,
        total_glyphs: u16,
        reason: String,
    },

    #[error("subset validation failed (original: {original_size} bytes, subset: {subset_size} bytes): {reason}")]
    ValidationError {
        original_size: usize,
        subset_size: usize,
        reason: String,
    },

    #[error("invalid font structure: {0}")]
    InvalidFont(String),
}

/// Size/glyph-count stats from a [`subset_font_core`] call, for logging.
#[derive(Debug, Clone, Copy)]
pub struct SubsetMetrics {
    pub original_size: usize,
    pub subset_size: usize,
    pub original_glyphs: u16,
    pub subset_glyphs: u16,
    pub size_reduction_pct: f32,
    pub glyph_reduction_pct: f32,
}

impl SubsetMetrics {
    fn new(original_size: usize, subset_size: usize, original_glyphs: u16, subset_glyphs: u16) -> Self {
        let size_reduction_pct = if original_size > 0 {
            (1.0 - (subset_size as f32 / original_size as f32)) * 100.0
        } else {
            0.0
        };
        let glyph_reduction_pct = if original_glyphs > 0 {
            (1.0 - (subset_glyphs as f32 / original_glyphs as f32)) * 100.0
        } else {
            0.0
        };
        Self {
            original_size,
            subset_size,
            original_glyphs,
            subset_glyphs,
            size_reduction_pct,
            glyph_reduction_pct,
        }
    }
}

/// Subsets `font_bytes` down to the glyphs `text` uses (plus `.notdef` and
/// space), remapping glyph IDs to a dense range so the resulting CIDToGID
/// map stays small. Pass an already-parsed `face` to skip a redundant parse
/// when subsetting the same font repeatedly; `return_metrics` controls
/// whether size/glyph-count stats are computed for the caller to log.
pub fn subset_font_core(
    font_bytes: &[u8],
    face: Option<&Face>,
    text: &str,
    return_metrics: bool,
) -> Result<(Vec<u8>, Option<SubsetMetrics>), SubsetError> {
    let original_size = font_bytes.len();

    let owned_face;
    let face_ref = if let Some(f) = face {
        f
    } else {
        owned_face = Face::parse(font_bytes, 0).map_err(|e| SubsetError::ParseError {
            index: 0,
            reason: format!("{:?}", e),
        })?;
        &owned_face
    };

    let original_glyphs = face_ref.number_of_glyphs();
    let used_glyphs = collect_used_glyphs(face_ref, text);

    let mut remapper = GlyphRemapper::new();
    let mut glyph_vec: Vec<u16> = used_glyphs.iter().map(|g| g.0).collect();
    glyph_vec.sort_unstable();
    for glyph_id in glyph_vec {
        remapper.remap(glyph_id);
    }
    let subset_glyphs = remapper.num_gids();

    // Composite glyph dependencies (accents drawn from a base glyph's
    // outline, etc.) are followed automatically by `subset`; nothing here
    // needs to walk glyf component references itself.
    let subset_bytes =
        subset(font_bytes, 0, &remapper).map_err(|e| SubsetError::GlyphExtractionError {
            used_glyphs: remapper.num_gids() as usize,
            total_glyphs: face_ref.number_of_glyphs(),
            reason: format!("{:?}", e),
        })?;

    Face::parse(&subset_bytes, 0).map_err(|e| SubsetError::ValidationError {
        original_size,
        subset_size: subset_bytes.len(),
        reason: format!("{:?}", e),
    })?;

    let metrics = return_metrics.then(|| {
        SubsetMetrics::new(original_size, subset_bytes.len(), original_glyphs, subset_glyphs)
    });

    Ok((subset_bytes, metrics))
}

fn collect_used_glyphs(face: &Face, text: &str) -> HashSet<GlyphId> {
    let mut glyphs = HashSet::new();
    glyphs.insert(GlyphId(0));
    if let Some(space_glyph) = face.glyph_index(' ') {
        glyphs.insert(space_glyph);
    }
    for ch in text.chars() {
        if let Some(glyph_id) = face.glyph_index(ch) {
            glyphs.insert(glyph_id);
        }
    }
    glyphs
}
