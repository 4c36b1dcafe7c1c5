//! Content-stream-driven text extraction: walks the tokenized
//! operator list, keeps graphics/text state current, and turns `Tj`/`TJ`/
//! `'`/`"` into positioned glyph records.

use std::collections::HashMap;

use pdf_core::content::{parse_content_stream, ContentItem};
use pdf_core::object::Object;
use pdf_fonts::composite_font::CompositeFont;
use pdf_fonts::simple_font::SimpleFont;

use crate::error::ExtractError;
use crate::matrix::Matrix;
use crate::state::{GraphicsState, TextState};

/// Either font model, giving the extractor one calling convention
/// regardless of whether codes are 1 byte (simple) or CMap-addressed
/// (composite).
pub enum ResolvedFont {
    Simple(SimpleFont),
    Composite(CompositeFont),
}

impl ResolvedFont {
    /// Splits a shown string into `(code, byte_length)` pairs. Simple fonts
    /// always consume one byte; composite fonts consume what the CMap's
    /// codespace ranges say (1-4, 2 by default for Identity-H).
    fn read_codes<'a>(&'a self, bytes: &'a [u8]) -> Box<dyn Iterator<Item = (u32, usize)> + 'a> {
        match self {
            ResolvedFont::Simple(_) => Box::new(bytes.iter().map(|&b| (b as u32, 1))),
            ResolvedFont::Composite(f) => Box::new(f.read_codes(bytes)),
        }
    }

    fn get_width(&self, code: u32) -> f64 {
        match self {
            ResolvedFont::Simple(f) => f.get_width(code as u8),
            ResolvedFont::Composite(f) => f.get_width(code),
        }
    }

    fn to_unicode(&self, code: u32) -> String {
        match self {
            ResolvedFont::Simple(f) => f.to_unicode(code as u8),
            ResolvedFont::Composite(f) => f.to_unicode(code),
        }
    }

    /// Single-byte space (0x20) for simple fonts; for composite fonts, the
    /// extracted text resolving to a lone space is the closest available
    /// signal since CID 32 has no universal meaning.
    fn is_space(&self, code: u32, unicode: &str) -> bool {
        match self {
            ResolvedFont::Simple(_) => code == 0x20,
            ResolvedFont::Composite(_) => unicode == " ",
        }
    }

    fn ascent(&self) -> f64 {
        match self {
            ResolvedFont::Simple(f) => f.descriptor().ascent,
            ResolvedFont::Composite(f) => f.descriptor().ascent,
        }
    }

    fn descent(&self) -> f64 {
        match self {
            ResolvedFont::Simple(f) => f.descriptor().descent,
            ResolvedFont::Composite(f) => f.descriptor().descent,
        }
    }
}

/// Axis-aligned bounding rectangle in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    fn from_points(points: &[(f64, f64)]) -> Rect {
        let xs = points.iter().map(|p| p.0);
        let ys = points.iter().map(|p| p.1);
        Rect {
            x0: xs.clone().fold(f64::INFINITY, f64::min),
            x1: xs.fold(f64::NEG_INFINITY, f64::max),
            y0: ys.clone().fold(f64::INFINITY, f64::min),
            y1: ys.fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// One extracted glyph: its text, advance width in user space, and the
/// state it was shown under.
#[derive(Debug, Clone)]
pub struct GlyphRecord {
    pub text: String,
    pub bbox: Rect,
    pub baseline: (f64, f64),
    pub width: f64,
    pub font_name: String,
    pub font_size: f64,
}

/// Walks a page's content stream, resolving `Tf` font references through
/// `fonts` (keyed by the resource name used in `/Resources /Font`).
pub fn extract_glyphs(
    content: &[u8],
    fonts: &HashMap<String, ResolvedFont>,
) -> Result<Vec<GlyphRecord>, ExtractError> {
    let items = parse_content_stream(content)?;
    let mut gs = GraphicsState::new();
    let mut ts = TextState::new();
    let mut current_font: Option<(&str, &ResolvedFont)> = None;
    let mut glyphs = Vec::new();

    for item in &items {
        let ContentItem::Operator { name, operands } = item else { continue };
        match name.as_str() {
            "q" => gs.save(&ts),
            "Q" => gs.restore(&mut ts),
            "cm" => {
                if let Some(m) = matrix_from_operands(operands) {
                    gs.concat(m);
                }
            }
            "BT" => ts.begin_text(),
            "ET" => {}
            "Tc" => ts.char_spacing = num(operands, 0).unwrap_or(ts.char_spacing),
            "Tw" => ts.word_spacing = num(operands, 0).unwrap_or(ts.word_spacing),
            "Tz" => ts.horizontal_scale = num(operands, 0).unwrap_or(ts.horizontal_scale),
            "TL" => ts.leading = num(operands, 0).unwrap_or(ts.leading),
            "Ts" => ts.rise = num(operands, 0).unwrap_or(ts.rise),
            "Tr" => ts.render_mode = operands.first().and_then(Object::as_integer).unwrap_or(ts.render_mode),
            "Tf" => {
                ts.font_size = num(operands, 1).unwrap_or(ts.font_size);
                if let Some(name) = operands.first().and_then(Object::as_str_name) {
                    current_font = fonts.get(name).map(|f| (name, f));
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(operands, 0), num(operands, 1)) {
                    ts.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(operands, 0), num(operands, 1)) {
                    ts.move_line_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_from_operands(operands) {
                    ts.set_matrix(m);
                }
            }
            "T*" => ts.next_line(),
            "Tj" => {
                if let (Some((font_name, font)), Some(bytes)) =
                    (current_font, operands.first().and_then(Object::as_str_bytes))
                {
                    show_string(bytes, font_name, font, &gs, &mut ts, &mut glyphs);
                }
            }
            "'" => {
                ts.next_line();
                if let (Some((font_name, font)), Some(bytes)) =
                    (current_font, operands.first().and_then(Object::as_str_bytes))
                {
                    show_string(bytes, font_name, font, &gs, &mut ts, &mut glyphs);
                }
            }
            "\"" => {
                ts.word_spacing = num(operands, 0).unwrap_or(ts.word_spacing);
                ts.char_spacing = num(operands, 1).unwrap_or(ts.char_spacing);
                ts.next_line();
                if let (Some((font_name, font)), Some(bytes)) =
                    (current_font, operands.get(2).and_then(Object::as_str_bytes))
                {
                    show_string(bytes, font_name, font, &gs, &mut ts, &mut glyphs);
                }
            }
            "TJ" => {
                if let (Some((font_name, font)), Some(array)) =
                    (current_font, operands.first().and_then(Object::as_array))
                {
                    for item in array {
                        if let Some(bytes) = item.as_str_bytes() {
                            show_string(bytes, font_name, font, &gs, &mut ts, &mut glyphs);
                        } else if let Some(adj) = item.as_f64() {
                            ts.apply_tj_adjustment(adj);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(glyphs)
}

#[allow(clippy::too_many_arguments)]
fn show_string(
    bytes: &[u8],
    font_name: &str,
    font: &ResolvedFont,
    gs: &GraphicsState,
    ts: &mut TextState,
    out: &mut Vec<GlyphRecord>,
) {
    for (code, _len) in font.read_codes(bytes).collect::<Vec<_>>() {
        let w = font.get_width(code);
        let unicode = font.to_unicode(code);
        let is_space = font.is_space(code, &unicode);

        let baseline = gs.ctm.transform_point(ts.tm.e, ts.tm.f);
        let w_scaled = (w / 1000.0) * ts.font_size;
        let descender_scaled = (font.descent() / 1000.0) * ts.font_size;
        let height_scaled = ((font.ascent() - font.descent()) / 1000.0) * ts.font_size;
        let corners = [
            (0.0, descender_scaled),
            (w_scaled, descender_scaled),
            (w_scaled, descender_scaled + height_scaled),
            (0.0, descender_scaled + height_scaled),
        ]
        .map(|(x, y)| {
            let (vx, vy) = ts.tm.transform_vector(x, y);
            let (vx, vy) = gs.ctm.transform_vector(vx, vy);
            (baseline.0 + vx, baseline.1 + vy)
        });
        let bbox = Rect::from_points(&corners);

        let font_size = ts.effective_font_size(&gs.ctm);
        ts.advance(w, is_space);

        if !unicode.is_empty() {
            out.push(GlyphRecord {
                text: unicode,
                bbox,
                baseline,
                width: w_scaled,
                font_name: font_name.to_string(),
                font_size,
            });
        }
    }
}

fn matrix_from_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    Some(Matrix::new(
        num(operands, 0)?,
        num(operands, 1)?,
        num(operands, 2)?,
        num(operands, 3)?,
        num(operands, 4)?,
        num(operands, 5)?,
    ))
}

fn num(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(Object::as_f64)
}
