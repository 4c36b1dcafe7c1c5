//! The composite-font model: a Type0 font plus its descendant CIDFont,
//! bridged by a CMap that maps character codes to CIDs.

use std::collections::BTreeMap;

use pdf_core::object::{Dictionary, Object};

use crate::cmap::CMap;
use crate::descriptor::FontDescriptor;
use crate::tounicode::ToUnicodeMap;

/// The descendant CIDFont: per-CID widths plus the font descriptor.
pub struct CidFont {
    default_width: f64,
    widths: BTreeMap<u32, f64>,
    descriptor: FontDescriptor,
}

impl CidFont {
    pub fn new(default_width: f64, widths: BTreeMap<u32, f64>, descriptor: FontDescriptor) -> CidFont {
        CidFont { default_width, widths, descriptor }
    }

    /// Parses a `/W` array, which interleaves two forms:
    /// `cid [w1 w2 … wN]` (individual widths starting at `cid`) and
    /// `cidStart cidEnd w` (one width applied to the whole range).
    pub fn parse_w_array(array: &[Object]) -> BTreeMap<u32, f64> {
        let mut widths = BTreeMap::new();
        let mut i = 0;
        while i < array.len() {
            let first_cid = match array[i].as_integer() {
                Some(v) => v as u32,
                None => {
                    i += 1;
                    continue;
                }
            };

            if i + 1 < array.len() {
                if let Some(list) = array[i + 1].as_array() {
                    for (offset, w) in list.iter().enumerate() {
                        if let Some(w) = w.as_f64() {
                            widths.insert(first_cid + offset as u32, w);
                        }
                    }
                    i += 2;
                    continue;
                }
                if i + 2 < array.len() {
                    if let (Some(last_cid), Some(w)) =
                        (array[i + 1].as_integer(), array[i + 2].as_f64())
                    {
                        for cid in first_cid..=(last_cid as u32) {
                            widths.insert(cid, w);
                        }
                        i += 3;
                        continue;
                    }
                }
            }
            i += 1;
        }
        widths
    }

    pub fn get_width(&self, cid: u32) -> f64 {
        self.widths.get(&cid).copied().unwrap_or(self.default_width)
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }
}

/// A Type0 composite font: a character-code-to-CID CMap plus the
/// descendant CIDFont that carries the widths and glyph program.
pub struct CompositeFont {
    cmap: CMap,
    cid_font: CidFont,
    to_unicode: ToUnicodeMap,
}

impl CompositeFont {
    pub fn new(cmap: CMap, cid_font: CidFont, to_unicode: ToUnicodeMap) -> CompositeFont {
        CompositeFont { cmap, cid_font, to_unicode }
    }

    /// Builds the common case: an Identity-H encoded font (CID == GID,
    /// 2-byte codes) with the given `/W` widths.
    pub fn identity(cid_font: CidFont, to_unicode: ToUnicodeMap) -> CompositeFont {
        CompositeFont { cmap: CMap::identity("Identity-H"), cid_font, to_unicode }
    }

    /// Splits a content-stream string into `(code, byte_length)` pairs per
    /// the font's codespace ranges.
    pub fn read_codes<'a>(&'a self, bytes: &'a [u8]) -> impl Iterator<Item = (u32, usize)> + 'a {
        let mut offset = 0;
        std::iter::from_fn(move || {
            let (code, len) = self.cmap.read_char_code(bytes, offset)?;
            offset += len;
            Some((code, len))
        })
    }

    /// Resolves a character code's advance width: `cmap.lookup(code)` gives
    /// the CID, which indexes the descendant CIDFont's `/W` array.
    pub fn get_width(&self, code: u32) -> f64 {
        let cid = self.cmap.lookup(code);
        self.cid_font.get_width(cid)
    }

    pub fn to_unicode(&self, code: u32) -> String {
        self.to_unicode.lookup(code)
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        self.cid_font.descriptor()
    }
}

/// Parses a `/DescendantFonts` CIDFont dictionary's metrics into a
/// [`CidFont`], given its already-resolved `/FontDescriptor` dictionary.
pub fn parse_cid_font(cid_font_dict: &Dictionary, descriptor_dict: &Dictionary) -> CidFont {
    let default_width = cid_font_dict.get_number(b"DW").unwrap_or(1000.0);
    let widths = cid_font_dict
        .get_array(b"W")
        .map(CidFont::parse_w_array)
        .unwrap_or_default();
    CidFont::new(default_width, widths, FontDescriptor::parse(descriptor_dict))
}
