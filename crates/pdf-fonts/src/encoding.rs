//! Simple-font encodings: the five base encodings plus the `/Differences`
//! overlay described in the font model. `Symbol` and `ZapfDingbats` are
//! symbolic encodings tied to their own standard-14 font rather than
//! selectable through `/Encoding` in a document; a font whose `/BaseFont`
//! is `Symbol` or `ZapfDingbats` uses one of these regardless of what (if
//! anything) `/Encoding` names.

use pdf_core::object::Object;
use std::collections::BTreeMap;

use crate::agl::glyph_name_to_unicode;

/// One of the five base single-byte encodings the font model recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    Standard,
    WinAnsi,
    MacRoman,
    Symbol,
    ZapfDingbats,
}

impl BaseEncoding {
    fn glyph_name(&self, code: u8) -> Option<&'static str> {
        let table = match self {
            BaseEncoding::Standard => standard_encoding_table(),
            BaseEncoding::WinAnsi => win_ansi_encoding_table(),
            BaseEncoding::MacRoman => mac_roman_encoding_table(),
            BaseEncoding::Symbol => symbol_encoding_table(),
            BaseEncoding::ZapfDingbats => return zapf_dingbats_glyph_name(code),
        };
        table[code as usize]
    }

    pub fn from_name(name: &str) -> Option<BaseEncoding> {
        match name {
            "StandardEncoding" => Some(BaseEncoding::Standard),
            "WinAnsiEncoding" => Some(BaseEncoding::WinAnsi),
            "MacRomanEncoding" => Some(BaseEncoding::MacRoman),
            _ => None,
        }
    }

    /// Picks the encoding implied by a standard-14 font name, for the two
    /// symbolic fonts whose encoding is never spelled out via `/Encoding`.
    pub fn for_standard_font(standard_name: &str) -> Option<BaseEncoding> {
        match standard_name {
            "Symbol" => Some(BaseEncoding::Symbol),
            "ZapfDingbats" => Some(BaseEncoding::ZapfDingbats),
            _ => None,
        }
    }
}

/// A simple-font encoding: a base table plus any `/Differences` overrides.
#[derive(Debug, Clone)]
pub struct Encoding {
    base: BaseEncoding,
    differences: BTreeMap<u8, String>,
    reverse: BTreeMap<char, u8>,
}

impl Encoding {
    pub fn base(base: BaseEncoding) -> Encoding {
        let mut enc = Encoding { base, differences: BTreeMap::new(), reverse: BTreeMap::new() };
        enc.rebuild_reverse();
        enc
    }

    /// Parses a `/Differences` array: `[code1 /name1 /name2 … codeN /nameM …]`.
    /// Each integer resets the current code; each following name assigns
    /// `(current_code, glyphToUnicode(name))` and advances the code by one.
    pub fn with_differences(base: BaseEncoding, array: &[Object]) -> Encoding {
        let mut differences = BTreeMap::new();
        let mut current_code: i64 = 0;

        for item in array {
            if let Some(code) = item.as_integer() {
                current_code = code;
            } else if let Some(name) = item.as_str_name() {
                if (0..=255).contains(&current_code) {
                    let unicode = glyph_name_to_unicode(name).unwrap_or_default();
                    differences.insert(current_code as u8, unicode);
                }
                current_code += 1;
            }
        }

        let mut enc = Encoding { base, differences, reverse: BTreeMap::new() };
        enc.rebuild_reverse();
        enc
    }

    fn rebuild_reverse(&mut self) {
        self.reverse.clear();
        for code in 0u16..=255 {
            let code = code as u8;
            let decoded = self.decode(code);
            if let Some(ch) = decoded.chars().next() {
                if decoded.chars().count() == 1 {
                    self.reverse.entry(ch).or_insert(code);
                }
            }
        }
    }

    /// Decodes a single byte code to its Unicode string (possibly empty,
    /// possibly multi-character for a `/Differences` ligature entry).
    pub fn decode(&self, code: u8) -> String {
        if let Some(unicode) = self.differences.get(&code) {
            return unicode.clone();
        }
        self.base
            .glyph_name(code)
            .and_then(glyph_name_to_unicode)
            .unwrap_or_default()
    }

    /// Reverse-maps a single scalar back to its byte code, used by
    /// `encode_text`.
    pub fn encode(&self, ch: char) -> Option<u8> {
        self.reverse.get(&ch).copied()
    }
}

const ASCII_UPPER: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];
const ASCII_LOWER: [&str; 26] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z",
];

fn ascii_table() -> [Option<&'static str>; 256] {
    let mut table: [Option<&'static str>; 256] = [None; 256];
    table[0x20] = Some("space");
    table[0x21] = Some("exclam");
    table[0x22] = Some("quotedbl");
    table[0x23] = Some("numbersign");
    table[0x24] = Some("dollar");
    table[0x25] = Some("percent");
    table[0x26] = Some("ampersand");
    table[0x27] = Some("quotesingle");
    table[0x28] = Some("parenleft");
    table[0x29] = Some("parenright");
    table[0x2A] = Some("asterisk");
    table[0x2B] = Some("plus");
    table[0x2C] = Some("comma");
    table[0x2D] = Some("hyphen");
    table[0x2E] = Some("period");
    table[0x2F] = Some("slash");
    table[0x30] = Some("zero");
    table[0x31] = Some("one");
    table[0x32] = Some("two");
    table[0x33] = Some("three");
    table[0x34] = Some("four");
    table[0x35] = Some("five");
    table[0x36] = Some("six");
    table[0x37] = Some("seven");
    table[0x38] = Some("eight");
    table[0x39] = Some("nine");
    table[0x3A] = Some("colon");
    table[0x3B] = Some("semicolon");
    table[0x3C] = Some("less");
    table[0x3D] = Some("equal");
    table[0x3E] = Some("greater");
    table[0x3F] = Some("question");
    table[0x40] = Some("at");
    for (i, name) in ASCII_UPPER.iter().enumerate() {
        table[b'A' as usize + i] = Some(name);
    }
    table[0x5B] = Some("bracketleft");
    table[0x5C] = Some("backslash");
    table[0x5D] = Some("bracketright");
    table[0x5E] = Some("asciicircum");
    table[0x5F] = Some("underscore");
    table[0x60] = Some("grave");
    for (i, name) in ASCII_LOWER.iter().enumerate() {
        table[b'a' as usize + i] = Some(name);
    }
    table[0x7B] = Some("braceleft");
    table[0x7C] = Some("bar");
    table[0x7D] = Some("braceright");
    table[0x7E] = Some("asciitilde");
    table
}

/// The ASCII range is shared by all three base encodings; they diverge only
/// above 0x80, where each vendor picked its own code page. This table covers
/// the codes every PDF producer actually relies on; unmapped high bytes
/// decode to an empty string rather than guessing.
fn standard_encoding_table() -> &'static [Option<&'static str>; 256] {
    static TABLE: std::sync::OnceLock<[Option<&'static str>; 256]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = ascii_table();
        t[0x27] = Some("quoteright");
        t[0x60] = Some("quoteleft");
        t
    })
}

fn win_ansi_encoding_table() -> &'static [Option<&'static str>; 256] {
    static TABLE: std::sync::OnceLock<[Option<&'static str>; 256]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = ascii_table();
        t[0x91] = Some("quoteleft");
        t[0x92] = Some("quoteright");
        t[0x93] = Some("quotedblleft");
        t[0x94] = Some("quotedblright");
        t[0x95] = Some("bullet");
        t[0x96] = Some("endash");
        t[0x97] = Some("emdash");
        t[0xA9] = Some("copyright");
        t[0xAE] = Some("registered");
        t[0xB0] = Some("degree");
        t[0xC9] = Some("Eacute");
        t[0xE9] = Some("eacute");
        t[0xC0] = Some("Agrave");
        t[0xE0] = Some("agrave");
        t[0xE7] = Some("ccedilla");
        t[0xF1] = Some("ntilde");
        t
    })
}

fn mac_roman_encoding_table() -> &'static [Option<&'static str>; 256] {
    static TABLE: std::sync::OnceLock<[Option<&'static str>; 256]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = ascii_table();
        t[0x87] = Some("eacute");
        t[0xA9] = Some("copyright");
        t[0xA8] = Some("registered");
        t[0xA1] = Some("degree");
        t
    })
}

const SYMBOL_UPPER: [&str; 26] = [
    "Alpha", "Beta", "Chi", "Delta", "Epsilon", "Phi", "Gamma", "Eta", "Iota", "theta1",
    "Kappa", "Lambda", "Mu", "Nu", "Omicron", "Pi", "Theta", "Rho", "Sigma", "Tau",
    "Upsilon", "sigma1", "Omega", "Xi", "Psi", "Zeta",
];
const SYMBOL_LOWER: [&str; 26] = [
    "alpha", "beta", "chi", "delta", "epsilon", "phi", "gamma", "eta", "iota", "phi1",
    "kappa", "lambda", "mu", "nu", "omicron", "pi", "theta", "rho", "sigma", "tau",
    "upsilon", "omega1", "omega", "xi", "psi", "zeta",
];

/// The Symbol font's encoding: digits and most punctuation sit at their
/// usual ASCII codes, but the letter ranges carry Greek letters instead
/// (the mapping every "Symbol" font on every platform has used since
/// PostScript's original Symbol encoding vector).
fn symbol_encoding_table() -> &'static [Option<&'static str>; 256] {
    static TABLE: std::sync::OnceLock<[Option<&'static str>; 256]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t: [Option<&'static str>; 256] = [None; 256];
        t[0x20] = Some("space");
        for code in 0x21u8..=0x40 {
            t[code as usize] = ascii_table()[code as usize];
        }
        for (i, name) in SYMBOL_UPPER.iter().enumerate() {
            t[b'A' as usize + i] = Some(name);
        }
        for code in 0x5Bu8..=0x60 {
            t[code as usize] = ascii_table()[code as usize];
        }
        for (i, name) in SYMBOL_LOWER.iter().enumerate() {
            t[b'a' as usize + i] = Some(name);
        }
        for code in 0x7Bu8..=0x7E {
            t[code as usize] = ascii_table()[code as usize];
        }
        t
    })
}

/// ZapfDingbats has no meaningful Unicode letter/digit glyphs at all; its
/// printable range (0x21-0x7E) maps directly onto the Unicode Dingbats
/// block at a fixed offset, handled by [`crate::agl::glyph_name_to_unicode`]
/// via the synthetic `dingbatNN` name this returns.
fn zapf_dingbats_glyph_name(code: u8) -> Option<&'static str> {
    static TABLE: std::sync::OnceLock<[Option<&'static str>; 256]> = std::sync::OnceLock::new();
    TABLE
        .get_or_init(|| {
            let mut t: [Option<&'static str>; 256] = [None; 256];
            t[0x20] = Some("space");
            for code in 0x21u16..=0x7E {
                t[code as usize] = Some(Box::leak(format!("dingbat{code}").into_boxed_str()) as &str);
            }
            t
        })
        .get(code as usize)
        .copied()
        .flatten()
}
