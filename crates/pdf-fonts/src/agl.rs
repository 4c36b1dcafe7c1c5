//! Adobe Glyph List lookups: glyph name -> Unicode string.
//!
//! Covers the common Latin-1 + punctuation names a `/Differences` array is
//! likely to reference, plus the `uniXXXX`/`uXXXXXX` hex-escape forms that
//! stand in for names the list doesn't cover.

/// Resolves a glyph name to its Unicode string, trying the literal `uniXXXX`
/// / `uXXXXXX` escapes before falling back to the compiled-in table.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    if let Some(hex) = name.strip_prefix("uni") {
        return parse_hex_escape(hex, 4);
    }
    if let Some(hex) = name.strip_prefix("u") {
        if hex.len() >= 4 && hex.len() <= 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return parse_hex_escape(hex, hex.len());
        }
    }
    // ZapfDingbats glyph names minted by `encoding::zapf_dingbats_encoding_table`
    // for codes 0x21-0x7E; the printable-ASCII span of the dingbats font maps
    // onto the Unicode Dingbats block with a fixed +0x26E0 offset.
    if let Some(code) = name.strip_prefix("dingbat").and_then(|s| s.parse::<u32>().ok()) {
        if (0x21..=0x7E).contains(&code) {
            return char::from_u32(code + 0x26E0).map(|c| c.to_string());
        }
    }
    AGL.iter()
        .find(|(n, _)| *n == name)
        .map(|(_, u)| u.to_string())
}

fn parse_hex_escape(hex: &str, expected_len: usize) -> Option<String> {
    if hex.len() != expected_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let codepoint = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(codepoint).map(|c| c.to_string())
}

/// A working subset of the Adobe Glyph List: ASCII, common Latin-1
/// punctuation/diacritics, and the names `/Differences` arrays use most.
const AGL: &[(&str, &str)] = &[
    ("space", " "),
    ("exclam", "!"),
    ("quotedbl", "\""),
    ("numbersign", "#"),
    ("dollar", "$"),
    ("percent", "%"),
    ("ampersand", "&"),
    ("quotesingle", "'"),
    ("parenleft", "("),
    ("parenright", ")"),
    ("asterisk", "*"),
    ("plus", "+"),
    ("comma", ","),
    ("hyphen", "-"),
    ("period", "."),
    ("slash", "/"),
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("colon", ":"),
    ("semicolon", ";"),
    ("less", "<"),
    ("equal", "="),
    ("greater", ">"),
    ("question", "?"),
    ("at", "@"),
    ("A", "A"),
    ("B", "B"),
    ("C", "C"),
    ("D", "D"),
    ("E", "E"),
    ("F", "F"),
    ("G", "G"),
    ("H", "H"),
    ("I", "I"),
    ("J", "J"),
    ("K", "K"),
    ("L", "L"),
    ("M", "M"),
    ("N", "N"),
    ("O", "O"),
    ("P", "P"),
    ("Q", "Q"),
    ("R", "R"),
    ("S", "S"),
    ("T", "T"),
    ("U", "U"),
    ("V", "V"),
    ("W", "W"),
    ("X", "X"),
    ("Y", "Y"),
    ("Z", "Z"),
    ("bracketleft", "["),
    ("backslash", "\\"),
    ("bracketright", "]"),
    ("asciicircum", "^"),
    ("underscore", "_"),
    ("grave", "`"),
    ("a", "a"),
    ("b", "b"),
    ("c", "c"),
    ("d", "d"),
    ("e", "e"),
    ("f", "f"),
    ("g", "g"),
    ("h", "h"),
    ("i", "i"),
    ("j", "j"),
    ("k", "k"),
    ("l", "l"),
    ("m", "m"),
    ("n", "n"),
    ("o", "o"),
    ("p", "p"),
    ("q", "q"),
    ("r", "r"),
    ("s", "s"),
    ("t", "t"),
    ("u", "u"),
    ("v", "v"),
    ("w", "w"),
    ("x", "x"),
    ("y", "y"),
    ("z", "z"),
    ("braceleft", "{"),
    ("bar", "|"),
    ("braceright", "}"),
    ("asciitilde", "~"),
    ("bullet", "\u{2022}"),
    ("endash", "\u{2013}"),
    ("emdash", "\u{2014}"),
    ("quoteleft", "\u{2018}"),
    ("quoteright", "\u{2019}"),
    ("quotedblleft", "\u{201C}"),
    ("quotedblright", "\u{201D}"),
    ("ellipsis", "\u{2026}"),
    ("fi", "\u{FB01}"),
    ("fl", "\u{FB02}"),
    ("Eacute", "\u{00C9}"),
    ("eacute", "\u{00E9}"),
    ("Agrave", "\u{00C0}"),
    ("agrave", "\u{00E0}"),
    ("ccedilla", "\u{00E7}"),
    ("ntilde", "\u{00F1}"),
    ("copyright", "\u{00A9}"),
    ("registered", "\u{00AE}"),
    ("degree", "\u{00B0}"),
    ("section", "\u{00A7}"),
    ("paragraph", "\u{00B6}"),
    (".notdef", ""),
    // The Symbol font's Greek letters, under their standard Adobe names.
    ("Alpha", "\u{0391}"), ("Beta", "\u{0392}"), ("Gamma", "\u{0393}"),
    ("Delta", "\u{0394}"), ("Epsilon", "\u{0395}"), ("Zeta", "\u{0396}"),
    ("Eta", "\u{0397}"), ("Theta", "\u{0398}"), ("Iota", "\u{0399}"),
    ("Kappa", "\u{039A}"), ("Lambda", "\u{039B}"), ("Mu", "\u{039C}"),
    ("Nu", "\u{039D}"), ("Xi", "\u{039E}"), ("Omicron", "\u{039F}"),
    ("Pi", "\u{03A0}"), ("Rho", "\u{03A1}"), ("Sigma", "\u{03A3}"),
    ("Tau", "\u{03A4}"), ("Upsilon", "\u{03A5}"), ("Phi", "\u{03A6}"),
    ("Chi", "\u{03A7}"), ("Psi", "\u{03A8}"), ("Omega", "\u{03A9}"),
    ("alpha", "\u{03B1}"), ("beta", "\u{03B2}"), ("gamma", "\u{03B3}"),
    ("delta", "\u{03B4}"), ("epsilon", "\u{03B5}"), ("zeta", "\u{03B6}"),
    ("eta", "\u{03B7}"), ("theta", "\u{03B8}"), ("iota", "\u{03B9}"),
    ("kappa", "\u{03BA}"), ("lambda", "\u{03BB}"), ("mu", "\u{03BC}"),
    ("nu", "\u{03BD}"), ("xi", "\u{03BE}"), ("omicron", "\u{03BF}"),
    ("pi", "\u{03C0}"), ("rho", "\u{03C1}"), ("sigma", "\u{03C3}"),
    ("tau", "\u{03C4}"), ("upsilon", "\u{03C5}"), ("phi", "\u{03C6}"),
    ("chi", "\u{03C7}"), ("psi", "\u{03C8}"), ("omega", "\u{03C9}"),
    // Symbol's four alternate-glyph-form letters, filling the J/V/j/v code
    // slots left over once every other Latin letter got a distinct Greek one.
    ("theta1", "\u{03D1}"), ("sigma1", "\u{03C2}"),
    ("phi1", "\u{03D5}"), ("omega1", "\u{03D6}"),
];
