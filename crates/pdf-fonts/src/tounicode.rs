//! ToUnicode CMap parsing (read direction): resolves a font's character
//! codes back to Unicode text for extraction.

use std::collections::BTreeMap;

/// A parsed ToUnicode CMap.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeMap {
    entries: BTreeMap<u32, String>,
}

impl ToUnicodeMap {
    /// Parses `beginbfchar`/`beginbfrange` blocks out of a ToUnicode CMap
    /// program's text.
    pub fn parse(text: &str) -> ToUnicodeMap {
        let tokens: Vec<&str> = tokenize(text);
        let mut map = ToUnicodeMap::default();

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                "beginbfchar" => {
                    i += 1;
                    while i + 1 < tokens.len() && tokens[i] != "endbfchar" {
                        if let (Some(code), Some(unicode)) =
                            (parse_hex_u32(tokens[i]), decode_hex_string(tokens[i + 1]))
                        {
                            map.entries.insert(code, unicode);
                        }
                        i += 2;
                    }
                }
                "beginbfrange" => {
                    i += 1;
                    while i < tokens.len() && tokens[i] != "endbfrange" {
                        if tokens[i].starts_with('[') || (i > 0 && tokens[i - 1].ends_with('[')) {
                            // array-destination form handled below by scanning brackets
                        }
                        if i + 2 < tokens.len() && tokens[i + 2].starts_with('[') {
                            let lo = parse_hex_u32(tokens[i]);
                            let hi = parse_hex_u32(tokens[i + 1]);
                            i += 2;
                            let mut offset = 0u32;
                            // consume the bracketed array of destination strings
                            let first = tokens[i].trim_start_matches('[');
                            if let Some(lo) = lo {
                                if let Some(unicode) = decode_hex_string(first) {
                                    map.entries.insert(lo + offset, unicode);
                                    offset += 1;
                                }
                            }
                            i += 1;
                            while i < tokens.len() && !tokens[i].ends_with(']') {
                                if let (Some(lo), Some(unicode)) =
                                    (lo, decode_hex_string(tokens[i]))
                                {
                                    map.entries.insert(lo + offset, unicode);
                                    offset += 1;
                                }
                                i += 1;
                            }
                            if i < tokens.len() {
                                let last = tokens[i].trim_end_matches(']');
                                if !last.is_empty() {
                                    if let (Some(lo), Some(unicode)) = (lo, decode_hex_string(last))
                                    {
                                        map.entries.insert(lo + offset, unicode);
                                    }
                                }
                                i += 1;
                            }
                            let _ = hi;
                        } else if i + 2 < tokens.len() {
                            if let (Some(lo), Some(hi), Some(base)) = (
                                parse_hex_u32(tokens[i]),
                                parse_hex_u32(tokens[i + 1]),
                                parse_hex_codepoint(tokens[i + 2]),
                            ) {
                                for (offset, code) in (lo..=hi).enumerate() {
                                    let scalar = base.wrapping_add(offset as u32);
                                    if let Some(unicode) = decode_utf16_scalar(scalar) {
                                        map.entries.insert(code, unicode);
                                    }
                                }
                            }
                            i += 3;
                        } else {
                            i += 1;
                        }
                    }
                }
                _ => i += 1,
            }
        }

        map
    }

    /// Looks up the Unicode text for a character code; empty string means
    /// "no mapping".
    pub fn lookup(&self, code: u32) -> String {
        self.entries.get(&code).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

fn parse_hex_u32(token: &str) -> Option<u32> {
    let hex = token.trim_start_matches('[').strip_prefix('<')?.strip_suffix('>')?;
    u32::from_str_radix(hex, 16).ok()
}

/// Decodes a `<hex>` UTF-16BE destination string into a (possibly
/// multi-codepoint, ligature) Rust string, resolving surrogate pairs.
fn decode_hex_string(token: &str) -> Option<String> {
    let hex = token.trim_matches(|c| c == '[' || c == ']').strip_prefix('<')?.strip_suffix('>')?;
    let bytes: Vec<u8> = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect::<Option<_>>()?;

    let units: Vec<u16> = bytes.chunks(2).map(|c| ((c[0] as u16) << 8) | c.get(1).copied().unwrap_or(0) as u16).collect();
    Some(utf16_units_to_string(&units))
}

fn parse_hex_codepoint(token: &str) -> Option<u32> {
    let hex = token.strip_prefix('<')?.strip_suffix('>')?;
    // A codepoint destination may itself carry >2 bytes (rare); take the
    // first UTF-16 code unit as the range's base scalar.
    let first4 = &hex[..hex.len().min(4)];
    u32::from_str_radix(first4, 16).ok()
}

fn decode_utf16_scalar(unit: u32) -> Option<String> {
    utf16_units_to_string(&[unit as u16]).into()
}

/// Decodes a UTF-16BE code-unit sequence, pairing surrogates when present.
fn utf16_units_to_string(units: &[u16]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if (0xD800..=0xDBFF).contains(&unit) && i + 1 < units.len() {
            let low = units[i + 1];
            if (0xDC00..=0xDFFF).contains(&low) {
                let scalar = 0x10000 + (((unit - 0xD800) as u32) << 10) + (low - 0xDC00) as u32;
                if let Some(c) = char::from_u32(scalar) {
                    out.push(c);
                    i += 2;
                    continue;
                }
            }
        }
        if let Some(c) = char::from_u32(unit as u32) {
            out.push(c);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bfchar_entries() {
        let text = "1 beginbfchar\n<0041> <0041>\nendbfchar\n";
        let map = ToUnicodeMap::parse(text);
        assert_eq!(map.lookup(0x41), "A");
    }

    #[test]
    fn parses_bfrange_with_base_hex_destination() {
        let text = "1 beginbfrange\n<0061> <0063> <0041>\nendbfrange\n";
        let map = ToUnicodeMap::parse(text);
        assert_eq!(map.lookup(0x61), "A");
        assert_eq!(map.lookup(0x62), "B");
        assert_eq!(map.lookup(0x63), "C");
    }

    #[test]
    fn parses_bfrange_with_array_destination_for_ligatures() {
        let text = "1 beginbfrange\n<0001> <0002> [<0066006C> <00660066>]\nendbfrange\n";
        let map = ToUnicodeMap::parse(text);
        assert_eq!(map.lookup(0x01), "fl");
        assert_eq!(map.lookup(0x02), "ff");
    }

    #[test]
    fn decodes_surrogate_pairs_into_one_scalar() {
        // U+1F600 = D83D DE00
        let text = "1 beginbfchar\n<0001> <D83DDE00>\nendbfchar\n";
        let map = ToUnicodeMap::parse(text);
        assert_eq!(map.lookup(0x01), "\u{1F600}");
    }

    #[test]
    fn unmapped_code_resolves_to_empty_string() {
        let map = ToUnicodeMap::default();
        assert_eq!(map.lookup(0x99), "");
        assert!(map.is_empty());
    }
}
