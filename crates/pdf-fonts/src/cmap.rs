//! CMap parsing for composite fonts: codespace ranges, `cidchar`/`cidrange`
//! mappings, and the identity CMaps PDF producers use almost universally.

use std::collections::BTreeMap;

/// A parsed CMap: maps character codes (of varying byte length) to CIDs.
#[derive(Debug, Clone)]
pub struct CMap {
    name: String,
    codespace_ranges: Vec<(Vec<u8>, Vec<u8>)>,
    single: BTreeMap<u32, u32>,
    ranges: Vec<(u32, u32, u32)>,
}

impl CMap {
    /// The Identity-H/V CMap: CID == code, 2-byte codes.
    pub fn identity(name: &str) -> CMap {
        CMap {
            name: name.to_string(),
            codespace_ranges: vec![(vec![0x00, 0x00], vec![0xFF, 0xFF])],
            single: BTreeMap::new(),
            ranges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parses the PostScript-like CMap program text embedded in a
    /// `/Encoding` stream.
    pub fn parse(text: &str) -> CMap {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut cmap = CMap {
            name: String::new(),
            codespace_ranges: Vec::new(),
            single: BTreeMap::new(),
            ranges: Vec::new(),
        };

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                "/CMapName" if i + 1 < tokens.len() => {
                    cmap.name = tokens[i + 1].trim_start_matches('/').to_string();
                    i += 2;
                }
                "begincodespacerange" => {
                    i += 1;
                    while i + 1 < tokens.len() && tokens[i] != "endcodespacerange" {
                        if let (Some(lo), Some(hi)) =
                            (parse_hex_bytes(tokens[i]), parse_hex_bytes(tokens[i + 1]))
                        {
                            cmap.codespace_ranges.push((lo, hi));
                        }
                        i += 2;
                    }
                }
                "begincidchar" => {
                    i += 1;
                    while i + 1 < tokens.len() && tokens[i] != "endcidchar" {
                        if let Some(code) = parse_hex_u32(tokens[i]) {
                            if let Ok(cid) = tokens[i + 1].parse::<u32>() {
                                cmap.single.insert(code, cid);
                            }
                        }
                        i += 2;
                    }
                }
                "begincidrange" => {
                    i += 1;
                    while i + 2 < tokens.len() && tokens[i] != "endcidrange" {
                        if let (Some(lo), Some(hi)) =
                            (parse_hex_u32(tokens[i]), parse_hex_u32(tokens[i + 1]))
                        {
                            if let Ok(cid) = tokens[i + 2].parse::<u32>() {
                                cmap.ranges.push((lo, hi, cid));
                            }
                        }
                        i += 3;
                    }
                }
                _ => i += 1,
            }
        }

        if cmap.codespace_ranges.is_empty() {
            cmap.codespace_ranges.push((vec![0x00, 0x00], vec![0xFF, 0xFF]));
        }

        cmap
    }

    /// Maps a character code to its CID. Identity-H/V's `lookup(code) == code`.
    pub fn lookup(&self, code: u32) -> u32 {
        if let Some(&cid) = self.single.get(&code) {
            return cid;
        }
        for &(lo, hi, base_cid) in &self.ranges {
            if code >= lo && code <= hi {
                return base_cid + (code - lo);
            }
        }
        code
    }

    /// Reads one character code starting at `offset`, returning
    /// `(code, byte_length)`. Tries the longest codespace range whose first
    /// byte matches, falling back to a single byte when nothing matches.
    pub fn read_char_code(&self, bytes: &[u8], offset: usize) -> Option<(u32, usize)> {
        if offset >= bytes.len() {
            return None;
        }

        let mut candidates: Vec<usize> =
            self.codespace_ranges.iter().map(|(lo, _)| lo.len()).collect();
        candidates.sort_unstable_by(|a, b| b.cmp(a));
        candidates.dedup();

        for len in candidates {
            if offset + len > bytes.len() {
                continue;
            }
            let chunk = &bytes[offset..offset + len];
            if self.codespace_ranges.iter().any(|(lo, hi)| {
                lo.len() == len && chunk.iter().zip(lo).zip(hi).all(|((b, l), h)| b >= l && b <= h)
            }) {
                let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32);
                return Some((code, len));
            }
        }

        Some((bytes[offset] as u32, 1))
    }
}

fn parse_hex_bytes(token: &str) -> Option<Vec<u8>> {
    let hex = token.strip_prefix('<')?.strip_suffix('>')?;
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

fn parse_hex_u32(token: &str) -> Option<u32> {
    let hex = token.strip_prefix('<')?.strip_suffix('>')?;
    u32::from_str_radix(hex, 16).ok()
}
