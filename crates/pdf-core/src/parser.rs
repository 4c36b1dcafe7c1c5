//! Document-level parsing: binds the scanner, xref resolver, and object
//! registry together and exposes the lazily-materialized [`Document`].

use crate::error::LoadError;
use crate::filters::{decode_filter, FilterParams};
use crate::object::{Dictionary, Object};
use crate::object_parser::ObjectParser;
use crate::registry::ObjectRegistry;
use crate::scanner::{Scanner, Token};
use crate::xref::{self, ParseWarning};

/// A loaded PDF: the object graph plus whatever went wrong while getting
/// there. A `Document` is always usable even when `warnings` is non-empty —
/// fatal failures surface as [`LoadError`] from [`Document::load`] instead.
pub struct Document {
    pub registry: ObjectRegistry,
    pub trailer: Dictionary,
    pub warnings: Vec<ParseWarning>,
    pub recovered_via_brute_force: bool,
    /// Whether the file's first indirect object is a linearization
    /// dictionary (`/Linearized`), i.e. a web-optimized layout.
    pub linearized: bool,
    /// Whether `/Encrypt` was present in the trailer at load time. Compared
    /// against the current trailer by [`crate::writer::write_incremental`]
    /// to detect encryption being added or removed.
    pub encrypted_at_load: bool,
}

impl Document {
    pub fn load(bytes: Vec<u8>) -> Result<Document, LoadError> {
        let resolution = xref::resolve(&bytes)?;
        let mut warnings = resolution.warnings;
        if resolution.trailer.get_ref(b"Root").is_none() {
            return Err(LoadError::NoRoot);
        }
        let recovered = resolution.recovered_via_brute_force;
        let linearized = is_linearized(&bytes);
        let encrypted_at_load = resolution.trailer.contains_key(b"Encrypt");
        let registry = ObjectRegistry::new(bytes, resolution.table);
        warnings.dedup();
        Ok(Document {
            registry,
            trailer: resolution.trailer,
            warnings,
            recovered_via_brute_force: recovered,
            linearized,
            encrypted_at_load,
        })
    }

    pub fn catalog(&mut self) -> Result<Dictionary, crate::error::PdfError> {
        let root = self
            .trailer
            .get_ref(b"Root")
            .ok_or(LoadError::NoRoot)?;
        let obj = self.registry.resolve(root)?;
        obj.as_dict()
            .cloned()
            .ok_or(crate::error::PdfError::TypeMismatch(root, "Dictionary"))
    }
}

fn next_tok(s: &mut Scanner) -> Option<Token> {
    s.next_token().ok().flatten()
}

/// A linearized (web-optimized) file carries its linearization dictionary
/// as the very first indirect object, right after the `%PDF-X.Y` header
/// line. Detecting it here (rather than during xref resolution, which never
/// needs to look at file order) lets the writer refuse an incremental save
/// that would corrupt the hint tables.
fn is_linearized(source: &[u8]) -> bool {
    let Some(header_start) = source.windows(5).position(|w| w == b"%PDF-") else {
        return false;
    };
    let header_end = source[header_start..]
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map(|p| header_start + p)
        .unwrap_or(source.len());

    let mut scanner = Scanner::at(source, header_end);
    scanner.skip_whitespace_and_comments();
    let start = scanner.pos();
    matches!(
        parse_raw_indirect_object(source, start),
        Some((_, _, dict, _)) if dict.contains_key(b"Linearized")
    )
}

/// Parses `N G obj ... endobj` at `offset` without any xref context.
/// Returns the object number, generation, its dictionary form (empty if the
/// object isn't dict-shaped), and the raw stream payload (empty if it isn't
/// a stream). Used both by the xref-stream path and by brute-force
/// recovery, neither of which can assume a working xref yet.
pub fn parse_raw_indirect_object(
    buf: &[u8],
    offset: usize,
) -> Option<(u32, u16, Dictionary, Vec<u8>)> {
    let mut scanner = Scanner::at(buf, offset);
    let num = match next_tok(&mut scanner)? {
        Token::Integer(n) if n >= 0 => n as u32,
        _ => return None,
    };
    let gen = match next_tok(&mut scanner)? {
        Token::Integer(n) if n >= 0 => n as u16,
        _ => return None,
    };
    match next_tok(&mut scanner)? {
        Token::Keyword(kw) if kw == b"obj" => {}
        _ => return None,
    }

    let mut parser = ObjectParser::new(Scanner::at(buf, scanner.pos()));
    let obj = parser.parse_object().ok()?;
    let dict = obj.as_dict().cloned().unwrap_or_default();
    let mut cursor = Scanner::at(buf, parser.scanner.pos());

    cursor.skip_whitespace_and_comments();
    if !cursor.remaining().starts_with(b"stream") {
        return Some((num, gen, dict, Vec::new()));
    }
    cursor.seek(cursor.pos() + b"stream".len());
    // EOL after the `stream` keyword is exactly CRLF or LF.
    if cursor.peek() == Some(b'\r') {
        cursor.seek(cursor.pos() + 1);
    }
    if cursor.peek() == Some(b'\n') {
        cursor.seek(cursor.pos() + 1);
    }
    let data_start = cursor.pos();

    let data_end = match dict.get(b"Length").and_then(Object::as_integer) {
        Some(len) if len >= 0 && data_start + len as usize <= buf.len() => {
            data_start + len as usize
        }
        _ => find_endstream(buf, data_start).unwrap_or(buf.len()),
    };
    // Tolerate a `/Length` that undershoots or overshoots by verifying the
    // `endstream` keyword actually follows; fall back to scanning for it.
    let data_end = if endstream_follows(buf, data_end) {
        data_end
    } else {
        find_endstream(buf, data_start).unwrap_or(data_end)
    };

    Some((num, gen, dict, buf[data_start..data_end].to_vec()))
}

fn endstream_follows(buf: &[u8], pos: usize) -> bool {
    let mut s = Scanner::at(buf, pos);
    s.skip_whitespace_and_comments();
    s.remaining().starts_with(b"endstream")
}

fn find_endstream(buf: &[u8], from: usize) -> Option<usize> {
    let needle = b"endstream";
    let rel = buf[from..]
        .windows(needle.len())
        .position(|w| w == needle)?;
    let mut end = from + rel;
    // Trim the single EOL the writer inserted before `endstream`.
    if end > from && buf[end - 1] == b'\n' {
        end -= 1;
        if end > from && buf[end - 1] == b'\r' {
            end -= 1;
        }
    }
    Some(end)
}

/// Applies the `/Filter` chain (with matching `/DecodeParms`) to a stream's
/// raw payload.
pub fn decode_stream_payload(
    dict: &Dictionary,
    raw: &[u8],
) -> Result<Vec<u8>, crate::filters::FilterError> {
    let names = filter_names(dict);
    let params = filter_params_list(dict, names.len());
    let mut data = raw.to_vec();
    for (name, p) in names.iter().zip(params.iter()) {
        data = decode_filter(name, &data, p)?;
    }
    Ok(data)
}

fn filter_names(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Some(Object::Name(n)) => vec![String::from_utf8_lossy(n).into_owned()],
        Some(Object::Array(arr)) => arr
            .iter()
            .filter_map(Object::as_name)
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}

fn filter_params_list(dict: &Dictionary, count: usize) -> Vec<FilterParams> {
    let parse_one = |o: &Object| match o.as_dict() {
        Some(d) => FilterParams {
            predictor: d.get_integer(b"Predictor").unwrap_or(1),
            columns: d.get_integer(b"Columns").unwrap_or(1),
            colors: d.get_integer(b"Colors").unwrap_or(1),
            bits_per_component: d.get_integer(b"BitsPerComponent").unwrap_or(8),
            early_change: d.get_integer(b"EarlyChange").unwrap_or(1) != 0,
        },
        None => FilterParams::none(),
    };
    let mut v = match dict.get(b"DecodeParms").or_else(|| dict.get(b"DP")) {
        Some(Object::Array(arr)) => arr.iter().map(parse_one).collect(),
        Some(o @ Object::Dictionary(_)) => vec![parse_one(o)],
        _ => Vec::new(),
    };
    v.resize(count, FilterParams::none());
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_stream_object_with_correct_length() {
        let buf = b"7 0 obj\n<< /Length 5 /Filter /ASCIIHexDecode >>\nstream\n48656C6C6F>\nendstream\nendobj\n";
        let (num, gen, dict, payload) = parse_raw_indirect_object(buf, 0).unwrap();
        assert_eq!((num, gen), (7, 0));
        assert_eq!(dict.get_name(b"Filter"), Some(&b"ASCIIHexDecode"[..]));
        assert_eq!(&payload, b"48656");
    }

    #[test]
    fn recovers_stream_bounds_when_length_is_wrong() {
        let buf = b"7 0 obj\n<< /Length 999 >>\nstream\nhello\nendstream\nendobj\n";
        let (_, _, _, payload) = parse_raw_indirect_object(buf, 0).unwrap();
        assert_eq!(&payload, b"hello");
    }

    #[test]
    fn decodes_chained_filters() {
        let mut dict = Dictionary::new();
        dict.set(
            "Filter",
            Object::Array(vec![Object::name("ASCIIHexDecode")]),
        );
        let decoded = decode_stream_payload(&dict, b"48656C6C6F>").unwrap();
        assert_eq!(decoded, b"Hello");
    }
}
