//! Object-to-bytes serialization. `/Length` is never trusted
//! from the in-memory object: it is always recomputed from
//! `payload.len()` when a stream is written out.

use crate::object::{Dictionary, Object, ObjectId, Stream, StringFormat};

/// Formats a PDF number: integers print without a decimal point; reals
/// print with at most 5 fractional digits, trailing zeros trimmed, never in
/// scientific notation (PDF has no exponent syntax).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let mut s = format!("{:.5}", n);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

fn escape_name(name: &[u8]) -> Vec<u8> {
    let mut out = vec![b'/'];
    for &b in name {
        let needs_escape = b < 0x21
            || b > 0x7e
            || matches!(
                b,
                b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
            );
        if needs_escape {
            out.push(b'#');
            out.extend_from_slice(format!("{:02X}", b).as_bytes());
        } else {
            out.push(b);
        }
    }
    out
}

fn escape_literal_string(s: &[u8]) -> Vec<u8> {
    let mut out = vec![b'('];
    for &b in s {
        match b {
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            0x00..=0x08 | 0x0b | 0x0c | 0x0e..=0x1f | 0x7f => {
                out.extend_from_slice(format!("\\{:03o}", b).as_bytes());
            }
            other => out.push(other),
        }
    }
    out.push(b')');
    out
}

fn encode_hex_string(s: &[u8]) -> Vec<u8> {
    let mut out = vec![b'<'];
    for &b in s {
        out.extend_from_slice(format!("{:02X}", b).as_bytes());
    }
    out.push(b'>');
    out
}

/// Writes `obj` in its direct (non-indirect) textual form. References are
/// written as `N G R`; streams must be written through
/// [`write_indirect_object`] since a bare stream cannot appear nested
/// inside another object.
pub fn write_object(out: &mut Vec<u8>, obj: &Object) {
    match obj {
        Object::Null => out.extend_from_slice(b"null"),
        Object::Boolean(true) => out.extend_from_slice(b"true"),
        Object::Boolean(false) => out.extend_from_slice(b"false"),
        Object::Integer(i) => out.extend_from_slice(i.to_string().as_bytes()),
        Object::Real(r) => out.extend_from_slice(format_number(*r).as_bytes()),
        Object::Name(n) => out.extend_from_slice(&escape_name(n)),
        Object::String(s, StringFormat::Literal) => out.extend_from_slice(&escape_literal_string(s)),
        Object::String(s, StringFormat::Hex) => out.extend_from_slice(&encode_hex_string(s)),
        Object::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                write_object(out, item);
            }
            out.push(b']');
        }
        Object::Dictionary(d) => write_dict(out, d),
        Object::Stream(s) => write_dict(out, &stream_dict_with_length(s)),
        Object::Reference((num, gen)) => {
            out.extend_from_slice(format!("{} {} R", num, gen).as_bytes());
        }
    }
}

/// `/Length` is forced as the first entry, replacing any prior `/Length`
/// regardless of where it sat in the source dictionary.
fn stream_dict_with_length(s: &Stream) -> Dictionary {
    let mut d = Dictionary::new();
    d.set("Length", Object::Integer(s.payload.len() as i64));
    for (k, v) in s.dict.iter() {
        if k != b"Length" {
            d.set(k.to_vec(), v.clone());
        }
    }
    d
}

fn write_dict(out: &mut Vec<u8>, dict: &Dictionary) {
    out.extend_from_slice(b"<<");
    for (k, v) in dict.iter() {
        out.push(b' ');
        out.extend_from_slice(&escape_name(k));
        out.push(b' ');
        write_object(out, v);
    }
    out.extend_from_slice(b" >>");
}

/// Writes a full indirect object: `N G obj\n<body>\nendobj\n`. Streams get
/// their dictionary (with a freshly computed `/Length`) followed by
/// `stream\n<payload>\nendstream`.
pub fn write_indirect_object(out: &mut Vec<u8>, id: ObjectId, obj: &Object) {
    out.extend_from_slice(format!("{} {} obj\n", id.0, id.1).as_bytes());
    match obj {
        Object::Stream(s) => {
            write_dict(out, &stream_dict_with_length(s));
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(&s.payload);
            out.extend_from_slice(b"\nendstream");
        }
        other => write_object(out, other),
    }
    out.extend_from_slice(b"\nendobj\n");
}
