//! The eight PDF object kinds plus indirect references.
//!
//! `Object` is a tagged sum, matched directly rather than dispatched through
//! a trait hierarchy — operations live as `impl` methods or free functions
//! that pattern-match on the variant.

use std::fmt;

/// `(object_number, generation)` — a handle, never an owner. Dereference
/// always goes through a registry.
pub type ObjectId = (u32, u16);

/// Surface form a `String` object was read in (or should be written in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Literal,
    Hex,
}

/// One PDF object. `Stream` carries its dictionary and decoded-filter-free
/// (raw, still encoded) payload; decoding is applied lazily by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    /// A finite real. Integers round-trip without a decimal point; see
    /// [`crate::serializer::format_number`] for the formatting rule.
    Integer(i64),
    Real(f64),
    /// Decoded name bytes; `#XX` escapes are only a surface form and are
    /// never retained in this representation.
    Name(Vec<u8>),
    String(Vec<u8>, StringFormat),
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Stream(Stream),
    Reference(ObjectId),
}

impl Object {
    pub fn string_literal(s: impl Into<Vec<u8>>) -> Object {
        Object::String(s.into(), StringFormat::Literal)
    }

    pub fn name(s: impl Into<Vec<u8>>) -> Object {
        Object::Name(s.into())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            Object::Real(r) => Some(*r as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&[u8]> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str_name(&self) -> Option<&str> {
        self.as_name().and_then(|n| std::str::from_utf8(n).ok())
    }

    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&mut s.dict),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectId> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Object::Stream(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stream_mut(&mut self) -> Option<&mut Stream> {
        match self {
            Object::Stream(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str_bytes(&self) -> Option<&[u8]> {
        match self {
            Object::String(s, _) => Some(s),
            _ => None,
        }
    }
}

/// An indirect-object body plus its raw (still filter-encoded) payload.
///
/// `/Length` is never stored: it is derived from `payload.len()` at
/// serialization time. The decoded form is cached
/// separately once filters are applied (see [`crate::parser::Document`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub dict: Dictionary,
    pub payload: Vec<u8>,
}

impl Stream {
    pub fn new(dict: Dictionary, payload: Vec<u8>) -> Stream {
        Stream { dict, payload }
    }
}

/// Insertion-ordered `Name -> Object` mapping. Keys are unique: overwriting
/// an existing key updates the value in place without moving it to the end,
/// and entry order survives a load -> save round-trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(Vec<u8>, Object)>,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary { entries: Vec::new() }
    }

    fn index_of(&self, key: &[u8]) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Inserts or overwrites `key`. Overwriting preserves the key's existing
    /// position; a brand-new key is appended.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: Object) -> &mut Self {
        let key = key.into();
        match self.index_of(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Object> {
        self.index_of(key).map(|i| self.entries.remove(i).1)
    }

    pub fn get(&self, key: &[u8]) -> Option<&Object> {
        self.index_of(key).map(|i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.index_of(key).is_some()
    }

    pub fn get_name(&self, key: &[u8]) -> Option<&[u8]> {
        self.get(key).and_then(Object::as_name)
    }

    pub fn get_number(&self, key: &[u8]) -> Option<f64> {
        self.get(key).and_then(Object::as_f64)
    }

    pub fn get_integer(&self, key: &[u8]) -> Option<i64> {
        self.get(key).and_then(Object::as_integer)
    }

    pub fn get_array(&self, key: &[u8]) -> Option<&[Object]> {
        self.get(key).and_then(Object::as_array)
    }

    pub fn get_dict(&self, key: &[u8]) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }

    pub fn get_ref(&self, key: &[u8]) -> Option<ObjectId> {
        self.get(key).and_then(Object::as_reference)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Object)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<<")?;
        for (k, v) in self.iter() {
            write!(f, " /{} {:?}", String::from_utf8_lossy(k), v)?;
        }
        write!(f, " >>")
    }
}

/// Builds a [`Dictionary`] from `"key" => value` pairs.
#[macro_export]
macro_rules! dictionary {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut dict = $crate::object::Dictionary::new();
        $(
            dict.set($key, $crate::object::Object::from($value));
        )*
        dict
    }};
}

impl From<&str> for Object {
    fn from(s: &str) -> Object {
        Object::Name(s.as_bytes().to_vec())
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Object {
        Object::Integer(i)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Object {
        Object::Integer(i as i64)
    }
}

impl From<f64> for Object {
    fn from(r: f64) -> Object {
        Object::Real(r)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Object {
        Object::Boolean(b)
    }
}

impl From<ObjectId> for Object {
    fn from(r: ObjectId) -> Object {
        Object::Reference(r)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Object {
        Object::Dictionary(d)
    }
}
