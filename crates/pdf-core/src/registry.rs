//! Object registry: resolves references against the source buffer and
//! tracks in-memory mutations ahead of a save.

use crate::error::PdfError;
use crate::object::{Dictionary, Object, ObjectId};
use crate::object_parser::ObjectParser;
use crate::parser::{decode_stream_payload, parse_raw_indirect_object};
use crate::scanner::Scanner;
use crate::xref::{XRefEntry, XRefTable};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Holds the original file bytes plus whatever has been loaded or newly
/// created since. Loaded objects are cached lazily the first time they're
/// resolved; new/modified objects live in `new_objects` until a writer
/// commits them.
pub struct ObjectRegistry {
    source: Vec<u8>,
    xref: XRefTable,
    loaded: RefCell<HashMap<ObjectId, Object>>,
    new_objects: HashMap<ObjectId, Object>,
    dirty: HashSet<ObjectId>,
    next_object_num: u32,
}

impl ObjectRegistry {
    pub fn new(source: Vec<u8>, xref: XRefTable) -> ObjectRegistry {
        let next_object_num = xref.entries.keys().copied().max().map_or(1, |m| m + 1);
        ObjectRegistry {
            source,
            xref,
            loaded: RefCell::new(HashMap::new()),
            new_objects: HashMap::new(),
            dirty: HashSet::new(),
            next_object_num,
        }
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn xref(&self) -> &XRefTable {
        &self.xref
    }

    /// Resolves an object, consulting (in order) pending mutations, the
    /// materialized-object cache, and finally the source buffer.
    pub fn resolve(&self, id: ObjectId) -> Result<Object, PdfError> {
        if let Some(obj) = self.new_objects.get(&id) {
            return Ok(obj.clone());
        }
        if let Some(obj) = self.loaded.borrow().get(&id) {
            return Ok(obj.clone());
        }
        let obj = self.materialize(id)?;
        self.loaded.borrow_mut().insert(id, obj.clone());
        Ok(obj)
    }

    /// Resolves a reference, or passes a direct object through unchanged.
    pub fn resolve_object(&self, obj: &Object) -> Result<Object, PdfError> {
        match obj {
            Object::Reference(id) => self.resolve(*id),
            other => Ok(other.clone()),
        }
    }

    fn materialize(&self, id: ObjectId) -> Result<Object, PdfError> {
        match self.xref.entries.get(&id.0) {
            Some(XRefEntry::InUse { offset, .. }) => {
                let (num, gen, _dict, payload) =
                    parse_raw_indirect_object(&self.source, *offset as usize)
                        .ok_or(PdfError::MissingObject(id))?;
                if num != id.0 {
                    return Err(PdfError::MissingObject(id));
                }
                let _ = gen;
                self.materialize_object_body(*offset as usize, payload)
            }
            Some(XRefEntry::Compressed { stream_obj, index }) => {
                self.materialize_compressed(id, *stream_obj, *index)
            }
            Some(XRefEntry::Free { .. }) | None => Err(PdfError::MissingObject(id)),
        }
    }

    fn materialize_object_body(
        &self,
        offset: usize,
        payload: Vec<u8>,
    ) -> Result<Object, PdfError> {
        // Re-parse generically: `parse_raw_indirect_object` only hands back
        // a dictionary, so non-dict objects (e.g. `12 0 obj (a string)
        // endobj`) need their own pass over the object body.
        let mut scanner = Scanner::at(&self.source, offset);
        for _ in 0..3 {
            scanner.next_token().ok();
        }
        let mut parser = ObjectParser::new(scanner);
        let obj = parser.parse_object().map_err(|_| {
            PdfError::MissingObject((0, 0))
        })?;
        match obj {
            Object::Dictionary(d) if !payload.is_empty() || dict_declares_stream(&d) => {
                Ok(Object::Stream(crate::object::Stream::new(d, payload)))
            }
            other => Ok(other),
        }
    }

    fn materialize_compressed(
        &self,
        id: ObjectId,
        stream_obj: u32,
        index: u32,
    ) -> Result<Object, PdfError> {
        let container = self.resolve((stream_obj, 0))?;
        let stream = container
            .as_stream()
            .ok_or(PdfError::MissingObject(id))?;
        let decoded = decode_stream_payload(&stream.dict, &stream.payload)?;
        let n = stream.dict.get_integer(b"N").unwrap_or(0) as usize;
        let first = stream.dict.get_integer(b"First").unwrap_or(0) as usize;

        let mut header_scanner = Scanner::new(&decoded);
        let mut offsets = Vec::with_capacity(n);
        for _ in 0..n {
            let obj_num = match header_scanner.next_token().ok().flatten() {
                Some(crate::scanner::Token::Integer(v)) => v as u32,
                _ => break,
            };
            let rel_offset = match header_scanner.next_token().ok().flatten() {
                Some(crate::scanner::Token::Integer(v)) => v as usize,
                _ => break,
            };
            offsets.push((obj_num, rel_offset));
        }

        let (_, rel_offset) = offsets
            .get(index as usize)
            .copied()
            .ok_or(PdfError::MissingObject(id))?;
        let body_start = first + rel_offset;
        let mut parser = ObjectParser::new(Scanner::at(&decoded, body_start));
        parser
            .parse_object()
            .map_err(|_| PdfError::MissingObject(id))
    }

    /// Assigns a fresh object number, stores `obj`, and marks it dirty.
    pub fn register(&mut self, obj: Object) -> ObjectId {
        let id = (self.next_object_num, 0);
        self.next_object_num += 1;
        self.new_objects.insert(id, obj);
        self.dirty.insert(id);
        id
    }

    /// Overwrites an existing or registers a brand-new object at `id`.
    pub fn set(&mut self, id: ObjectId, obj: Object) {
        self.loaded.borrow_mut().remove(&id);
        self.new_objects.insert(id, obj);
        self.dirty.insert(id);
        if id.0 >= self.next_object_num {
            self.next_object_num = id.0 + 1;
        }
    }

    pub fn mark_dirty(&mut self, id: ObjectId) {
        self.dirty.insert(id);
    }

    pub fn is_dirty(&self, id: ObjectId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn dirty_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.dirty.iter().copied()
    }

    pub fn new_object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.new_objects.keys().copied()
    }

    pub fn all_in_use_ids(&self) -> Vec<ObjectId> {
        let mut ids: HashSet<ObjectId> = self
            .xref
            .entries
            .iter()
            .filter_map(|(&num, e)| match e {
                XRefEntry::InUse { gen, .. } => Some((num, *gen)),
                XRefEntry::Compressed { .. } => Some((num, 0)),
                XRefEntry::Free { .. } => None,
            })
            .collect();
        ids.extend(self.new_objects.keys().copied());
        let mut v: Vec<_> = ids.into_iter().collect();
        v.sort_unstable();
        v
    }

    /// Folds pending mutations into the loaded cache and clears dirty
    /// tracking once a writer has persisted them.
    pub fn commit_new_objects(&mut self) {
        let mut loaded = self.loaded.borrow_mut();
        for (id, obj) in self.new_objects.drain() {
            loaded.insert(id, obj);
        }
        self.dirty.clear();
    }
}

fn dict_declares_stream(d: &Dictionary) -> bool {
    d.contains_key(b"Length")
}
