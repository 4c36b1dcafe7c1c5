//! PDF serialization entry points: a full rewrite and a byte-preserving
//! incremental update.

use crate::object::{Dictionary, Object, ObjectId, Stream};
use crate::parser::Document;
use crate::serializer;
use crate::xref_writer::{self, WriteEntry};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::BTreeMap;
use std::io::Write as _;

#[derive(Debug, thiserror::Error)]
pub enum SaveRefusal {
    #[error("document was recovered via brute-force scanning; its structure is not reliable enough to extend incrementally")]
    RecoveredDocument,
    #[error("document uses a linearized (web-optimized) layout; appending would invalidate its hint tables")]
    Linearized,
    #[error("encryption state changed since the document was loaded")]
    EncryptionChanged,
    #[error("no dirty or new objects to append")]
    NothingToSave,
}

/// Controls how [`write_complete`] and [`write_incremental`] lay out the
/// rewritten cross-reference section. Mirrors the builder-with-`Default`
/// shape used for configuration elsewhere in this engine.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    use_xref_stream: bool,
    object_streams: bool,
}

impl Default for WriterConfig {
    fn default() -> WriterConfig {
        WriterConfig {
            use_xref_stream: false,
            object_streams: false,
        }
    }
}

impl WriterConfig {
    pub fn new() -> WriterConfig {
        WriterConfig::default()
    }

    /// Use a compressed `/Type /XRef` stream instead of a classic table.
    pub fn with_xref_stream(mut self, enabled: bool) -> WriterConfig {
        self.use_xref_stream = enabled;
        self
    }

    /// On a full rewrite, pack eligible non-stream objects into `/ObjStm`
    /// object streams. Implies an xref stream, since classic tables cannot
    /// express compressed entries.
    pub fn with_object_streams(mut self, enabled: bool) -> WriterConfig {
        self.object_streams = enabled;
        self
    }
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .expect("writing to an in-memory buffer cannot fail");
    encoder
        .finish()
        .expect("zlib finish on an in-memory buffer cannot fail")
}

fn carry_over_trailer_fields(doc: &Document, trailer: &mut Dictionary) {
    let keys: [&[u8]; 4] = [b"Root", b"Info", b"ID", b"Encrypt"];
    for key in keys {
        if let Some(v) = doc.trailer.get(key) {
            trailer.set(key, v.clone());
        }
    }
}

/// Rewrites the whole document from scratch: every in-use object is
/// re-serialized in ascending object-number order and a fresh xref section
/// is written. The resulting bytes share no structure with the source file.
pub fn write_complete(doc: &Document, config: &WriterConfig) -> Result<Vec<u8>, crate::error::PdfError> {
    let mut ids = doc.registry.all_in_use_ids();
    ids.retain(|id| id.0 != 0);

    let mut direct_objects = Vec::new();
    let mut compress_candidates = Vec::new();
    for id in ids {
        let obj = doc.registry.resolve(id)?;
        if config.object_streams && id.1 == 0 && !matches!(obj, Object::Stream(_)) {
            compress_candidates.push((id, obj));
        } else {
            direct_objects.push((id, obj));
        }
    }

    let mut out = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut entries: BTreeMap<u32, WriteEntry> = BTreeMap::new();
    let (free_num, free_entry) = xref_writer::free_list_head();
    entries.insert(free_num, free_entry);

    for (id, obj) in &direct_objects {
        let offset = out.len() as u64;
        serializer::write_indirect_object(&mut out, *id, obj);
        entries.insert(id.0, WriteEntry::InUse { offset, gen: id.1 });
    }

    if !compress_candidates.is_empty() {
        let objstm_id = (next_object_num(&entries), 0);
        let (objstm_obj, index_map) = build_object_stream(&compress_candidates);
        let offset = out.len() as u64;
        serializer::write_indirect_object(&mut out, objstm_id, &objstm_obj);
        entries.insert(objstm_id.0, WriteEntry::InUse { offset, gen: 0 });
        for (obj_num, idx) in index_map {
            entries.insert(obj_num, WriteEntry::Compressed { stream_obj: objstm_id.0, index: idx as u32 });
        }
    }

    let mut trailer = Dictionary::new();
    carry_over_trailer_fields(doc, &mut trailer);

    let needs_xref_stream = config.use_xref_stream || !compress_candidates.is_empty();
    if needs_xref_stream {
        let xref_id = (next_object_num(&entries), 0);
        let xref_offset = out.len() as u64;
        entries.insert(xref_id.0, WriteEntry::InUse { offset: xref_offset, gen: 0 });
        trailer.set("Size", Object::Integer((next_object_num(&entries)) as i64));
        let xref_obj = xref_writer::build_xref_stream(&entries, &trailer);
        serializer::write_indirect_object(&mut out, xref_id, &xref_obj);
        out.extend_from_slice(format!("startxref\n{}\n%%EOF", xref_offset).as_bytes());
    } else {
        trailer.set("Size", Object::Integer(next_object_num(&entries) as i64));
        let xref_offset = out.len() as u64;
        out.extend_from_slice(&xref_writer::write_classic_table(&entries));
        out.extend_from_slice(b"trailer\n");
        serializer::write_object(&mut out, &Object::Dictionary(trailer));
        out.extend_from_slice(format!("\nstartxref\n{}\n%%EOF", xref_offset).as_bytes());
    }

    Ok(out)
}

fn next_object_num(entries: &BTreeMap<u32, WriteEntry>) -> u32 {
    entries.keys().copied().max().map_or(1, |m| m + 1)
}

fn build_object_stream(candidates: &[(ObjectId, Object)]) -> (Object, Vec<(u32, usize)>) {
    let mut header = Vec::new();
    let mut body = Vec::new();
    let mut index_map = Vec::with_capacity(candidates.len());
    for (i, (id, obj)) in candidates.iter().enumerate() {
        let rel_offset = body.len();
        serializer::write_object(&mut body, obj);
        body.push(b' ');
        header.extend_from_slice(format!("{} {} ", id.0, rel_offset).as_bytes());
        index_map.push((id.0, i));
    }
    let first = header.len();
    let mut payload = header;
    payload.extend_from_slice(&body);

    let mut dict = Dictionary::new();
    dict.set("Type", Object::name("ObjStm"));
    dict.set("N", Object::Integer(candidates.len() as i64));
    dict.set("First", Object::Integer(first as i64));
    dict.set("Filter", Object::name("FlateDecode"));
    (Object::Stream(Stream::new(dict, deflate(&payload))), index_map)
}

/// Appends only dirty/new objects and a new cross-reference section whose
/// `/Prev` points back at the original file's last `startxref`. The
/// original bytes are never rewritten; this is the byte-preservation
/// invariant a redaction or signature workflow depends on.
pub fn write_incremental(doc: &Document, config: &WriterConfig) -> Result<Vec<u8>, SaveRefusal> {
    if doc.recovered_via_brute_force {
        return Err(SaveRefusal::RecoveredDocument);
    }
    if doc.linearized {
        return Err(SaveRefusal::Linearized);
    }
    if doc.trailer.contains_key(b"Encrypt") != doc.encrypted_at_load {
        return Err(SaveRefusal::EncryptionChanged);
    }
    let dirty: Vec<ObjectId> = doc.registry.dirty_ids().collect();
    if dirty.is_empty() {
        return Err(SaveRefusal::NothingToSave);
    }

    let mut out = doc.registry.source().to_vec();
    if out.last() != Some(&b'\n') {
        out.push(b'\n');
    }

    let mut entries: BTreeMap<u32, WriteEntry> = BTreeMap::new();
    for id in &dirty {
        let obj = doc
            .registry
            .resolve(*id)
            .map_err(|_| SaveRefusal::NothingToSave)?;
        let offset = out.len() as u64;
        serializer::write_indirect_object(&mut out, *id, &obj);
        entries.insert(id.0, WriteEntry::InUse { offset, gen: id.1 });
    }

    let highest_existing = doc
        .registry
        .xref()
        .entries
        .keys()
        .copied()
        .chain(entries.keys().copied())
        .max()
        .unwrap_or(0);
    let prev_offset = crate::xref::find_startxref(doc.registry.source());

    let mut trailer = Dictionary::new();
    carry_over_trailer_fields(doc, &mut trailer);
    if let Some(prev) = prev_offset {
        trailer.set("Prev", Object::Integer(prev as i64));
    }

    if config.use_xref_stream {
        let xref_id = (highest_existing + 1, 0);
        let xref_offset = out.len() as u64;
        entries.insert(xref_id.0, WriteEntry::InUse { offset: xref_offset, gen: 0 });
        trailer.set("Size", Object::Integer((xref_id.0 + 1) as i64));
        let xref_obj = xref_writer::build_xref_stream(&entries, &trailer);
        serializer::write_indirect_object(&mut out, xref_id, &xref_obj);
        out.extend_from_slice(format!("startxref\n{}\n%%EOF", xref_offset).as_bytes());
    } else {
        trailer.set("Size", Object::Integer((highest_existing + 1) as i64));
        let xref_offset = out.len() as u64;
        out.extend_from_slice(&xref_writer::write_classic_table(&entries));
        out.extend_from_slice(b"trailer\n");
        serializer::write_object(&mut out, &Object::Dictionary(trailer));
        out.extend_from_slice(format!("\nstartxref\n{}\n%%EOF", xref_offset).as_bytes());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    fn tiny_pdf() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.7\n");
        let obj1_off = buf.len();
        buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
        let obj2_off = buf.len();
        buf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n");
        let xref_off = buf.len();
        buf.extend_from_slice(b"xref\n0 3\n0000000000 65535 f \n");
        buf.extend_from_slice(format!("{:010} 00000 n \n", obj1_off).as_bytes());
        buf.extend_from_slice(format!("{:010} 00000 n \n", obj2_off).as_bytes());
        buf.extend_from_slice(b"trailer\n<< /Size 3 /Root 1 0 R >>\n");
        buf.extend_from_slice(format!("startxref\n{}\n%%EOF\n", xref_off).as_bytes());
        buf
    }

    #[test]
    fn complete_rewrite_round_trips_through_the_real_parser() {
        let doc = Document::load(tiny_pdf()).unwrap();
        let rewritten = write_complete(&doc, &WriterConfig::new()).unwrap();
        let doc2 = Document::load(rewritten).unwrap();
        assert_eq!(doc2.trailer.get_ref(b"Root"), Some((1, 0)));
    }

    #[test]
    fn complete_rewrite_with_xref_stream_round_trips() {
        let doc = Document::load(tiny_pdf()).unwrap();
        let rewritten = write_complete(&doc, &WriterConfig::new().with_xref_stream(true)).unwrap();
        let doc2 = Document::load(rewritten).unwrap();
        assert_eq!(doc2.trailer.get_ref(b"Root"), Some((1, 0)));
    }

    #[test]
    fn incremental_save_preserves_original_bytes_as_a_prefix() {
        let original = tiny_pdf();
        let mut doc = Document::load(original.clone()).unwrap();
        doc.registry.set((2, 0), Object::Dictionary({
            let mut d = crate::object::Dictionary::new();
            d.set("Type", Object::name("Pages"));
            d.set("Kids", Object::Array(vec![]));
            d.set("Count", Object::Integer(5));
            d
        }));
        let updated = write_incremental(&doc, &WriterConfig::new()).unwrap();
        assert!(updated.starts_with(&original));

        let doc2 = Document::load(updated).unwrap();
        let obj = doc2.registry.resolve((2, 0)).unwrap();
        assert_eq!(obj.as_dict().unwrap().get_integer(b"Count"), Some(5));
    }

    #[test]
    fn incremental_save_on_recovered_document_is_refused() {
        let broken = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n%%EOF".to_vec();
        let mut doc = Document::load(broken).unwrap();
        assert!(doc.recovered_via_brute_force);
        doc.registry.mark_dirty((1, 0));
        assert!(matches!(
            write_incremental(&doc, &WriterConfig::new()),
            Err(SaveRefusal::RecoveredDocument)
        ));
    }

    #[test]
    fn incremental_save_with_no_dirty_objects_is_refused() {
        let doc = Document::load(tiny_pdf()).unwrap();
        assert!(matches!(
            write_incremental(&doc, &WriterConfig::new()),
            Err(SaveRefusal::NothingToSave)
        ));
    }

    #[test]
    fn incremental_save_on_linearized_document_is_refused() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.7\n");
        let lin_off = buf.len();
        buf.extend_from_slice(b"1 0 obj\n<< /Linearized 1 /L 1234 >>\nendobj\n");
        let obj2_off = buf.len();
        buf.extend_from_slice(b"2 0 obj\n<< /Type /Catalog /Pages 3 0 R >>\nendobj\n");
        let obj3_off = buf.len();
        buf.extend_from_slice(b"3 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n");
        let xref_off = buf.len();
        buf.extend_from_slice(b"xref\n0 4\n0000000000 65535 f \n");
        for off in [lin_off, obj2_off, obj3_off] {
            buf.extend_from_slice(format!("{:010} 00000 n \n", off).as_bytes());
        }
        buf.extend_from_slice(b"trailer\n<< /Size 4 /Root 2 0 R >>\n");
        buf.extend_from_slice(format!("startxref\n{}\n%%EOF\n", xref_off).as_bytes());

        let mut doc = Document::load(buf).unwrap();
        assert!(doc.linearized);
        doc.registry.mark_dirty((2, 0));
        assert!(matches!(
            write_incremental(&doc, &WriterConfig::new()),
            Err(SaveRefusal::Linearized)
        ));
    }

    #[test]
    fn incremental_save_refuses_when_encryption_is_added() {
        let mut doc = Document::load(tiny_pdf()).unwrap();
        doc.registry.mark_dirty((1, 0));
        doc.trailer.set("Encrypt", Object::Reference((9, 0)));
        assert!(matches!(
            write_incremental(&doc, &WriterConfig::new()),
            Err(SaveRefusal::EncryptionChanged)
        ));
    }
}
