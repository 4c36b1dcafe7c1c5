//! End-to-end scenarios exercising the public load/mutate/save surface
//! together, rather than any single module in isolation.

use pdf_core::object::Object;
use pdf_core::{Document, WriterConfig};

fn minimal_catalog_pdf() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"%PDF-1.7\n");
    let obj1 = buf.len();
    buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
    let obj2 = buf.len();
    buf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");
    let obj3 = buf.len();
    buf.extend_from_slice(
        b"3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>\nendobj\n",
    );
    let xref_off = buf.len();
    buf.extend_from_slice(b"xref\n0 4\n0000000000 65535 f \n");
    for off in [obj1, obj2, obj3] {
        buf.extend_from_slice(format!("{:010} 00000 n \n", off).as_bytes());
    }
    buf.extend_from_slice(b"trailer\n<< /Size 4 /Root 1 0 R >>\n");
    buf.extend_from_slice(format!("startxref\n{}\n%%EOF\n", xref_off).as_bytes());
    buf
}

// S1 — round trip a minimal document: reload preserves the catalog/pages
// structure and the page's media box.
#[test]
fn round_trips_a_minimal_catalog_and_page_tree() {
    let mut doc = Document::load(minimal_catalog_pdf()).unwrap();
    let catalog = doc.catalog().unwrap();
    assert_eq!(catalog.get_ref(b"Pages"), Some((2, 0)));

    let rewritten = pdf_core::write_complete(&doc, &WriterConfig::new()).unwrap();
    let mut doc2 = Document::load(rewritten).unwrap();
    let catalog2 = doc2.catalog().unwrap();
    let pages = doc2.registry.resolve(catalog2.get_ref(b"Pages").unwrap()).unwrap();
    let kids = pages.as_dict().unwrap().get_array(b"Kids").unwrap();
    assert_eq!(kids.len(), 1);
    let page = doc2.registry.resolve(kids[0].as_reference().unwrap()).unwrap();
    let media_box = page.as_dict().unwrap().get_array(b"MediaBox").unwrap();
    let w = media_box[2].as_f64().unwrap();
    let h = media_box[3].as_f64().unwrap();
    assert!((w - 612.0).abs() < 0.01);
    assert!((h - 792.0).abs() < 0.01);
}

// S2 — incremental edit: the previous bytes are an unmodified prefix, the
// file grows, and every other object is still reachable unchanged.
#[test]
fn incremental_save_preserves_original_prefix_and_untouched_objects() {
    let original = minimal_catalog_pdf();
    let mut doc = Document::load(original.clone()).unwrap();
    doc.registry.set(
        (3, 0),
        Object::Dictionary({
            let mut d = pdf_core::Dictionary::new();
            d.set("Type", Object::name("Page"));
            d.set("Parent", Object::Reference((2, 0)));
            d.set("MediaBox", Object::Array(vec![
                Object::Integer(0), Object::Integer(0), Object::Integer(300), Object::Integer(300),
            ]));
            d
        }),
    );
    let updated = pdf_core::write_incremental(&doc, &WriterConfig::new()).unwrap();
    assert_eq!(&updated[..original.len()], &original[..]);
    assert!(updated.len() > original.len());
    assert!(updated.ends_with(b"%%EOF"));

    let mut doc2 = Document::load(updated).unwrap();
    let catalog = doc2.catalog().unwrap();
    assert_eq!(catalog.get_ref(b"Pages"), Some((2, 0)));
    let page3 = doc2.registry.resolve((3, 0)).unwrap();
    let box3 = page3.as_dict().unwrap().get_array(b"MediaBox").unwrap();
    assert_eq!(box3[2].as_integer(), Some(300));
}

// S6 — xref-stream output: the rewritten file advertises /Type /XRef and
// carries no classic-table header line; reloading yields the same page
// count as before.
#[test]
fn xref_stream_output_has_no_classic_header_and_round_trips() {
    let doc = Document::load(minimal_catalog_pdf()).unwrap();
    let rewritten = pdf_core::write_complete(&doc, &WriterConfig::new().with_xref_stream(true)).unwrap();
    let text = String::from_utf8_lossy(&rewritten);
    assert!(text.contains("/Type") && text.contains("/XRef"));
    assert!(!text.contains("\nxref\n") && !text.starts_with("xref\n"));

    let mut doc2 = Document::load(rewritten).unwrap();
    let catalog2 = doc2.catalog().unwrap();
    let pages2 = doc2.registry.resolve(catalog2.get_ref(b"Pages").unwrap()).unwrap();
    assert_eq!(pages2.as_dict().unwrap().get_integer(b"Count"), Some(1));
}

// Every freshly written xref section has object 0 exactly once, free, with
// generation 65535 (property 7).
#[test]
fn object_zero_is_always_the_sole_free_head() {
    let doc = Document::load(minimal_catalog_pdf()).unwrap();
    for use_xref_stream in [false, true] {
        let rewritten = pdf_core::write_complete(&doc, &WriterConfig::new().with_xref_stream(use_xref_stream)).unwrap();
        let resolution = pdf_core::xref::resolve(&rewritten).unwrap();
        assert_eq!(
            resolution.table.entries.get(&0),
            Some(&pdf_core::xref::XRefEntry::Free { gen: 65535 })
        );
    }
}

// A recovered (brute-forced) document refuses incremental save, while a
// normally parsed one allows it.
#[test]
fn recovered_documents_cannot_be_saved_incrementally() {
    let broken = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n%%EOF".to_vec();
    let mut broken_doc = Document::load(broken).unwrap();
    assert!(broken_doc.recovered_via_brute_force);
    broken_doc.registry.mark_dirty((1, 0));
    assert!(pdf_core::write_incremental(&broken_doc, &WriterConfig::new()).is_err());

    let mut clean_doc = Document::load(minimal_catalog_pdf()).unwrap();
    assert!(!clean_doc.recovered_via_brute_force);
    clean_doc.registry.set((1, 0), clean_doc.registry.resolve((1, 0)).unwrap());
    assert!(pdf_core::write_incremental(&clean_doc, &WriterConfig::new()).is_ok());
}
