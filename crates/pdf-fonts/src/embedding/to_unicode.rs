//! ToUnicode CMap generation: writes the PostScript CMap stream that lets
//! text-extraction tools map a font's CIDs back to Unicode.

use pdf_core::dictionary;
use pdf_core::object::{Object, ObjectId, Stream};
use pdf_core::registry::ObjectRegistry;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

use super::compression::compress_bytes;
use super::EmbedError;

/// Creates the ToUnicode CMap stream for text extraction.
///
/// For Identity-H encoding, CID = Unicode codepoint, so the mapping
/// written here is the identity mapping restricted to the CIDs the font
/// actually contains.
pub fn create_to_unicode_cmap(
    registry: &mut ObjectRegistry,
    cid_to_gid: &BTreeMap<u32, u16>,
) -> Result<ObjectId, EmbedError> {
    let cmap_content = generate_cmap_content(cid_to_gid);
    let compressed = compress_bytes(cmap_content.as_bytes());

    let stream = Object::Stream(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        compressed,
    ));

    Ok(registry.register(stream))
}

fn generate_cmap_content(cid_to_gid: &BTreeMap<u32, u16>) -> String {
    let estimated_size = 200 + (cid_to_gid.len() * 20) + 70;
    let mut cmap = String::with_capacity(estimated_size);
    cmap.push_str(CMAP_HEADER);

    let cids: Vec<_> = cid_to_gid.keys().filter(|&&cid| cid > 0).collect();
    if !cids.is_empty() {
        let _ = writeln!(&mut cmap, "{} beginbfchar", cids.len());
        for &cid in &cids {
            let _ = writeln!(&mut cmap, "<{:04X}> <{:04X}>", cid, cid);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(CMAP_FOOTER);
    cmap
}

const CMAP_HEADER: &str = "/CIDInit /ProcSet findresource begin\n\
12 dict begin\n\
begincmap\n\
/CIDSystemInfo\n\
<< /Registry (Adobe)\n\
   /Ordering (UCS)\n\
   /Supplement 0\n\
>> def\n\
/CMapName /Adobe-Identity-UCS def\n\
/CMapType 2 def\n\
1 begincodespacerange\n\
<0000> <FFFF>\n\
endcodespacerange\n";

const CMAP_FOOTER: &str = "endcmap\n\
CMapName currentdict /CMap defineresource pop\n\
end\n\
end";
