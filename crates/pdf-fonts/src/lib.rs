//! Font-side support for the PDF engine: descriptors, encodings, CMaps,
//! the simple/composite font models, and the TrueType embedding and
//! subsetting pipeline.
//!
//! # Architecture
//!
//! ## `descriptor`
//! FontDescriptor parsing (flags, metrics, `/FontFile2`/`/FontFile3`).
//!
//! ## `encoding` / `agl` / `standard14`
//! Base encodings plus `/Differences` overlays, the Adobe Glyph List for
//! name-to-Unicode resolution, and compiled-in standard-14 metrics.
//!
//! ## `cmap` / `tounicode`
//! CMap parsing for composite fonts (codespace/cidchar/cidrange) and
//! ToUnicode CMap parsing (bfchar/bfrange) for text extraction.
//!
//! ## `simple_font` / `composite_font`
//! The `get_width`/`to_unicode`/`encode_text` font models used by the
//! content-stream text state.
//!
//! ## `embedding`
//! Embeds TrueType fonts into PDF documents as CIDFont (Type 0) structures,
//! with `/FontFile3` passthrough for non-subsettable CFF/Type1C programs.
//!
//! ## `subsetter`
//! Reduces TrueType font file sizes by extracting only the glyphs used in a
//! document.
//!
//! ## `woff`
//! Decompresses WOFF web fonts to TrueType ahead of embedding. WOFF2 (Brotli
//! compression) is out of scope; see DESIGN.md.
//!
//! # Example
//!
//! ```no_run
//! use pdf_fonts::woff::decompress_woff;
//!
//! let woff_bytes = std::fs::read("font.woff").unwrap();
//! let ttf_bytes = decompress_woff(&woff_bytes).unwrap();
//! // ttf_bytes can now be embedded or subset
//! ```

pub mod agl;
pub mod cmap;
pub mod composite_font;
pub mod descriptor;
pub mod embedding;
pub mod encoding;
pub mod optimizer;
pub mod simple_font;
pub mod standard14;
pub mod subsetter;
#[cfg(test)]
pub(crate) mod test_support;
pub mod tounicode;
pub mod truetype;
pub mod woff;

pub use descriptor::FontDescriptor;
pub use embedding::{embed_font_program, embed_truetype_font, EmbedError, EmbeddedFont};
pub use optimizer::strip_hinting_tables;
pub use subsetter::{subset_font_core, SubsetError, SubsetMetrics};
pub use woff::{decompress_woff, WoffError};
