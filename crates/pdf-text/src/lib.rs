//! Text-side support for the PDF engine: content-stream matrices and text
//! state, glyph extraction, line grouping, and search.
//!
//! # Architecture
//!
//! ## `matrix` / `state`
//! Row-form affine matrices and the graphics/text state a content stream
//! drives (`cm`, `BT`/`ET`, `Tm`/`Td`/`TD`/`T*`, `Tc`/`Tw`/`Tz`/`TL`/`Ts`).
//!
//! ## `extractor`
//! Walks a decoded content stream and turns `Tj`/`TJ`/`'`/`"` into
//! positioned, resolved-to-Unicode glyph records.
//!
//! ## `line_grouper`
//! Groups an unordered bag of glyphs into baseline-aligned lines and
//! font/size spans, synthesizing space glyphs across wide gaps.
//!
//! ## `search`
//! Substring and regex search over a page's plain text, re-expressed as
//! per-character glyph rectangles.

pub mod error;
pub mod extractor;
pub mod line_grouper;
pub mod matrix;
pub mod search;
pub mod state;

pub use error::{ExtractError, SearchError};
pub use extractor::{extract_glyphs, GlyphRecord, Rect, ResolvedFont};
pub use line_grouper::{group_lines, plain_text, Line, Span};
pub use matrix::Matrix;
pub use search::{search, search_pages, SearchMatch, SearchOptions};
pub use state::{GraphicsState, TextState};
