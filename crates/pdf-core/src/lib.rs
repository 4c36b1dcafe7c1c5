//! Cross-reference, object graph, and serialization core of the PDF engine.
//!
//! Layering, innermost first: [`scanner`] tokenizes bytes, [`object_parser`]
//! turns tokens into [`object::Object`]s, [`xref`] locates every object's
//! offset (or recovers one by brute force), [`registry`] materializes and
//! mutates the object graph lazily, and [`parser::Document`] ties all of
//! that together behind one entry point. [`content`] parses page content
//! streams; [`serializer`], [`xref_writer`], and [`writer`] handle the
//! inverse direction.

pub mod content;
pub mod error;
pub mod filters;
pub mod object;
pub mod object_parser;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod serializer;
pub mod writer;
pub mod xref;
pub mod xref_writer;

pub use error::{LoadError, PdfError};
pub use object::{Dictionary, Object, ObjectId, Stream, StringFormat};
pub use parser::Document;
pub use registry::ObjectRegistry;
pub use writer::{write_complete, write_incremental, SaveRefusal, WriterConfig};
