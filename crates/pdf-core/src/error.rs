//! Crate-level error types.
//!
//! `LoadError` covers failures severe enough that no `Document` can be
//! produced at all. Everything recoverable (a malformed stream, a dangling
//! reference, a brute-force recovery) becomes a [`crate::xref::ParseWarning`]
//! collected on the document instead of an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not a PDF file: missing %PDF- header")]
    NotAPdf,
    #[error(transparent)]
    XRef(#[from] crate::xref::XRefError),
    #[error("trailer has no /Root entry and none could be recovered")]
    NoRoot,
    #[error("object {0:?} could not be parsed")]
    MalformedObject(crate::object::ObjectId),
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Filter(#[from] crate::filters::FilterError),
    #[error(transparent)]
    ObjectParse(#[from] crate::object_parser::ObjectParseError),
    #[error("object {0:?} is not present in the document")]
    MissingObject(crate::object::ObjectId),
    #[error("object {0:?} was requested as {1} but holds a different type")]
    TypeMismatch(crate::object::ObjectId, &'static str),
    #[error("refusing to save: {0}")]
    SaveRefused(#[from] crate::writer::SaveRefusal),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
