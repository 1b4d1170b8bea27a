//! Document codec seam.
//!
//! The splitter only ever talks to a [`Codec`]: it opens a document as a
//! [`PageSource`] and builds each part through a fresh [`PageSink`]. Exactly
//! one concrete PDF codec is compiled in, selected by cargo feature, and
//! [`bind`] hands it out once at startup.

pub mod memory;
#[cfg(feature = "lopdf")]
pub mod pdf;

use crate::error::Result;
#[cfg(not(feature = "lopdf"))]
use crate::error::PdfSplitterError;
use std::path::Path;
use tracing::info;

pub use memory::{MemoryCodec, MemoryDocument, MemoryPage, MemorySink};
#[cfg(feature = "lopdf")]
pub use pdf::{PdfCodec, PdfPage, PdfSink, PdfSource};

/// An opened document: a page count and random access to pages.
pub trait PageSource {
    type Page;

    fn page_count(&self) -> usize;

    /// Returns a copy of the page at `index`. The source is left untouched.
    fn page(&self, index: usize) -> Result<Self::Page>;
}

/// An output document under construction.
pub trait PageSink {
    type Page;

    fn append(&mut self, page: Self::Page) -> Result<()>;

    fn page_count(&self) -> usize;

    /// Serializes the document to `path`, replacing any existing file.
    fn save(self, path: &Path) -> Result<()>
    where
        Self: Sized;
}

pub trait Codec {
    type Page;
    type Source: PageSource<Page = Self::Page>;
    type Sink: PageSink<Page = Self::Page>;

    fn name(&self) -> &'static str;

    fn open(&self, path: &Path) -> Result<Self::Source>;

    fn create(&self) -> Self::Sink;
}

#[cfg(feature = "lopdf")]
pub type BoundCodec = PdfCodec;
#[cfg(not(feature = "lopdf"))]
pub type BoundCodec = MemoryCodec;

/// Binds the PDF codec compiled into this build.
#[cfg(feature = "lopdf")]
pub fn bind() -> Result<BoundCodec> {
    let codec = PdfCodec::default();
    info!("Using document codec: {}", codec.name());
    Ok(codec)
}

/// Binds the PDF codec compiled into this build.
#[cfg(not(feature = "lopdf"))]
pub fn bind() -> Result<BoundCodec> {
    info!("No PDF codec compiled in");
    Err(PdfSplitterError::CodecUnavailable {
        reason: "built without a PDF codec; rebuild with the `lopdf` feature".to_string(),
    })
}
