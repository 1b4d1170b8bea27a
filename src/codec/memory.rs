//! In-memory codec whose pages are strings, serialized as
//! `{"pages": [...]}` JSON.

use super::{Codec, PageSink, PageSource};
use crate::error::{PdfSplitterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub type MemoryPage = String;

#[derive(Debug, Serialize, Deserialize)]
struct PageFile {
    pages: Vec<MemoryPage>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryCodec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<MemoryPage>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    /// Pages labelled `page 1` .. `page n`.
    pub fn numbered(n: usize) -> Self {
        Self::from_pages((1..=n).map(|i| format!("page {}", i)))
    }

    pub fn pages(&self) -> &[MemoryPage] {
        &self.pages
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = PageFile {
            pages: self.pages.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;
        fs::write(path, bytes).map_err(|e| PdfSplitterError::CodecWrite {
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

impl PageSource for MemoryDocument {
    type Page = MemoryPage;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<MemoryPage> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| PdfSplitterError::CodecRead {
                reason: format!(
                    "page index {} out of range (document has {} pages)",
                    index,
                    self.pages.len()
                ),
            })
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    pages: Vec<MemoryPage>,
}

impl PageSink for MemorySink {
    type Page = MemoryPage;

    fn append(&mut self, page: MemoryPage) -> Result<()> {
        self.pages.push(page);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(self, path: &Path) -> Result<()> {
        MemoryDocument { pages: self.pages }.write_to(path)
    }
}

impl Codec for MemoryCodec {
    type Page = MemoryPage;
    type Source = MemoryDocument;
    type Sink = MemorySink;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn open(&self, path: &Path) -> Result<MemoryDocument> {
        let content = fs::read_to_string(path).map_err(|e| PdfSplitterError::CodecRead {
            reason: format!("{}: {}", path.display(), e),
        })?;
        let file: PageFile =
            serde_json::from_str(&content).map_err(|e| PdfSplitterError::CodecRead {
                reason: format!("{}: {}", path.display(), e),
            })?;
        Ok(MemoryDocument { pages: file.pages })
    }

    fn create(&self) -> MemorySink {
        MemorySink::default()
    }
}
