//! # PDF Splitter Library
//!
//! Splits a multi-page document into consecutive parts holding a fixed
//! number of pages each, one output file per part named
//! `part_NNN_pages_A-B.pdf`. The document format is handled by a pluggable
//! [`codec::Codec`]; the PDF codec is built on `lopdf`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pdf_splitter::{codec, DocumentSplitter, SplitConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let codec = codec::bind()?;
//!     let splitter = DocumentSplitter::new(codec, SplitConfig::default());
//!
//!     let result = splitter.split_file(Path::new("RUSHLP.pdf"))?;
//!
//!     println!("Created {} part files", result.parts_created());
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use error::{PdfSplitterError, Result};
pub use services::{DocumentSplitter, OutputInspector};
pub use types::{
    LayoutCheck, OutputLayout, PartFile, PartRange, SplitConfig, SplitPlan, SplitReport,
    SplitResult, WrittenPart,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
