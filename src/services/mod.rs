pub mod inspector;
pub mod splitter;

pub use inspector::OutputInspector;
pub use splitter::DocumentSplitter;
