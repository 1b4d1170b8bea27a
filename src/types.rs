use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input file read by the command line when no path is given.
pub const DEFAULT_INPUT: &str = "RUSHLP.pdf";
pub const DEFAULT_PAGES_PER_PART: usize = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "pdf_parts";

/// A contiguous, half-open page-index range `[start, end)` destined for one
/// output file. `number` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRange {
    pub number: usize,
    pub start: usize,
    pub end: usize,
}

impl PartRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// 1-based, inclusive.
    pub fn first_page(&self) -> usize {
        self.start + 1
    }

    /// 1-based, inclusive.
    pub fn last_page(&self) -> usize {
        self.end
    }

    pub fn file_name(&self) -> String {
        format!(
            "part_{:03}_pages_{}-{}.pdf",
            self.number,
            self.first_page(),
            self.last_page()
        )
    }
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub pages_per_part: usize,
    pub output_dir: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            pages_per_part: DEFAULT_PAGES_PER_PART,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WrittenPart {
    #[serde(flatten)]
    pub range: PartRange,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    pub total_pages: usize,
    pub pages_per_part: usize,
    pub output_dir: PathBuf,
    pub parts: Vec<WrittenPart>,
}

impl SplitResult {
    pub fn parts_created(&self) -> usize {
        self.parts.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub source: String,
    pub codec: String,
    pub created_at: String,
    #[serde(flatten)]
    pub result: SplitResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitPlan {
    pub source: String,
    pub total_pages: usize,
    pub pages_per_part: usize,
    pub created_at: String,
    pub parts: Vec<PartRange>,
}

/// A file in the output directory whose name follows the part template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartFile {
    pub number: usize,
    pub first_page: usize,
    pub last_page: usize,
    pub path: PathBuf,
}

impl PartFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputLayout {
    pub parts: Vec<PartFile>,
    pub other_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutCheck {
    pub expected_parts: usize,
    pub found_parts: usize,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl LayoutCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}
