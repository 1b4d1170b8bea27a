use crate::error::{PdfSplitterError, Result};
use crate::types::{LayoutCheck, OutputLayout, PartFile, PartRange};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const PART_FILE_PATTERN: &str = r"^part_(\d{3,})_pages_(\d+)-(\d+)\.pdf$";

/// Reads back an output directory and compares it with a split plan.
pub struct OutputInspector {
    part_pattern: Regex,
}

impl OutputInspector {
    pub fn new() -> Result<Self> {
        let part_pattern =
            Regex::new(PART_FILE_PATTERN).map_err(|e| PdfSplitterError::OutputLayout {
                reason: format!("Invalid part file pattern: {}", e),
            })?;
        Ok(Self { part_pattern })
    }

    /// Lists the top level of `output_dir`, sorting part files by number.
    pub fn inspect(&self, output_dir: &Path) -> Result<OutputLayout> {
        if !output_dir.is_dir() {
            return Err(PdfSplitterError::OutputLayout {
                reason: format!("{} is not a directory", output_dir.display()),
            });
        }

        let mut layout = OutputLayout::default();
        for entry in WalkDir::new(output_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| PdfSplitterError::OutputLayout {
                reason: format!("Cannot read {}: {}", output_dir.display(), e),
            })?;
            let path = entry.path().to_path_buf();

            let part = entry
                .file_type()
                .is_file()
                .then(|| entry.file_name().to_str())
                .flatten()
                .and_then(|name| self.parse_part_name(name));

            match part {
                Some((number, first_page, last_page)) => layout.parts.push(PartFile {
                    number,
                    first_page,
                    last_page,
                    path,
                }),
                None => layout.other_files.push(path),
            }
        }

        layout
            .parts
            .sort_by_key(|part| (part.number, part.first_page));
        debug!(
            "Found {} part files and {} other entries in {}",
            layout.parts.len(),
            layout.other_files.len(),
            output_dir.display()
        );
        Ok(layout)
    }

    fn parse_part_name(&self, name: &str) -> Option<(usize, usize, usize)> {
        let captures = self.part_pattern.captures(name)?;
        let number = captures.get(1)?.as_str().parse().ok()?;
        let first_page = captures.get(2)?.as_str().parse().ok()?;
        let last_page = captures.get(3)?.as_str().parse().ok()?;
        Some((number, first_page, last_page))
    }

    /// Compares the part files of `layout` against the planned `ranges` by
    /// exact file name.
    pub fn check(&self, layout: &OutputLayout, ranges: &[PartRange]) -> LayoutCheck {
        let expected: BTreeSet<String> = ranges.iter().map(PartRange::file_name).collect();
        let found: BTreeSet<String> = layout.parts.iter().map(PartFile::file_name).collect();

        let missing: Vec<String> = expected.difference(&found).cloned().collect();
        let unexpected: Vec<String> = found.difference(&expected).cloned().collect();

        for name in &missing {
            warn!("Missing part file: {}", name);
        }
        for name in &unexpected {
            warn!("Unexpected part file: {}", name);
        }
        for path in &layout.other_files {
            info!("Ignoring non-part entry: {}", path.display());
        }

        LayoutCheck {
            expected_parts: expected.len(),
            found_parts: found.len(),
            missing,
            unexpected,
        }
    }
}
