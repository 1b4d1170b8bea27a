use crate::codec::{Codec, PageSink, PageSource};
use crate::error::{PdfSplitterError, Result};
use crate::types::{PartRange, SplitConfig, SplitResult, WrittenPart};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Splits a document into consecutive parts of `pages_per_part` pages, one
/// output file per part.
pub struct DocumentSplitter<C: Codec> {
    codec: C,
    config: SplitConfig,
}

impl<C: Codec> DocumentSplitter<C> {
    pub fn new(codec: C, config: SplitConfig) -> Self {
        Self { codec, config }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Opens `input` with the bound codec. A missing path is reported as
    /// such rather than as a codec failure.
    pub fn open(&self, input: &Path) -> Result<C::Source> {
        if !input.exists() {
            return Err(PdfSplitterError::MissingInput {
                path: input.display().to_string(),
            });
        }
        debug!("Opening {} with codec '{}'", input.display(), self.codec.name());
        self.codec.open(input)
    }

    /// Opens `input` and splits it. Nothing is created on disk if the input
    /// cannot be opened.
    pub fn split_file(&self, input: &Path) -> Result<SplitResult> {
        Self::validate_split_config(&self.config)?;
        let source = self.open(input)?;
        self.split_document(&source)
    }

    pub fn split_document(&self, source: &C::Source) -> Result<SplitResult> {
        Self::validate_split_config(&self.config)?;

        let total_pages = source.page_count();
        info!("Total pages in PDF: {}", total_pages);
        info!(
            "Splitting into parts of {} pages each",
            self.config.pages_per_part
        );

        Self::ensure_output_directory(&self.config.output_dir)?;

        let ranges = Self::calculate_split_info(total_pages, self.config.pages_per_part)?;
        let mut parts = Vec::with_capacity(ranges.len());

        for range in ranges {
            let path = self.write_part(source, &range)?;
            info!(
                "Created: {} (pages {}-{})",
                path.display(),
                range.first_page(),
                range.last_page()
            );
            parts.push(WrittenPart { range, path });
        }

        debug!(
            "Wrote {} parts for {} pages to {}",
            parts.len(),
            total_pages,
            self.config.output_dir.display()
        );

        Ok(SplitResult {
            total_pages,
            pages_per_part: self.config.pages_per_part,
            output_dir: self.config.output_dir.clone(),
            parts,
        })
    }

    fn write_part(&self, source: &C::Source, range: &PartRange) -> Result<PathBuf> {
        let mut sink = self.codec.create();
        for index in range.start..range.end {
            sink.append(source.page(index)?)?;
        }
        debug!(
            "Part {} holds {} pages (indices {}..{})",
            range.number,
            sink.page_count(),
            range.start,
            range.end
        );

        let output_file = Self::generate_output_filename(&self.config.output_dir, range);
        sink.save(&output_file)?;
        Ok(output_file)
    }

    fn validate_split_config(config: &SplitConfig) -> Result<()> {
        if config.pages_per_part == 0 {
            return Err(PdfSplitterError::SplitConfig {
                reason: "Pages per part must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn ensure_output_directory(output_dir: &Path) -> Result<()> {
        if !output_dir.is_dir() {
            fs::create_dir_all(output_dir).map_err(|e| PdfSplitterError::OutputDirectory {
                reason: format!(
                    "Failed to create output directory {}: {}",
                    output_dir.display(),
                    e
                ),
            })?;
            info!("Created output directory: {}", output_dir.display());
        }
        Ok(())
    }

    pub fn generate_output_filename(output_dir: &Path, range: &PartRange) -> PathBuf {
        output_dir.join(range.file_name())
    }

    /// Contiguous ranges covering `[0, total_pages)`, all of
    /// `pages_per_part` pages except possibly the last.
    pub fn calculate_split_info(
        total_pages: usize,
        pages_per_part: usize,
    ) -> Result<Vec<PartRange>> {
        if pages_per_part == 0 {
            return Err(PdfSplitterError::SplitConfig {
                reason: "Pages per part must be greater than 0".to_string(),
            });
        }

        let ranges = (0..total_pages)
            .step_by(pages_per_part)
            .enumerate()
            .map(|(idx, start)| PartRange {
                number: idx + 1,
                start,
                end: std::cmp::min(start + pages_per_part, total_pages),
            })
            .collect();
        Ok(ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{MemoryCodec, MemoryDocument, MemoryPage, MemorySink};
    use std::cell::Cell;
    use tempfile::TempDir;

    type MemorySplitter = DocumentSplitter<MemoryCodec>;

    fn splitter(pages_per_part: usize, output_dir: &Path) -> MemorySplitter {
        DocumentSplitter::new(
            MemoryCodec,
            SplitConfig {
                pages_per_part,
                output_dir: output_dir.to_path_buf(),
            },
        )
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn read_pages(path: &Path) -> Vec<String> {
        MemoryCodec.open(path).unwrap().pages().to_vec()
    }

    /// Fails to save the `fail_on_part`-th sink it hands out.
    struct FailingCodec {
        fail_on_part: usize,
        created: Cell<usize>,
    }

    struct FailingSink {
        inner: MemorySink,
        fail: bool,
    }

    impl PageSink for FailingSink {
        type Page = MemoryPage;

        fn append(&mut self, page: MemoryPage) -> Result<()> {
            self.inner.append(page)
        }

        fn page_count(&self) -> usize {
            self.inner.page_count()
        }

        fn save(self, path: &Path) -> Result<()> {
            if self.fail {
                return Err(PdfSplitterError::CodecWrite {
                    reason: format!("{}: disk full", path.display()),
                });
            }
            self.inner.save(path)
        }
    }

    impl Codec for FailingCodec {
        type Page = MemoryPage;
        type Source = MemoryDocument;
        type Sink = FailingSink;

        fn name(&self) -> &'static str {
            "failing"
        }

        fn open(&self, path: &Path) -> Result<MemoryDocument> {
            MemoryCodec.open(path)
        }

        fn create(&self) -> FailingSink {
            let created = self.created.get() + 1;
            self.created.set(created);
            FailingSink {
                inner: MemoryCodec.create(),
                fail: created == self.fail_on_part,
            }
        }
    }

    #[test]
    fn test_twenty_five_pages_in_tens() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("pdf_parts");
        let document = MemoryDocument::numbered(25);

        let result = splitter(10, &output_dir).split_document(&document).unwrap();

        assert_eq!(result.parts_created(), 3);
        assert_eq!(
            file_names(&output_dir),
            [
                "part_001_pages_1-10.pdf",
                "part_002_pages_11-20.pdf",
                "part_003_pages_21-25.pdf",
            ]
        );
        assert_eq!(read_pages(&output_dir.join("part_001_pages_1-10.pdf")).len(), 10);
        assert_eq!(read_pages(&output_dir.join("part_002_pages_11-20.pdf")).len(), 10);
        assert_eq!(
            read_pages(&output_dir.join("part_003_pages_21-25.pdf")),
            ["page 21", "page 22", "page 23", "page 24", "page 25"]
        );
    }

    #[test]
    fn test_empty_document_creates_directory_only() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("nested").join("pdf_parts");

        let result = splitter(10, &output_dir)
            .split_document(&MemoryDocument::default())
            .unwrap();

        assert_eq!(result.parts_created(), 0);
        assert!(output_dir.is_dir());
        assert!(file_names(&output_dir).is_empty());
    }

    #[test]
    fn test_exact_multiple_yields_single_part() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("out");
        let document = MemoryDocument::numbered(10);

        let result = splitter(10, &output_dir).split_document(&document).unwrap();

        assert_eq!(result.parts_created(), 1);
        assert_eq!(file_names(&output_dir), ["part_001_pages_1-10.pdf"]);
        assert_eq!(
            read_pages(&output_dir.join("part_001_pages_1-10.pdf")),
            document.pages()
        );
    }

    #[test]
    fn test_missing_input_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("pdf_parts");

        let err = splitter(10, &output_dir)
            .split_file(&dir.path().join("RUSHLP.pdf"))
            .unwrap_err();

        assert!(matches!(err, PdfSplitterError::MissingInput { .. }));
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_unreadable_input_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        fs::write(&input, "garbage").unwrap();
        let output_dir = dir.path().join("pdf_parts");

        let err = splitter(10, &output_dir).split_file(&input).unwrap_err();

        assert!(matches!(err, PdfSplitterError::CodecRead { .. }));
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_split_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        MemoryDocument::numbered(12).write_to(&input).unwrap();
        let output_dir = dir.path().join("pdf_parts");

        let result = splitter(5, &output_dir).split_file(&input).unwrap();

        assert_eq!(result.total_pages, 12);
        let paths: Vec<PathBuf> = result.parts.iter().map(|part| part.path.clone()).collect();
        assert_eq!(
            paths,
            [
                output_dir.join("part_001_pages_1-5.pdf"),
                output_dir.join("part_002_pages_6-10.pdf"),
                output_dir.join("part_003_pages_11-12.pdf"),
            ]
        );
    }

    #[test]
    fn test_zero_pages_per_part_rejected_before_any_effect() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("pdf_parts");

        let err = splitter(0, &output_dir)
            .split_document(&MemoryDocument::numbered(3))
            .unwrap_err();

        assert!(matches!(err, PdfSplitterError::SplitConfig { .. }));
        assert!(!output_dir.exists());
    }

    #[test]
    fn test_output_path_is_a_file() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("pdf_parts");
        fs::write(&output_dir, "occupied").unwrap();

        let err = splitter(10, &output_dir)
            .split_document(&MemoryDocument::numbered(3))
            .unwrap_err();

        assert!(matches!(err, PdfSplitterError::OutputDirectory { .. }));
        assert_eq!(fs::read_to_string(&output_dir).unwrap(), "occupied");
    }

    #[test]
    fn test_existing_directory_is_reused() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("pdf_parts");
        fs::create_dir(&output_dir).unwrap();
        fs::write(output_dir.join("notes.txt"), "keep me").unwrap();

        splitter(4, &output_dir)
            .split_document(&MemoryDocument::numbered(4))
            .unwrap();

        assert_eq!(
            file_names(&output_dir),
            ["notes.txt", "part_001_pages_1-4.pdf"]
        );
    }

    #[test]
    fn test_existing_part_file_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("pdf_parts");
        fs::create_dir(&output_dir).unwrap();
        let target = output_dir.join("part_001_pages_1-2.pdf");
        fs::write(&target, "stale").unwrap();

        splitter(2, &output_dir)
            .split_document(&MemoryDocument::numbered(2))
            .unwrap();

        assert_eq!(read_pages(&target), ["page 1", "page 2"]);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("pdf_parts");
        let document = MemoryDocument::numbered(7);
        let splitter = splitter(3, &output_dir);

        splitter.split_document(&document).unwrap();
        let first: Vec<Vec<u8>> = file_names(&output_dir)
            .iter()
            .map(|name| fs::read(output_dir.join(name)).unwrap())
            .collect();

        splitter.split_document(&document).unwrap();
        let second: Vec<Vec<u8>> = file_names(&output_dir)
            .iter()
            .map(|name| fs::read(output_dir.join(name)).unwrap())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_write_failure_keeps_earlier_parts() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        MemoryDocument::numbered(25).write_to(&input).unwrap();
        let output_dir = dir.path().join("pdf_parts");

        let splitter = DocumentSplitter::new(
            FailingCodec {
                fail_on_part: 2,
                created: Cell::new(0),
            },
            SplitConfig {
                pages_per_part: 10,
                output_dir: output_dir.clone(),
            },
        );
        let err = splitter.split_file(&input).unwrap_err();

        assert!(matches!(err, PdfSplitterError::CodecWrite { .. }));
        assert_eq!(file_names(&output_dir), ["part_001_pages_1-10.pdf"]);
        assert_eq!(splitter.codec().created.get(), 2);
    }

    #[test]
    fn test_split_info_partitions_every_size() {
        for total_pages in 0..=40 {
            for pages_per_part in 1..=12 {
                let ranges =
                    MemorySplitter::calculate_split_info(total_pages, pages_per_part).unwrap();

                assert_eq!(ranges.len(), total_pages.div_ceil(pages_per_part));
                assert_eq!(ranges.is_empty(), total_pages == 0);

                let mut next_start = 0;
                for (idx, range) in ranges.iter().enumerate() {
                    assert_eq!(range.number, idx + 1);
                    assert_eq!(range.start, next_start);
                    assert!(!range.is_empty());
                    if idx + 1 < ranges.len() {
                        assert_eq!(range.len(), pages_per_part);
                    } else {
                        assert_eq!(
                            range.len(),
                            total_pages - (ranges.len() - 1) * pages_per_part
                        );
                        assert!(range.len() <= pages_per_part);
                    }
                    next_start = range.end;
                }
                assert_eq!(next_start, total_pages);
            }
        }
    }

    #[test]
    fn test_split_info_rejects_zero_part_size() {
        assert!(matches!(
            MemorySplitter::calculate_split_info(10, 0),
            Err(PdfSplitterError::SplitConfig { .. })
        ));
    }

    #[test]
    fn test_generated_filenames_are_unique() {
        let ranges = MemorySplitter::calculate_split_info(1005, 10).unwrap();
        let mut names: Vec<PathBuf> = ranges
            .iter()
            .map(|range| MemorySplitter::generate_output_filename(Path::new("pdf_parts"), range))
            .collect();

        assert_eq!(names[0], Path::new("pdf_parts/part_001_pages_1-10.pdf"));
        assert_eq!(
            names[100],
            Path::new("pdf_parts/part_101_pages_1001-1005.pdf")
        );

        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}
