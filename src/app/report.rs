use crate::app::error::{ExcerptError, Result};
use crate::app::models::FileEntry;
use docx_rs::{Docx, Footer, Header, PageNum, Paragraph, Run, RunFonts, Style, StyleType};
use std::fs::{self, File};
use std::path::Path;

/// Empirical lines-per-page used by the page estimate.
pub const LINES_PER_PAGE: usize = 27;
pub const FRONT_PAGE_LIMIT: usize = 30;
/// Cumulative: the back section gets roughly another 30 pages.
pub const BACK_PAGE_LIMIT: usize = 60;

pub const FRONT_HEADING: &str = "前30页";
pub const BACK_HEADING: &str = "后30页";

const HEADING_STYLE: &str = "Heading2";
const LABEL_STYLE: &str = "Normal";
const LINE_FONT: &str = "等线 (西文正文)";
/// Half-points, i.e. 11pt.
const LINE_FONT_SIZE: usize = 22;

/// Where the assembler writes paragraphs.
pub trait ReportSink {
    fn add_heading(&mut self, text: &str);
    fn add_label(&mut self, text: &str);
    fn add_line(&mut self, text: &str);
    fn paragraph_count(&self) -> usize;
}

/// `ceil(paragraphs / LINES_PER_PAGE)`
pub fn estimate_pages(paragraphs: usize) -> usize {
    paragraphs.div_ceil(LINES_PER_PAGE)
}

/// Reverses `items` in place by swapping from both ends; returns the number
/// of swaps performed (`len / 2`).
pub fn reverse_in_place<T>(items: &mut [T]) -> usize {
    let mut swaps = 0;
    if items.is_empty() {
        return swaps;
    }
    let (mut left, mut right) = (0, items.len() - 1);
    while left < right {
        items.swap(left, right);
        swaps += 1;
        left += 1;
        right -= 1;
    }
    swaps
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub front_files: usize,
    pub back_files: usize,
    pub paragraphs: usize,
    pub estimated_pages: usize,
}

pub struct ReportAssembler<S: ReportSink> {
    sink: S,
}

impl<S: ReportSink> ReportAssembler<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Writes the front section in walk order, then reverses `files` and
    /// writes the back section. The first unreadable file aborts the run.
    pub fn assemble(mut self, mut files: Vec<FileEntry>) -> Result<(S, ReportSummary)> {
        self.sink.add_heading(FRONT_HEADING);
        let front_files = self.write_section(&files, FRONT_PAGE_LIMIT)?;

        self.sink.add_heading(BACK_HEADING);
        reverse_in_place(&mut files);
        let back_files = self.write_section(&files, BACK_PAGE_LIMIT)?;

        let paragraphs = self.sink.paragraph_count();
        let summary = ReportSummary {
            front_files,
            back_files,
            paragraphs,
            estimated_pages: estimate_pages(paragraphs),
        };
        Ok((self.sink, summary))
    }

    /// Returns how many files were written before the page limit was hit.
    fn write_section(&mut self, files: &[FileEntry], page_limit: usize) -> Result<usize> {
        let mut written = 0;
        for entry in files {
            log::info!("Reading file {}", entry.relative_path);
            let bytes = fs::read(&entry.path).map_err(|source| ExcerptError::FileReadFailure {
                path: entry.path.clone(),
                source,
            })?;
            let content = String::from_utf8_lossy(&bytes);

            self.sink.add_label(&entry.relative_path);
            for line in content.split('\n') {
                self.sink.add_line(line.strip_suffix('\r').unwrap_or(line));
            }
            written += 1;

            let pages = estimate_pages(self.sink.paragraph_count());
            if pages >= page_limit {
                log::info!(
                    "Estimated {} pages, reached limit of {}; stopping section",
                    pages,
                    page_limit
                );
                break;
            }
        }
        Ok(written)
    }
}

/// `.docx` sink: page header with the display name, page-number footer.
pub struct DocxReport {
    header: Header,
    footer: Footer,
    paragraphs: Vec<Paragraph>,
}

impl DocxReport {
    pub fn new(name: &str) -> Self {
        let header =
            Header::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(name)));
        let footer = Footer::new().add_paragraph(Paragraph::new().add_page_num(PageNum::new()));
        Self {
            header,
            footer,
            paragraphs: Vec::new(),
        }
    }

    /// Builds the document and writes it to `path`, replacing any existing file.
    pub fn save(self, path: &Path) -> Result<()> {
        let build_failure = |source: Box<dyn std::error::Error + Send + Sync>| {
            ExcerptError::DocumentBuildFailure {
                path: path.to_path_buf(),
                source,
            }
        };

        let heading_style = Style::new(HEADING_STYLE, StyleType::Paragraph)
            .name("heading 2")
            .size(32)
            .bold();

        let docx = self.paragraphs.into_iter().fold(
            Docx::new()
                .header(self.header)
                .footer(self.footer)
                .add_style(heading_style),
            Docx::add_paragraph,
        );

        let file = File::create(path).map_err(|e| build_failure(Box::new(e)))?;
        docx.build()
            .pack(file)
            .map_err(|e| build_failure(Box::new(e)))?;
        Ok(())
    }
}

impl ReportSink for DocxReport {
    fn add_heading(&mut self, text: &str) {
        self.paragraphs.push(
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .style(HEADING_STYLE),
        );
    }

    fn add_label(&mut self, text: &str) {
        self.paragraphs.push(
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .style(LABEL_STYLE),
        );
    }

    fn add_line(&mut self, text: &str) {
        let fonts = RunFonts::new()
            .ascii(LINE_FONT)
            .hi_ansi(LINE_FONT)
            .east_asia(LINE_FONT);
        let run = Run::new()
            .add_text(xml_safe(text))
            .fonts(fonts)
            .size(LINE_FONT_SIZE);
        self.paragraphs.push(Paragraph::new().add_run(run));
    }

    fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

/// Drops control characters (except tab) that are not allowed in XML text.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect()
}
