//! DocxEngine — renders an `ExportDocument` into `.docx` bytes with docx-rs.
//!
//! The engine is the document capability handed to the export path through the
//! `ReadinessGate`; nothing else constructs docx types.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, LineSpacing, PageMargin, Paragraph, Run, RunFonts, Style, StyleType,
    Table, TableBorders, TableCell, TableRow, WidthType,
};

use crate::document::layout::ExportDocument;
use crate::document::ExportError;

const BODY_STYLE_ID: &str = "normalStyle";
const HEADING_STYLE_ID: &str = "headingStyle";

/// Fixed typography and page geometry. Sizes are in half-points, distances in twips.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStyle {
    pub font: String,
    pub body_size: usize,
    pub heading_size: usize,
    pub margin: i32,
    pub spacer_after_rental: u32,
    pub spacer_after_title: u32,
    pub paragraph_after: u32,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            body_size: 24,    // 12pt
            heading_size: 32, // 16pt
            margin: 1440,     // 1 inch
            spacer_after_rental: 200,
            spacer_after_title: 400,
            paragraph_after: 150,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocxEngine {
    style: DocumentStyle,
}

impl DocxEngine {
    pub fn new(style: DocumentStyle) -> Result<Self, String> {
        if style.font.trim().is_empty() {
            return Err("document font must not be empty".to_string());
        }
        if style.body_size == 0 || style.heading_size == 0 {
            return Err("font sizes must be positive".to_string());
        }
        if style.margin < 0 {
            return Err(format!("page margin must not be negative: {}", style.margin));
        }
        Ok(Self { style })
    }

    /// Builds and zips the document. Either the whole file is produced or an error.
    pub fn render(&self, doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        let mut docx = Docx::new()
            .page_margin(
                PageMargin::new()
                    .top(self.style.margin)
                    .right(self.style.margin)
                    .bottom(self.style.margin)
                    .left(self.style.margin),
            )
            .add_style(
                Style::new(BODY_STYLE_ID, StyleType::Paragraph)
                    .name("Normal")
                    .size(self.style.body_size),
            )
            .add_style(
                Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
                    .name("Heading")
                    .based_on(BODY_STYLE_ID)
                    .size(self.style.heading_size)
                    .bold(),
            )
            .add_table(self.header_table(doc))
            .add_paragraph(
                self.body_paragraph(&doc.rental_line)
                    .align(AlignmentType::Right),
            )
            .add_paragraph(self.spacer(self.style.spacer_after_rental))
            .add_paragraph(
                Paragraph::new()
                    .add_run(self.run(&doc.title, self.style.heading_size).bold())
                    .style(HEADING_STYLE_ID)
                    .align(AlignmentType::Center),
            )
            .add_paragraph(self.spacer(self.style.spacer_after_title));

        for text in &doc.paragraphs {
            docx = docx.add_paragraph(
                self.body_paragraph(text)
                    .align(AlignmentType::Both)
                    .line_spacing(LineSpacing::new().after(self.style.paragraph_after)),
            );
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        Ok(buf.into_inner())
    }

    /// Borderless full-width row: name on the right, place and date on the left.
    fn header_table(&self, doc: &ExportDocument) -> Table {
        let right = TableCell::new().add_paragraph(
            self.body_paragraph(&doc.header.right_cell)
                .align(AlignmentType::Right),
        );
        let left = TableCell::new().add_paragraph(
            self.body_paragraph(&doc.header.left_cell)
                .align(AlignmentType::Left),
        );

        Table::new(vec![TableRow::new(vec![right, left])])
            .width(5000, WidthType::Pct)
            .set_borders(TableBorders::with_empty())
    }

    fn body_paragraph(&self, text: &str) -> Paragraph {
        Paragraph::new()
            .add_run(self.run(text, self.style.body_size))
            .style(BODY_STYLE_ID)
    }

    fn spacer(&self, after: u32) -> Paragraph {
        Paragraph::new()
            .add_run(self.run("", self.style.body_size))
            .line_spacing(LineSpacing::new().after(after))
    }

    fn run(&self, text: &str, size: usize) -> Run {
        let font = self.style.font.as_str();
        Run::new()
            .add_text(text)
            .size(size)
            .fonts(RunFonts::new().ascii(font).hi_ansi(font).cs(font))
    }
}
