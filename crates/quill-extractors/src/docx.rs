//! DOCX content extraction using docx-rs.
//!
//! Produces the text of every top-level paragraph in document order,
//! one paragraph per line. Table text can be included on request.

use crate::error::{ExtractError, ExtractResult};
use crate::types::{DocumentKind, ExtractionMethod, ExtractionResult};
use crate::Extractor;
use async_trait::async_trait;
use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableChild, TableRowChild};

/// DOCX content extractor using docx-rs library.
///
/// Wraps synchronous docx-rs calls in spawn_blocking to avoid blocking
/// the async runtime.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    /// Whether to emit table cell text in addition to paragraphs.
    include_tables: bool,
}

impl DocxExtractor {
    /// Create new DOCX extractor (paragraphs only).
    pub fn new() -> Self {
        Self {
            include_tables: false,
        }
    }

    /// Configure whether table text is included.
    pub fn with_tables(mut self, include: bool) -> Self {
        self.include_tables = include;
        self
    }

    /// Extract text synchronously (called within spawn_blocking).
    fn extract_sync(content: Vec<u8>, include_tables: bool) -> Result<String, ExtractError> {
        let docx = docx_rs::read_docx(&content)
            .map_err(|e| ExtractError::Docx(format!("Failed to parse DOCX: {}", e)))?;

        let mut blocks: Vec<String> = Vec::new();

        for child in docx.document.children {
            match child {
                // Empty paragraphs are kept so line structure survives.
                DocumentChild::Paragraph(p) => blocks.push(Self::paragraph_text(&p)),
                DocumentChild::Table(t) if include_tables => {
                    let table_text = Self::table_text(&t);
                    if !table_text.trim().is_empty() {
                        blocks.push(table_text);
                    }
                }
                _ => {}
            }
        }

        Ok(blocks.join("\n"))
    }

    /// Extract text from a paragraph.
    fn paragraph_text(p: &docx_rs::Paragraph) -> String {
        let mut text = String::new();

        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => {
                    for run_child in &r.children {
                        match run_child {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            RunChild::Break(_) => text.push('\n'),
                            _ => {}
                        }
                    }
                }
                ParagraphChild::Hyperlink(h) => {
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            for run_child in &r.children {
                                if let RunChild::Text(t) = run_child {
                                    text.push_str(&t.text);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

    /// Rows joined by newline, cells by ` | `.
    fn table_text(t: &docx_rs::Table) -> String {
        t.rows
            .iter()
            .map(|row| {
                let TableChild::TableRow(r) = row;
                r.cells
                    .iter()
                    .map(|cell| {
                        let TableRowChild::TableCell(c) = cell;
                        c.children
                            .iter()
                            .filter_map(|child| match child {
                                docx_rs::TableCellContent::Paragraph(p) => {
                                    Some(Self::paragraph_text(p))
                                }
                                _ => None,
                            })
                            .filter(|s| !s.is_empty())
                            .collect::<Vec<_>>()
                            .join(" ")
                            .trim()
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractionResult> {
        let content = content.to_vec();
        let include_tables = self.include_tables;

        let text =
            tokio::task::spawn_blocking(move || Self::extract_sync(content, include_tables))
                .await??;

        Ok(ExtractionResult::new(text, ExtractionMethod::StructuredRead))
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Structured
    }

    fn name(&self) -> &str {
        "docx-rs"
    }
}
