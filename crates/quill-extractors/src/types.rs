//! Core types for content extraction.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::{AsRefStr, Display};

/// Document kind, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// `.txt`, `.md`
    PlainText,
    /// `.docx`
    Structured,
    /// `.pdf`
    Paginated,
    /// Anything else.
    Unsupported,
}

impl DocumentKind {
    /// Classify an extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "txt" | "md" => DocumentKind::PlainText,
            "docx" => DocumentKind::Structured,
            "pdf" => DocumentKind::Paginated,
            _ => DocumentKind::Unsupported,
        }
    }

    /// Classify a file name by its extension.
    pub fn from_file_name(file_name: &str) -> Self {
        extension_of(file_name)
            .map(|ext| Self::from_extension(&ext))
            .unwrap_or(DocumentKind::Unsupported)
    }

    /// Whether documents of this kind have pages (and may need OCR).
    pub fn is_paginated(&self) -> bool {
        matches!(self, DocumentKind::Paginated)
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// An uploaded document: immutable bytes plus the name they arrived under.
#[derive(Debug, Clone)]
pub struct Document {
    file_name: String,
    mime_type: Option<String>,
    kind: DocumentKind,
    content: Vec<u8>,
}

impl Document {
    /// Create a document from its file name and raw bytes.
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let kind = DocumentKind::from_file_name(&file_name);
        Self {
            file_name,
            mime_type: None,
            kind,
            content,
        }
    }

    /// Read a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, content))
    }

    /// Attach the MIME type reported by the sender.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Size of the document in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Short file type label: the extension without the dot, else the
    /// MIME type, else `"unknown"`.
    pub fn file_type(&self) -> String {
        extension_of(&self.file_name)
            .filter(|e| !e.is_empty())
            .or_else(|| self.mime_type.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// How the text of a document was obtained.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionMethod {
    PlainRead,
    StructuredRead,
    PaginatedRead,
    Ocr,
    Unsupported,
}

/// Extracted text with extraction metadata.
///
/// `chars` is always the character count of `text`; `pages` is only
/// set for paginated documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub text: String,
    pub method: ExtractionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
    pub chars: usize,
}

impl ExtractionResult {
    /// Create a result for a non-paginated read.
    pub fn new(text: String, method: ExtractionMethod) -> Self {
        let chars = text.chars().count();
        Self {
            text,
            method,
            pages: None,
            chars,
        }
    }

    /// Create a result for a paginated read (native or OCR).
    pub fn paginated(text: String, method: ExtractionMethod, pages: usize) -> Self {
        Self {
            pages: Some(pages),
            ..Self::new(text, method)
        }
    }

    /// Result for a document no extractor understands.
    pub fn unsupported() -> Self {
        Self::new(String::new(), ExtractionMethod::Unsupported)
    }

    /// Check if extraction produced meaningful content.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
