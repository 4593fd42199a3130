//! Plain text reading and the no-op extractor for unknown formats.

use crate::error::ExtractResult;
use crate::types::{DocumentKind, ExtractionMethod, ExtractionResult};
use crate::Extractor;
use async_trait::async_trait;

/// Reads `.txt` / `.md` content as text.
///
/// Invalid UTF-8 sequences are replaced, never reported.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PlainTextExtractor {
    async fn extract(&self, content: &[u8]) -> ExtractResult<ExtractionResult> {
        let text = String::from_utf8_lossy(content).into_owned();
        Ok(ExtractionResult::new(text, ExtractionMethod::PlainRead))
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::PlainText
    }

    fn name(&self) -> &str {
        "plain"
    }
}

/// Stand-in for formats we cannot read. Always yields empty text.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedExtractor;

#[async_trait]
impl Extractor for UnsupportedExtractor {
    async fn extract(&self, _content: &[u8]) -> ExtractResult<ExtractionResult> {
        Ok(ExtractionResult::unsupported())
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::Unsupported
    }

    fn name(&self) -> &str {
        "unsupported"
    }
}
