//! OCR for paginated documents: rasterize pages, then recognize text.
//!
//! The engine is a seam ([`OcrEngine`]) so the escalation logic in the
//! pipeline can be exercised without tesseract or poppler installed.

use serde::{Deserialize, Serialize};

use crate::error::ExtractResult;

/// OCR escalation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Native extractions with fewer characters than this are re-run through OCR.
    pub threshold_chars: usize,
    /// Upper bound on rasterized pages, counted from the first page.
    pub max_pages: usize,
    /// Rasterization resolution.
    pub dpi: u32,
    /// Tesseract language set, e.g. `rus+eng`.
    pub languages: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            threshold_chars: 250,
            max_pages: 5,
            dpi: 200,
            languages: "rus+eng".to_string(),
        }
    }
}

impl OcrSettings {
    /// The per-document request handed to the engine.
    pub fn request(&self) -> OcrRequest {
        OcrRequest {
            max_pages: self.max_pages,
            dpi: self.dpi,
            languages: self.languages.clone(),
        }
    }
}

/// Parameters for a single OCR run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrRequest {
    pub max_pages: usize,
    pub dpi: u32,
    pub languages: String,
}

/// Rasterization + recognition engine.
///
/// Returns one string per rasterized page, in page order. Implementations
/// are blocking; the pipeline calls them from `spawn_blocking`.
#[cfg_attr(test, mockall::automock)]
pub trait OcrEngine: Send + Sync {
    fn recognize_pages(&self, content: &[u8], request: &OcrRequest) -> ExtractResult<Vec<String>>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

#[cfg(feature = "ocr")]
pub use tesseract::TesseractOcr;

#[cfg(feature = "ocr")]
mod tesseract {
    use std::path::{Path, PathBuf};
    use std::process::Command;

    use rusty_tesseract::{Args, Image};
    use tracing::debug;

    use super::{OcrEngine, OcrRequest};
    use crate::error::{ExtractError, ExtractResult};

    const PAGE_PREFIX: &str = "page";

    /// Poppler's `pdftoppm` for rasterization, tesseract for recognition.
    ///
    /// Both are external binaries and must be on `PATH` (or configured).
    #[derive(Debug, Clone)]
    pub struct TesseractOcr {
        rasterizer: PathBuf,
        scratch_dir: Option<PathBuf>,
    }

    impl Default for TesseractOcr {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TesseractOcr {
        pub fn new() -> Self {
            Self {
                rasterizer: PathBuf::from("pdftoppm"),
                scratch_dir: None,
            }
        }

        /// Use a specific `pdftoppm` binary.
        pub fn with_rasterizer(mut self, path: impl Into<PathBuf>) -> Self {
            self.rasterizer = path.into();
            self
        }

        /// Rasterize under `path` instead of the system temp directory.
        pub fn with_scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
            self.scratch_dir = Some(path.into());
            self
        }

        fn scratch(&self) -> ExtractResult<tempfile::TempDir> {
            match &self.scratch_dir {
                Some(parent) => tempfile::tempdir_in(parent),
                None => tempfile::tempdir(),
            }
            .map_err(|e| scratch_error("create scratch directory", e))
        }

        fn rasterize(
            &self,
            content: &[u8],
            request: &OcrRequest,
            dir: &Path,
        ) -> ExtractResult<Vec<PathBuf>> {
            let input = dir.join("input.pdf");
            std::fs::write(&input, content)
                .map_err(|e| scratch_error("write input document", e))?;

            let output = Command::new(&self.rasterizer)
                .arg("-r")
                .arg(request.dpi.to_string())
                .arg("-f")
                .arg("1")
                .arg("-l")
                .arg(request.max_pages.to_string())
                .arg("-png")
                .arg(&input)
                .arg(dir.join(PAGE_PREFIX))
                .output()
                .map_err(|e| {
                    ExtractError::Ocr(format!(
                        "Failed to run rasterizer {}: {}",
                        self.rasterizer.display(),
                        e
                    ))
                })?;

            if !output.status.success() {
                return Err(ExtractError::Ocr(format!(
                    "Rasterizer exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }

            let mut pages: Vec<(usize, PathBuf)> = std::fs::read_dir(dir)
                .map_err(|e| scratch_error("list rasterized pages", e))?
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| {
                    let name = entry.file_name();
                    page_number(&name.to_string_lossy()).map(|n| (n, entry.path()))
                })
                .collect();
            pages.sort_by_key(|(n, _)| *n);

            Ok(pages.into_iter().map(|(_, path)| path).collect())
        }

        fn recognize(path: &Path, request: &OcrRequest) -> ExtractResult<String> {
            let image = Image::from_path(path.to_path_buf())
                .map_err(|e| ExtractError::Ocr(format!("Failed to load page image: {}", e)))?;

            let args = Args {
                lang: request.languages.clone(),
                dpi: Some(request.dpi as i32),
                ..Args::default()
            };

            rusty_tesseract::image_to_string(&image, &args)
                .map_err(|e| ExtractError::Ocr(format!("Tesseract failed: {}", e)))
        }
    }

    impl OcrEngine for TesseractOcr {
        fn recognize_pages(
            &self,
            content: &[u8],
            request: &OcrRequest,
        ) -> ExtractResult<Vec<String>> {
            if request.max_pages == 0 {
                return Ok(Vec::new());
            }

            let dir = self.scratch()?;
            let pages = self.rasterize(content, request, dir.path())?;
            if pages.is_empty() {
                return Err(ExtractError::Ocr("Rasterizer produced no pages".to_string()));
            }

            debug!(pages = pages.len(), dpi = request.dpi, "Running tesseract on rasterized pages");

            pages
                .iter()
                .map(|page| Self::recognize(page, request))
                .collect()
        }

        fn name(&self) -> &str {
            "tesseract"
        }
    }

    fn scratch_error(action: &str, e: std::io::Error) -> ExtractError {
        ExtractError::Ocr(format!("Failed to {}: {}", action, e))
    }

    /// `page-3.png` / `page-03.png` -> 3
    pub(super) fn page_number(file_name: &str) -> Option<usize> {
        file_name
            .strip_prefix(PAGE_PREFIX)?
            .strip_prefix('-')?
            .strip_suffix(".png")?
            .parse()
            .ok()
    }
}
