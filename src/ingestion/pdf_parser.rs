//! PDF Parser Module
//!
//! Extracts per-page text from expense statements. Text extraction itself is
//! delegated to `lopdf`; this module only orders pages and concatenates them.

use lopdf::Document;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum PDFError {
    #[error("Failed to load PDF: {0}")]
    LoadError(String),

    #[error("Failed to extract text from page {page}: {message}")]
    ExtractionError { page: u32, message: String },

    #[error("Password required for encrypted PDF")]
    PasswordRequired,

    #[error("Failed to read document: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PDFError>;

// ============================================================================
// Extracted Content Types
// ============================================================================

/// Complete extracted document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Text of each page, in page order
    pub pages: Vec<String>,
}

impl ExtractedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All page text concatenated in order with no separator.
    pub fn full_text(&self) -> String {
        concat_pages(&self.pages)
    }
}

/// Join page texts in order, without inserting separators.
pub fn concat_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages.iter().map(AsRef::as_ref).collect()
}

// ============================================================================
// Extractor seam
// ============================================================================

/// Turns raw document bytes into an ordered list of page texts.
#[cfg_attr(test, mockall::automock)]
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

// ============================================================================
// PDF Parser
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PDFParser;

impl PDFParser {
    pub fn new() -> Self {
        Self
    }

    fn load(bytes: &[u8]) -> Result<Document> {
        let doc = Document::load_mem(bytes).map_err(|e| PDFError::LoadError(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(PDFError::PasswordRequired);
        }
        Ok(doc)
    }

    /// Extract the text of every page, in page order.
    pub fn extract_document(bytes: &[u8]) -> Result<ExtractedDocument> {
        let doc = Self::load(bytes)?;

        // get_pages() is a BTreeMap keyed by 1-based page number
        let mut pages = Vec::new();
        for page_num in doc.get_pages().into_keys() {
            let text = doc
                .extract_text(&[page_num])
                .map_err(|e| PDFError::ExtractionError {
                    page: page_num,
                    message: e.to_string(),
                })?;
            pages.push(text);
        }

        log::info!(
            "Extracted {} page(s), {} chars",
            pages.len(),
            pages.iter().map(String::len).sum::<usize>()
        );

        Ok(ExtractedDocument { pages })
    }
}

impl TextExtractor for PDFParser {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        Self::extract_document(bytes).map(|doc| doc.pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build an in-memory PDF with one text line per page.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_concat_pages_has_no_separator() {
        assert_eq!(concat_pages(&["a", "b", "c"]), "abc");
        assert_eq!(concat_pages::<&str>(&[]), "");
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let bytes = build_pdf(&["Aluguel 1500", "Mercado 800"]);
        let doc = PDFParser::extract_document(&bytes).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].contains("Aluguel 1500"));
        assert!(doc.pages[1].contains("Mercado 800"));

        let full = doc.full_text();
        let first = full.find("Aluguel").unwrap();
        let second = full.find("Mercado").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_zero_page_document_yields_empty_text() {
        let bytes = build_pdf(&[]);
        let pages = PDFParser::new().extract_pages(&bytes).unwrap();
        assert!(pages.is_empty());
        assert_eq!(concat_pages(&pages), "");
    }

    #[test]
    fn test_garbage_bytes_fail_to_load() {
        let err = PDFParser::new().extract_pages(b"not a pdf").unwrap_err();
        assert!(matches!(err, PDFError::LoadError(_)));
    }
}
