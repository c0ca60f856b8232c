//! Document ingestion: turning uploaded statements into plain text.

pub mod pdf_parser;

pub use pdf_parser::{concat_pages, ExtractedDocument, PDFError, PDFParser, TextExtractor};
