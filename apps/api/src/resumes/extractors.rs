//! Text extraction for the two supported resume formats.

use std::io::{Cursor, Read};
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("extraction task panicked")]
    Panicked,
}

/// Turns a document's raw bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text =
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}

/// Reads the body text of `word/document.xml`. Each paragraph ends with a
/// newline; tabs and explicit breaks are kept as whitespace.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut xml = String::new();
        archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

        let mut reader = Reader::from_str(&xml);
        let mut text = String::new();
        let mut in_text_run = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text_run = false,
                    b"w:p" => text.push('\n'),
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:cr" => text.push('\n'),
                    _ => {}
                },
                Event::Text(t) if in_text_run => text.push_str(&t.unescape()?),
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(text.trim().to_string())
    }
}

/// Maps a lowercase file extension (with leading dot) to its extractor.
#[derive(Clone)]
pub struct ExtractorRegistry {
    pdf: Arc<dyn TextExtractor>,
    docx: Arc<dyn TextExtractor>,
}

impl ExtractorRegistry {
    pub fn new(pdf: Arc<dyn TextExtractor>, docx: Arc<dyn TextExtractor>) -> Self {
        Self { pdf, docx }
    }

    pub fn for_extension(&self, extension: &str) -> Option<Arc<dyn TextExtractor>> {
        match extension {
            ".pdf" => Some(self.pdf.clone()),
            ".docx" => Some(self.docx.clone()),
            _ => None,
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new(Arc::new(PdfExtractor), Arc::new(DocxExtractor))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Write;

    /// Builds a minimal DOCX archive with one paragraph per entry of `paragraphs`.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(document.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::docx_with_paragraphs;
    use super::*;

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let bytes = docx_with_paragraphs(&["Skills", "Rust, Go &amp; SQL", "Experience"]);
        let text = DocxExtractor.extract(&bytes).unwrap();
        assert_eq!(text, "Skills\nRust, Go & SQL\nExperience");
    }

    #[test]
    fn test_docx_rejects_non_archive() {
        assert!(matches!(
            DocxExtractor.extract(b"plain text, not a zip"),
            Err(ExtractError::Archive(_))
        ));
    }

    #[test]
    fn test_pdf_rejects_garbage() {
        assert!(PdfExtractor.extract(b"not a pdf").is_err());
    }

    #[test]
    fn test_registry_knows_exactly_two_formats() {
        let registry = ExtractorRegistry::default();
        assert!(registry.for_extension(".pdf").is_some());
        assert!(registry.for_extension(".docx").is_some());
        assert!(registry.for_extension(".doc").is_none());
        assert!(registry.for_extension(".txt").is_none());
        assert!(registry.for_extension("").is_none());
    }
}
