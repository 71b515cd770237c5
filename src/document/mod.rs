//! PDF text extraction
//!
//! Turns an uploaded PDF into a single string of page text.

use lopdf::Document;
use thiserror::Error;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("the uploaded file is empty")]
    Empty,
    #[error("could not read the uploaded file: {0}")]
    Unreadable(String),
    #[error("not a readable PDF: {0}")]
    Parse(String),
}

/// Text recovered from the current upload
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentText {
    /// Concatenated text of every page, in document order
    pub text: String,
    /// Number of pages in the file, including pages without text
    pub page_count: usize,
}

impl DocumentText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extract the text of every page from PDF bytes
///
/// Pages that yield no text (image-only pages, unsupported fonts) contribute
/// nothing. Input that is not a PDF is an error.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<DocumentText, ExtractError> {
    if pdf_bytes.is_empty() {
        return Err(ExtractError::Empty);
    }

    let doc = Document::load_mem(pdf_bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let pages = doc.get_pages();
    let mut text = String::new();
    for &page_num in pages.keys() {
        match doc.extract_text(&[page_num]) {
            Ok(content) => text.push_str(&content),
            Err(e) => tracing::warn!("No text extracted from page {}: {}", page_num, e),
        }
    }

    tracing::info!(
        "Extracted {} chars from {} pages",
        text.chars().count(),
        pages.len()
    );

    Ok(DocumentText {
        text,
        page_count: pages.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF where each entry is one page; `None` pages carry no text.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_single_page() {
        let pdf = build_pdf(&[Some("Hello")]);
        let doc = extract_text(&pdf).unwrap();
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.text.trim(), "Hello");
    }

    #[test]
    fn test_blank_pages_contribute_nothing() {
        let pdf = build_pdf(&[Some("Alpha"), None, Some("Gamma"), None]);
        let doc = extract_text(&pdf).unwrap();

        assert_eq!(doc.page_count, 4);
        let words: Vec<&str> = doc.text.split_whitespace().collect();
        assert_eq!(words, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_matches_concatenation_of_non_empty_pages() {
        let alpha = extract_text(&build_pdf(&[Some("Alpha")])).unwrap().text;
        let gamma = extract_text(&build_pdf(&[Some("Gamma")])).unwrap().text;

        let combined = extract_text(&build_pdf(&[None, Some("Alpha"), None, Some("Gamma")]))
            .unwrap()
            .text;
        assert_eq!(combined, format!("{alpha}{gamma}"));
    }

    #[test]
    fn test_image_only_document_is_empty_not_error() {
        let pdf = build_pdf(&[None, None]);
        let doc = extract_text(&pdf).unwrap();
        assert_eq!(doc.page_count, 2);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_zero_bytes_is_error() {
        assert!(matches!(extract_text(&[]), Err(ExtractError::Empty)));
    }

    #[test]
    fn test_non_pdf_is_error() {
        let result = extract_text(b"This is a plain text file, not a PDF.");
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }
}
