use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Picks the extraction strategy from the uploaded file name; anything
    /// that is not a PDF is treated as plain text.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".pdf") {
            Self::Pdf
        } else {
            Self::Text
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not extract text from the PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("document is not valid UTF-8 text")]
    InvalidText(#[from] std::string::FromUtf8Error),

    #[error("document contains no extractable text")]
    Empty,
}

/// Converts an uploaded document into plain text for the generation
/// pipeline. Failure here is terminal for the request: a document that
/// cannot be read is a problem with the upload, not with the generative
/// step, and is reported as such.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    let text = match kind {
        DocumentKind::Pdf => {
            tracing::debug!(len = bytes.len(), "extracting text from PDF");
            pdf_extract::extract_text_from_mem(bytes)?
        }
        DocumentKind::Text => String::from_utf8(bytes.to_vec())?,
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(DocumentKind::from_file_name("slides.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("notes.txt"), DocumentKind::Text);
        assert_eq!(DocumentKind::from_file_name("README"), DocumentKind::Text);
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text("just some notes".as_bytes(), DocumentKind::Text).unwrap();
        assert_eq!(text, "just some notes");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = extract_text(&[0xff, 0xfe, 0x00], DocumentKind::Text);
        assert!(matches!(result, Err(ExtractionError::InvalidText(_))));
    }

    #[test]
    fn test_whitespace_only_document_is_empty() {
        let result = extract_text("  \n\t ".as_bytes(), DocumentKind::Text);
        assert!(matches!(result, Err(ExtractionError::Empty)));
    }
}
