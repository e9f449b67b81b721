pub struct TextExtractor;

impl TextExtractor {
    /// Pulls the text layer out of an uploaded PDF buffer. Returns `None`
    /// when the document has no usable text; the caller must not forward an
    /// empty document to the gateway.
    pub fn extract_from_pdf(bytes: &[u8]) -> Option<String> {
        match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "PDF text extraction failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_unreadable() {
        assert_eq!(TextExtractor::extract_from_pdf(b"not a pdf at all"), None);
        assert_eq!(TextExtractor::extract_from_pdf(b""), None);
    }
}
