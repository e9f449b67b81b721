/// Separates the static instruction from text extracted out of a PDF.
pub const DOCUMENT_TEXT_DELIMITER: &str = "\n\nDocument Text:\n---\n";

const INVOICE_PROMPT: &str = r#"Analyze the following document (which could be an image or text from a PDF) and extract all relevant invoice information.
Return the answer ONLY as a valid JSON object. Do not include any other text or markdown.
The JSON object must have this exact structure:
{
  "vendor": { "name": "string", "address": "string", "taxId": "string" },
  "invoice": { "number": "string", "date": "string", "currency": "string", "subtotal": number, "taxPercent": number, "total": number, "poNumber": "string", "poDate": "string" },
  "lineItems": [{ "description": "string", "unitPrice": number, "quantity": number, "total": number }]
}
If any value is not found, use an empty string "" for strings and 0 for numbers."#;

const TABLE_PROMPT: &str = r#"Analyze the document provided (image or text). Identify the main table of data.
Extract the column headers and all the rows of data from that table.
Return the answer ONLY as a valid JSON object with this exact structure:
{
  "headers": ["Header 1", "Header 2", ...],
  "rows": [
    ["Row 1 Cell 1", "Row 1 Cell 2", ...],
    ["Row 2 Cell 1", "Row 2 Cell 2", ...]
  ]
}
Do not include any other text, markdown, or explanations."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    #[default]
    Invoice,
    Table,
}

impl ExtractionMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "invoice" => Some(ExtractionMode::Invoice),
            "table" => Some(ExtractionMode::Table),
            _ => None,
        }
    }
}

/// One static instruction per mode. Image uploads send the bare prompt next
/// to inline image data; PDF uploads append the extracted text after the
/// delimiter.
pub fn build_prompt(mode: ExtractionMode, document_text: Option<&str>) -> String {
    let base = match mode {
        ExtractionMode::Invoice => INVOICE_PROMPT,
        ExtractionMode::Table => TABLE_PROMPT,
    };

    match document_text {
        Some(text) => format!("{base}{DOCUMENT_TEXT_DELIMITER}{text}"),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_prompt_enumerates_the_exact_shape() {
        let prompt = build_prompt(ExtractionMode::Invoice, None);
        assert!(prompt.contains(r#""vendor": { "name": "string", "address": "string", "taxId": "string" }"#));
        assert!(prompt.contains(r#""lineItems""#));
        assert!(prompt.contains("ONLY as a valid JSON object"));
        assert!(!prompt.contains("Document Text:"));
    }

    #[test]
    fn table_prompt_asks_for_headers_and_rows() {
        let prompt = build_prompt(ExtractionMode::Table, None);
        assert!(prompt.contains(r#""headers""#));
        assert!(prompt.contains(r#""rows""#));
    }

    #[test]
    fn pdf_text_is_appended_after_the_delimiter() {
        let prompt = build_prompt(ExtractionMode::Invoice, Some("Total: 42.00"));
        let (instruction, text) = prompt.split_once(DOCUMENT_TEXT_DELIMITER).unwrap();
        assert!(instruction.starts_with("Analyze the following document"));
        assert_eq!(text, "Total: 42.00");
    }

    #[test]
    fn mode_parse_accepts_known_variants_only() {
        assert_eq!(ExtractionMode::parse("invoice"), Some(ExtractionMode::Invoice));
        assert_eq!(ExtractionMode::parse("Table"), Some(ExtractionMode::Table));
        assert_eq!(ExtractionMode::parse("csv"), None);
    }
}
