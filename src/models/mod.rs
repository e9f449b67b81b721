use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub file_name: String,
    pub vendor: Vendor,
    pub invoice: InvoiceMeta,
    pub line_items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vendor {
    pub name: String,
    pub address: String,
    pub tax_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceMeta {
    pub number: String,
    pub date: String,
    pub currency: String,
    pub subtotal: f64,
    pub tax_percent: f64,
    pub total: f64,
    pub po_number: String,
    pub po_date: String,
}

impl Default for InvoiceMeta {
    fn default() -> Self {
        InvoiceMeta {
            number: String::new(),
            date: String::new(),
            currency: "$".to_string(),
            subtotal: 0.0,
            tax_percent: 0.0,
            total: 0.0,
            po_number: String::new(),
            po_date: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub id: String,
    pub description: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub total: f64,
}

/// Result shape of the generic-table extraction mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableExtraction {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutput {
    Invoice(Invoice),
    Table(TableExtraction),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
