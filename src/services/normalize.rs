use serde_json::Value;
use uuid::Uuid;

use crate::models::{Invoice, InvoiceMeta, LineItem, TableExtraction, Vendor};
use crate::utils::{parse_decimal, round2};

/// Maps recovered JSON of arbitrary shape onto the canonical invoice:
/// missing or mistyped strings become empty, numbers become 0, line totals
/// are recomputed, and every line item gets an id. Idempotent.
pub fn normalize_invoice(value: &Value, file_name: &str) -> Invoice {
    let vendor = value.get("vendor");
    let meta = value.get("invoice");

    let line_items = value
        .get("lineItems")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_line_item).collect())
        .unwrap_or_default();

    Invoice {
        id: None,
        file_name: file_name.to_string(),
        vendor: Vendor {
            name: string_field(vendor, "name"),
            address: string_field(vendor, "address"),
            tax_id: string_field(vendor, "taxId"),
        },
        invoice: InvoiceMeta {
            number: string_field(meta, "number"),
            date: string_field(meta, "date"),
            currency: currency_field(meta),
            subtotal: number_field(meta, "subtotal"),
            tax_percent: number_field(meta, "taxPercent"),
            total: number_field(meta, "total"),
            po_number: string_field(meta, "poNumber"),
            po_date: string_field(meta, "poDate"),
        },
        line_items,
        created_at: None,
    }
}

fn normalize_line_item(item: &Value) -> LineItem {
    let quantity = number_field(Some(item), "quantity");
    let unit_price = number_field(Some(item), "unitPrice");

    let id = match item.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    LineItem {
        id,
        description: string_field(Some(item), "description"),
        unit_price,
        quantity,
        total: line_total(quantity, unit_price),
    }
}

/// The single place line totals come from. The model's arithmetic is never
/// trusted; the same function runs on extraction and again on save.
pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    round2(quantity * unit_price)
}

pub fn reconcile_line_items(items: &mut [LineItem]) {
    for item in items {
        item.total = line_total(item.quantity, item.unit_price);
    }
}

/// Generic-table counterpart: headers and cells coerced to strings, missing
/// arrays become empty. Ragged rows are kept as the model produced them.
pub fn normalize_table(value: &Value) -> TableExtraction {
    let headers = value
        .get("headers")
        .and_then(Value::as_array)
        .map(|cells| cells.iter().map(cell_string).collect())
        .unwrap_or_default();

    let rows = value
        .get("rows")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| cells.iter().map(cell_string).collect())
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default();

    TableExtraction { headers, rows }
}

fn string_field(object: Option<&Value>, key: &str) -> String {
    object
        .and_then(|value| value.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn number_field(object: Option<&Value>, key: &str) -> f64 {
    match object.and_then(|value| value.get(key)) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_decimal(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn currency_field(meta: Option<&Value>) -> String {
    let currency = string_field(meta, "currency");
    if currency.is_empty() {
        "$".to_string()
    } else {
        currency
    }
}

fn cell_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
