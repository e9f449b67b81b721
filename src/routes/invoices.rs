use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::error::AppError;
use crate::models::{DeleteResponse, Invoice};
use crate::services::normalize::reconcile_line_items;
use crate::services::state::AppState;

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(mut invoice): Json<Invoice>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    if invoice.file_name.trim().is_empty() {
        return Err(AppError::Validation("fileName is required".to_string()));
    }

    // Saved totals go through the same reconciliation as extracted ones.
    reconcile_line_items(&mut invoice.line_items);

    let db = state.db.lock().map_err(|_| AppError::StoreLock)?;
    let stored = db.create_invoice(&invoice)?;

    tracing::info!(id = ?stored.id, file_name = %stored.file_name, "invoice saved");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let db = state.db.lock().map_err(|_| AppError::StoreLock)?;
    Ok(Json(db.list_invoices()?))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let db = state.db.lock().map_err(|_| AppError::StoreLock)?;
    if !db.delete_invoice(&id)? {
        return Err(AppError::NotFound);
    }

    tracing::info!(%id, "invoice deleted");
    Ok(Json(DeleteResponse {
        message: "Invoice deleted successfully.".to_string(),
    }))
}
