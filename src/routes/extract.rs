use axum::extract::{Multipart, State};
use axum::response::Json;

use crate::error::AppError;
use crate::models::ExtractionOutput;
use crate::services::gateway::Provider;
use crate::services::processor::{run_extraction, UploadedDocument};
use crate::services::prompt::ExtractionMode;
use crate::services::state::AppState;
use crate::utils::sha256_hex;

pub async fn extract_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionOutput>, AppError> {
    let mut upload: Option<UploadedDocument> = None;
    let mut provider = Provider::default();
    let mut mode = ExtractionMode::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                upload = Some(UploadedDocument {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "provider" => {
                let value = field.text().await?;
                provider =
                    Provider::parse(&value).ok_or(AppError::UnknownProvider(value))?;
            }
            "mode" => {
                let value = field.text().await?;
                mode = ExtractionMode::parse(&value).ok_or(AppError::UnknownMode(value))?;
            }
            _ => {}
        }
    }

    let upload = upload.ok_or(AppError::NoFile)?;

    tracing::info!(
        file_name = %upload.file_name,
        content_type = %upload.content_type,
        size = upload.bytes.len(),
        sha256 = %sha256_hex(&upload.bytes),
        "received document for extraction"
    );

    let gateway = state.gateways.select(provider)?;
    let output = run_extraction(gateway, mode, &upload).await?;

    Ok(Json(output))
}
