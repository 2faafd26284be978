//! Template download, export and spreadsheet upload handlers

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::excel::{XLSX_CONTENT_TYPE, write_template};
use crate::export::export_workbook;
use crate::import::{EntityKind, ImportOutcome, Importer};

use super::auth::CurrentUser;
use super::error::ApiError;
use super::extract::{Json, Multipart, Path};
use super::state::AppState;

/// Name of the multipart field carrying the workbook
const FILE_FIELD: &str = "file";

fn xlsx_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

pub async fn template(Path(kind): Path<EntityKind>) -> Result<Response, ApiError> {
    let bytes = write_template(kind)?;
    Ok(xlsx_attachment(kind.template_filename(), bytes))
}

pub async fn export(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(kind): Path<EntityKind>,
) -> Result<Response, ApiError> {
    let bytes = export_workbook(&state.pool, kind).await?;
    Ok(xlsx_attachment(kind.export_filename(), bytes))
}

/// Import an uploaded workbook. Row-level problems come back in the report;
/// only an unusable file fails the request.
pub async fn import(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(kind): Path<EntityKind>,
    Multipart(mut multipart): Multipart,
) -> Result<Json<ImportOutcome>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| ApiError::Validation(format!("Missing multipart field '{}'", FILE_FIELD)))?;

    log::info!(
        "{} uploaded '{}' ({} bytes) for {} import",
        user.sub,
        file_name,
        bytes.len(),
        kind
    );

    let outcome = Importer::new(&state.pool)
        .import(kind, &file_name, bytes)
        .await?;
    Ok(Json(outcome))
}
