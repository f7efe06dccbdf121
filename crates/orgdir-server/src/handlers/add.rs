//! POST /add/add_data/ — ingest one building, organization and activity forest.

use axum::http::StatusCode;
use axum::{Extension, Json};
use orgdir_core::NewEntry;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AddDataResponse {
    pub message: &'static str,
}

pub async fn add_data(
    Extension(state): Extension<AppState>,
    Json(entry): Json<NewEntry>,
) -> Result<(StatusCode, Json<AddDataResponse>), AppError> {
    state.run(state.directory.add_data(&entry)).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddDataResponse {
            message: "Data added successfully",
        }),
    ))
}
