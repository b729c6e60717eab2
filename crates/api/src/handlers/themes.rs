//! Handlers for the read-only theme catalog.

use axum::extract::Path;
use axum::Json;
use photobooth_core::theme::{self, CategoryInfo, Theme, THEMES};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;

/// Full catalog payload.
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub categories: Vec<CategoryInfo>,
    pub themes: &'static [Theme],
}

/// GET /api/v1/themes
///
/// List every theme together with the category descriptors.
pub async fn list_themes() -> Json<DataResponse<Catalog>> {
    Json(DataResponse {
        data: Catalog {
            categories: theme::categories(),
            themes: THEMES,
        },
    })
}

/// GET /api/v1/themes/{id}
///
/// Fetch one theme. Returns 404 for unknown ids.
pub async fn get_theme(Path(id): Path<String>) -> AppResult<Json<DataResponse<&'static Theme>>> {
    let theme = theme::require_theme(&id)?;
    Ok(Json(DataResponse { data: theme }))
}
