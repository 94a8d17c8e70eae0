use axum::extract::{Path, State};
use axum::Json;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::{PersonBundle, PersonSummary};

/// GET /api/v1/persons
pub async fn handle_list_persons(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonSummary>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/v1/persons/:name
pub async fn handle_get_person(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PersonBundle>, AppError> {
    let bundle = state
        .store
        .load(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No stored profile for '{name}'")))?;
    Ok(Json(bundle))
}
