//! Unknown-tag ledger routes.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use domain::models::UnknownRfid;
use domain::services::tenancy::{authorize, Action};
use persistence::repositories::UnknownRfidRepository;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// List recently seen unknown tags. The ledger has no dormitory scope: an
/// unmatched tag cannot be attributed to one, so any authenticated staff
/// account may read it.
///
/// GET /api/v1/unknown-rfids
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UnknownRfid>>, ApiError> {
    authorize(&current.principal(), Action::Read, None)?;

    let entities = UnknownRfidRepository::new(state.pool.clone())
        .list_recent(query.limit.clamp(1, 500))
        .await?;
    Ok(Json(entities.into_iter().map(UnknownRfid::from).collect()))
}
