//! Lead routes: segment-filtered, paginated lead listing.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::models::pagination::Pagination;
use crate::services::dashboard::{self, LeadPage};
use crate::AppState;

/// Segment shown when the request names none.
const DEFAULT_SEGMENT: &str = "clinics";

#[derive(Debug, Deserialize)]
pub struct LeadFilters {
    #[serde(alias = "filter")]
    pub segment: Option<String>,
}

/// GET /api/campaign/leads?segment=&page=&per_page= — leads of one segment.
pub async fn list(
    State(state): State<AppState>,
    pagination: Result<Query<Pagination>, QueryRejection>,
    filters: Result<Query<LeadFilters>, QueryRejection>,
) -> Result<Json<ApiResponse<LeadPage>>, AppError> {
    let Query(pagination) = pagination.map_err(bad_query)?;
    let Query(filters) = filters.map_err(bad_query)?;
    let segment = filters.segment.as_deref().unwrap_or(DEFAULT_SEGMENT);
    let page = dashboard::list_leads(
        &state.instantly,
        &state.classifier,
        &state.config.campaign_id.to_string(),
        segment,
        &pagination,
    )
    .await?;
    Ok(ApiResponse::success(page))
}

fn bad_query(rejection: QueryRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
