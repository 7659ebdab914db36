//! Dashboard routes: the HTML page and the aggregated campaign statistics.

use axum::{extract::State, response::Html, Json};

use crate::errors::{ApiResponse, AppError};
use crate::models::campaign::CampaignSummary;
use crate::services::dashboard::{self, CampaignStats};
use crate::AppState;

const DASHBOARD_PAGE: &str = include_str!("../../templates/dashboard.html");

/// GET / — dashboard page; data is loaded client-side from the JSON API.
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

/// GET /api/campaign/stats — campaign summary, analytics and lead counts.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CampaignStats>>, AppError> {
    let stats = dashboard::get_stats(
        &state.instantly,
        &state.classifier,
        &state.config.campaign_id.to_string(),
    )
    .await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/campaigns — every campaign visible to the API key.
pub async fn campaigns(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CampaignSummary>>>, AppError> {
    let campaigns = dashboard::list_campaigns(&state.instantly).await?;
    Ok(ApiResponse::success(campaigns))
}
