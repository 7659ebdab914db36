//! Campaign control routes: start and pause.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::Operator;
use crate::services::dashboard::{self, ActionResult};
use crate::services::instantly::CampaignAction;
use crate::AppState;

/// POST /api/campaign/start
pub async fn start(
    State(state): State<AppState>,
    operator: Operator,
) -> Result<Json<ApiResponse<ActionResult>>, AppError> {
    run(&state, &operator, CampaignAction::Start).await
}

/// POST /api/campaign/pause
pub async fn pause(
    State(state): State<AppState>,
    operator: Operator,
) -> Result<Json<ApiResponse<ActionResult>>, AppError> {
    run(&state, &operator, CampaignAction::Pause).await
}

async fn run(
    state: &AppState,
    operator: &Operator,
    action: CampaignAction,
) -> Result<Json<ApiResponse<ActionResult>>, AppError> {
    let campaign_id = state.config.campaign_id.to_string();
    tracing::info!(
        operator = %operator.username,
        campaign_id = %campaign_id,
        action = ?action,
        "Campaign action requested"
    );
    let result = dashboard::control_campaign(&state.instantly, &campaign_id, action).await?;
    Ok(ApiResponse::success(result))
}
