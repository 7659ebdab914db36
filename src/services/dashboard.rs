//! Dashboard aggregation over live campaign API data.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::campaign::{AnalyticsSummary, CampaignSummary};
use crate::models::lead::LeadView;
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::instantly::{CampaignAction, InstantlyClient};
use crate::services::segments::{LeadClassifier, Segment, SegmentCounts};

/// Aggregated statistics for the dashboard overview.
#[derive(Debug, Serialize)]
pub struct CampaignStats {
    pub campaign: CampaignSummary,
    pub analytics: AnalyticsSummary,
    pub stats: SegmentCounts,
}

/// One page of leads from a segment.
#[derive(Debug, Serialize)]
pub struct LeadPage {
    /// `None` when the requested segment name is unknown.
    pub segment: Option<Segment>,
    #[serde(flatten)]
    pub page: PagedResult<LeadView>,
}

/// Outcome of a start/pause request.
#[derive(Debug, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

/// Fetch campaign details, analytics and all leads concurrently.
pub async fn get_stats(
    client: &InstantlyClient,
    classifier: &LeadClassifier,
    campaign_id: &str,
) -> Result<CampaignStats, AppError> {
    let (campaign, analytics, leads) = tokio::try_join!(
        client.get_campaign(campaign_id),
        client.get_campaign_analytics(campaign_id),
        client.list_all_leads(campaign_id),
    )?;

    Ok(CampaignStats {
        campaign: CampaignSummary::from(&campaign),
        analytics: AnalyticsSummary::from(&analytics),
        stats: classifier.counts(&leads),
    })
}

/// List one page of a segment's leads.
pub async fn list_leads(
    client: &InstantlyClient,
    classifier: &LeadClassifier,
    campaign_id: &str,
    segment_name: &str,
    pagination: &Pagination,
) -> Result<LeadPage, AppError> {
    let leads = client.list_all_leads(campaign_id).await?;
    let selection = classifier.filter(&leads, segment_name);

    Ok(LeadPage {
        segment: selection.segment,
        page: PagedResult::from_slice(&selection.leads, pagination, |lead| LeadView::from(*lead)),
    })
}

/// All campaigns visible to the API key.
pub async fn list_campaigns(client: &InstantlyClient) -> Result<Vec<CampaignSummary>, AppError> {
    let campaigns = client.list_campaigns().await?;
    Ok(campaigns.iter().map(CampaignSummary::from).collect())
}

/// Forward a start or pause action for the campaign.
pub async fn control_campaign(
    client: &InstantlyClient,
    campaign_id: &str,
    action: CampaignAction,
) -> Result<ActionResult, AppError> {
    client.set_campaign_status(campaign_id, action).await?;
    Ok(ActionResult {
        success: true,
        message: action.done_message().to_string(),
    })
}
