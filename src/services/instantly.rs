//! Instantly v2 API client.
//!
//! Every operation is exactly one HTTP request (the full campaign and lead
//! listings issue one per page). Failures of any kind become `AppError::Upstream`; nothing is retried.

use std::future::Future;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::campaign::{Campaign, CampaignAnalytics, ListPage};
use crate::models::lead::Lead;

/// Page size requested from `POST /leads/list` (upstream maximum).
pub const LEADS_PAGE_SIZE: u32 = 100;

/// Page size requested from `GET /campaigns`.
pub const CAMPAIGNS_PAGE_SIZE: u32 = 100;

/// Maximum characters of an upstream body kept in logs and error messages.
const BODY_EXCERPT_LIMIT: usize = 256;

/// Control action forwarded to the campaign API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignAction {
    Start,
    Pause,
}

impl CampaignAction {
    fn endpoint(&self) -> &'static str {
        match self {
            Self::Start => "activate",
            Self::Pause => "pause",
        }
    }

    /// Confirmation shown to the operator on success.
    pub fn done_message(&self) -> &'static str {
        match self {
            Self::Start => "Campaign started",
            Self::Pause => "Campaign paused",
        }
    }
}

#[derive(Debug, Serialize)]
struct LeadListRequest<'a> {
    campaign: &'a str,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    starting_after: Option<&'a str>,
}

/// Authenticated client for the campaign API.
#[derive(Clone)]
pub struct InstantlyClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for InstantlyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstantlyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl InstantlyClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET /campaigns — one page of the campaigns visible to the API key.
    pub async fn list_campaigns_page(
        &self,
        starting_after: Option<&str>,
    ) -> Result<ListPage<Campaign>, AppError> {
        let path = "campaigns";
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| AppError::Internal(format!("Invalid campaign API URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("limit", &CAMPAIGNS_PAGE_SIZE.to_string());
        if let Some(cursor) = starting_after {
            url.query_pairs_mut().append_pair("starting_after", cursor);
        }
        self.send_json(self.http.get(url), "GET", path).await
    }

    /// Walk every campaign page visible to the API key.
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, AppError> {
        let campaigns = collect_pages("campaign", |cursor| async move {
            self.list_campaigns_page(cursor.as_deref()).await
        })
        .await?;
        tracing::debug!(count = campaigns.len(), "Fetched campaigns");
        Ok(campaigns)
    }

    /// GET /campaigns/{id}
    pub async fn get_campaign(&self, campaign_id: &str) -> Result<Campaign, AppError> {
        let path = format!("campaigns/{campaign_id}");
        self.send_json(self.http.get(self.url(&path)), "GET", &path)
            .await
    }

    /// GET /campaigns/analytics?id={id} — zeroed counters if the campaign has none yet.
    pub async fn get_campaign_analytics(
        &self,
        campaign_id: &str,
    ) -> Result<CampaignAnalytics, AppError> {
        let path = format!("campaigns/analytics?id={campaign_id}");
        let rows: Vec<CampaignAnalytics> = self
            .send_json(self.http.get(self.url(&path)), "GET", &path)
            .await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// POST /leads/list — one page of a campaign's leads.
    pub async fn list_leads_page(
        &self,
        campaign_id: &str,
        starting_after: Option<&str>,
    ) -> Result<ListPage<Lead>, AppError> {
        let path = "leads/list";
        let body = LeadListRequest {
            campaign: campaign_id,
            limit: LEADS_PAGE_SIZE,
            starting_after,
        };
        self.send_json(self.http.post(self.url(path)).json(&body), "POST", path)
            .await
    }

    /// Walk every lead page of a campaign, in upstream order.
    pub async fn list_all_leads(&self, campaign_id: &str) -> Result<Vec<Lead>, AppError> {
        let leads = collect_pages("lead", |cursor| async move {
            self.list_leads_page(campaign_id, cursor.as_deref()).await
        })
        .await?;
        tracing::debug!(campaign_id, count = leads.len(), "Fetched campaign leads");
        Ok(leads)
    }

    /// POST /campaigns/{id}/activate or /pause
    pub async fn set_campaign_status(
        &self,
        campaign_id: &str,
        action: CampaignAction,
    ) -> Result<(), AppError> {
        let path = format!("campaigns/{campaign_id}/{}", action.endpoint());
        self.send(self.http.post(self.url(&path)), "POST", &path)
            .await?;
        tracing::info!(campaign_id, action = ?action, "Campaign status changed");
        Ok(())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<T, AppError> {
        let (status, body) = self.send(request, method, path).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                method,
                path,
                error = %e,
                body = %excerpt(&body),
                "Unexpected response shape"
            );
            AppError::upstream(Some(status), format!("unexpected response from {path}: {e}"))
        })
    }

    /// Send an authenticated request; non-2xx statuses become errors.
    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<(u16, String), AppError> {
        tracing::debug!(method, path, "Upstream request");

        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::upstream(None, format!("{method} {path} failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::upstream(
                Some(status.as_u16()),
                format!("failed to read response body: {e}"),
            )
        })?;

        tracing::debug!(method, path, status = status.as_u16(), "Upstream response");

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "request failed".to_string());
            return Err(AppError::upstream(Some(status.as_u16()), message));
        }

        Ok((status.as_u16(), body))
    }
}

/// Follow `next_starting_after` cursors until a page is empty or has no cursor.
///
/// A failing page fails the whole listing, and so does a cursor that does not
/// advance: either way the caller never sees a partial list.
async fn collect_pages<T, F, Fut>(what: &str, mut fetch: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ListPage<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.clone()).await?;
        if page.items.is_empty() {
            break;
        }
        items.extend(page.items);

        match page.next_starting_after {
            Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                tracing::error!(cursor = %next, what, "Upstream cursor did not advance");
                return Err(AppError::upstream(
                    None,
                    format!("{what} cursor did not advance past {next}"),
                ));
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}

/// Pull a human readable message out of an upstream error body.
///
/// Prefers the JSON `message` (or `error`) field, falling back to the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
        });
    Some(from_json.unwrap_or_else(|| excerpt(body)))
}

fn excerpt(s: &str) -> String {
    if s.chars().count() <= BODY_EXCERPT_LIMIT {
        s.to_string()
    } else {
        let head: String = s.chars().take(BODY_EXCERPT_LIMIT).collect();
        format!("{head}... [truncated, total {} bytes]", s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = InstantlyClient::new("http://localhost:1/api/v2/", "k");
        assert_eq!(
            client.url("/campaigns/abc"),
            "http://localhost:1/api/v2/campaigns/abc"
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let client = InstantlyClient::new("http://localhost:1", "secret-key");
        assert!(!format!("{client:?}").contains("secret-key"));
    }

    #[test]
    fn error_message_prefers_json_message() {
        let body = r#"{"statusCode":400,"error":"Bad Request","message":"campaign not found"}"#;
        assert_eq!(error_message(body).as_deref(), Some("campaign not found"));
        assert_eq!(
            error_message(r#"{"error":"Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
    }

    #[test]
    fn error_message_falls_back_to_text() {
        assert_eq!(
            error_message("Service Unavailable").as_deref(),
            Some("Service Unavailable")
        );
        assert_eq!(error_message("   "), None);
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(1000);
        let cut = excerpt(&long);
        assert!(cut.starts_with(&"x".repeat(BODY_EXCERPT_LIMIT)));
        assert!(cut.ends_with("[truncated, total 1000 bytes]"));
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn lead_request_omits_missing_cursor() {
        let body = LeadListRequest {
            campaign: "c1",
            limit: LEADS_PAGE_SIZE,
            starting_after: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["campaign"], "c1");
        assert_eq!(json["limit"], 100);
        assert!(json.get("starting_after").is_none());
    }

    #[test]
    fn action_endpoints() {
        assert_eq!(CampaignAction::Start.endpoint(), "activate");
        assert_eq!(CampaignAction::Pause.endpoint(), "pause");
        assert_eq!(CampaignAction::Pause.done_message(), "Campaign paused");
    }

    fn page(items: &[&str], next: Option<&str>) -> ListPage<String> {
        ListPage {
            items: items.iter().map(|s| s.to_string()).collect(),
            next_starting_after: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn collect_pages_follows_cursor_until_absent() {
        let mut seen = Vec::new();
        let items = collect_pages("test", |cursor| {
            seen.push(cursor.clone());
            async move {
                Ok(match cursor.as_deref() {
                    None => page(&["a", "b"], Some("b")),
                    Some("b") => page(&["c"], None),
                    Some(other) => panic!("unexpected cursor {other}"),
                })
            }
        })
        .await
        .unwrap();
        assert_eq!(items, vec!["a", "b", "c"]);
        assert_eq!(seen, vec![None, Some("b".to_string())]);
    }

    #[tokio::test]
    async fn collect_pages_rejects_repeated_cursor() {
        let err = collect_pages("lead", |_| async { Ok(page(&["a"], Some("a"))) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: None, .. }));
        assert!(err.to_string().contains("lead cursor did not advance past a"));
    }

    #[tokio::test]
    async fn collect_pages_stops_on_empty_page() {
        let items: Vec<String> = collect_pages("test", |_| async { Ok(page(&[], Some("x"))) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
