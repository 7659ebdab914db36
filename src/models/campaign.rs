//! Campaign records as returned by the Instantly v2 API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Daily send limit assumed when the upstream omits it.
pub const DEFAULT_DAILY_LIMIT: i64 = 50;

/// Dashboard view of a campaign's sending state.
///
/// Upstream encodes status as an integer; only `1` means the campaign is
/// sending. Draft, paused, completed and error states all display as paused.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    #[default]
    Paused,
}

impl CampaignStatus {
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Self::Active
        } else {
            Self::Paused
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
        }
    }
}

impl<'de> Deserialize<'de> for CampaignStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<i64>::deserialize(deserializer)?;
        Ok(code.map(Self::from_code).unwrap_or_default())
    }
}

/// Campaign row from `GET /campaigns` and `GET /campaigns/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default = "default_daily_limit", deserialize_with = "limit_or_default")]
    pub daily_limit: i64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp_created: Option<DateTime<Utc>>,
}

fn default_daily_limit() -> i64 {
    DEFAULT_DAILY_LIMIT
}

fn limit_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(DEFAULT_DAILY_LIMIT))
}

/// Accept RFC 3339 or a bare `YYYY-MM-DD HH:MM:SS` (read as UTC).
///
/// Anything else becomes `None`: the timestamp is display-only and must not
/// fail an otherwise valid campaign.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    let parsed = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc());
    if parsed.is_none() {
        tracing::debug!(value = raw, "Ignoring unparseable campaign timestamp");
    }
    Ok(parsed)
}

/// Paged list envelope used by the v2 list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_starting_after: Option<String>,
}

/// Aggregate counters from `GET /campaigns/analytics`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CampaignAnalytics {
    #[serde(default)]
    pub emails_sent_count: i64,
    #[serde(default)]
    pub open_count: i64,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default)]
    pub leads_count: i64,
}

/// Campaign summary as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    pub status: &'static str,
    pub daily_limit: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Campaign> for CampaignSummary {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            status: c.status.label(),
            daily_limit: c.daily_limit,
            created_at: c.timestamp_created,
        }
    }
}

/// Send/open/reply totals as shown on the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub sent: i64,
    pub opened: i64,
    pub replied: i64,
    /// Leads the campaign API counts for the campaign.
    pub leads: i64,
}

impl From<&CampaignAnalytics> for AnalyticsSummary {
    fn from(a: &CampaignAnalytics) -> Self {
        Self {
            sent: a.emails_sent_count,
            opened: a.open_count,
            replied: a.reply_count,
            leads: a.leads_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(CampaignStatus::from_code(1), CampaignStatus::Active);
        assert_eq!(CampaignStatus::from_code(0), CampaignStatus::Paused);
        assert_eq!(CampaignStatus::from_code(2), CampaignStatus::Paused);
        assert_eq!(CampaignStatus::from_code(-99), CampaignStatus::Paused);
    }

    #[test]
    fn campaign_defaults_missing_fields() {
        let c: Campaign =
            serde_json::from_str(r#"{"id":"c1","name":"WA Integrative Medicine"}"#).unwrap();
        assert_eq!(c.status, CampaignStatus::Paused);
        assert_eq!(c.daily_limit, DEFAULT_DAILY_LIMIT);
        assert!(c.timestamp_created.is_none());
    }

    #[test]
    fn campaign_null_limit_defaults() {
        let c: Campaign = serde_json::from_str(
            r#"{"id":"c1","name":"n","status":1,"daily_limit":null,"timestamp_created":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(c.status, CampaignStatus::Active);
        assert_eq!(c.daily_limit, DEFAULT_DAILY_LIMIT);
        assert!(c.timestamp_created.is_some());
    }

    #[test]
    fn campaign_without_name_is_rejected() {
        let result = serde_json::from_str::<Campaign>(r#"{"id":"c1","status":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn summary_uses_display_label() {
        let c = Campaign {
            id: "c1".into(),
            name: "n".into(),
            status: CampaignStatus::Active,
            daily_limit: 30,
            timestamp_created: None,
        };
        let summary = CampaignSummary::from(&c);
        assert_eq!(summary.status, "Active");
        assert_eq!(summary.daily_limit, 30);
        assert!(summary.created_at.is_none());
    }

    #[test]
    fn timestamp_without_zone_is_read_as_utc() {
        let c: Campaign = serde_json::from_str(
            r#"{"id":"c1","name":"n","timestamp_created":"2025-01-02 03:04:05"}"#,
        )
        .unwrap();
        let summary = CampaignSummary::from(&c);
        assert_eq!(
            summary.created_at.map(|ts| ts.to_rfc3339()).as_deref(),
            Some("2025-01-02T03:04:05+00:00")
        );
    }

    #[test]
    fn unparseable_timestamp_is_dropped() {
        for raw in [r#""yesterday""#, "null"] {
            let json = format!(r#"{{"id":"c1","name":"n","timestamp_created":{raw}}}"#);
            let c: Campaign = serde_json::from_str(&json).unwrap();
            assert!(c.timestamp_created.is_none(), "{raw}");
        }
    }

    #[test]
    fn analytics_summary_includes_lead_total() {
        let a: CampaignAnalytics = serde_json::from_str(
            r#"{"emails_sent_count":12,"open_count":5,"reply_count":2,"leads_count":40}"#,
        )
        .unwrap();
        assert_eq!(
            AnalyticsSummary::from(&a),
            AnalyticsSummary {
                sent: 12,
                opened: 5,
                replied: 2,
                leads: 40
            }
        );
    }
}
