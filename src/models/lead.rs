//! Lead records as returned by `POST /leads/list`.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder some imports write instead of leaving the email empty.
pub const NO_EMAIL_PLACEHOLDER: &str = "No email";

/// Sending state of a lead within its campaign.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Pending,
    Active,
    Paused,
    Completed,
    Failed,
    #[default]
    Unknown,
}

impl LeadStatus {
    /// Map the upstream integer code.
    ///
    /// `0` not contacted yet, `1` active, `2` paused, `3` completed, negative
    /// codes (bounced, unsubscribed, skipped) failed.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Pending,
            1 => Self::Active,
            2 => Self::Paused,
            3 => Self::Completed,
            c if c < 0 => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<i64>::deserialize(deserializer)?;
        Ok(code.map(Self::from_code).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
}

impl Lead {
    /// The lead's email if it is present and not a placeholder.
    pub fn usable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty() && *e != NO_EMAIL_PLACEHOLDER)
    }
}

/// Extra contact fields shown next to a lead.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeadContact {
    pub website: String,
    pub phone: String,
}

/// Lead row as rendered in the dashboard table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeadView {
    pub id: String,
    pub email: String,
    pub company: String,
    pub status: &'static str,
    pub custom_fields: LeadContact,
}

impl From<&Lead> for LeadView {
    fn from(l: &Lead) -> Self {
        Self {
            id: l.id.clone(),
            email: l
                .usable_email()
                .unwrap_or(NO_EMAIL_PLACEHOLDER)
                .to_string(),
            company: l
                .company_name
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "No company".to_string()),
            status: l.status.label(),
            custom_fields: LeadContact {
                website: l.website.clone().unwrap_or_default(),
                phone: l.phone.clone().unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(LeadStatus::from_code(0), LeadStatus::Pending);
        assert_eq!(LeadStatus::from_code(1), LeadStatus::Active);
        assert_eq!(LeadStatus::from_code(2), LeadStatus::Paused);
        assert_eq!(LeadStatus::from_code(3), LeadStatus::Completed);
        assert_eq!(LeadStatus::from_code(-1), LeadStatus::Failed);
        assert_eq!(LeadStatus::from_code(-3), LeadStatus::Failed);
        assert_eq!(LeadStatus::from_code(7), LeadStatus::Unknown);
    }

    #[test]
    fn lead_decodes_sparse_record() {
        let lead: Lead = serde_json::from_str(r#"{"id":"l1","status":null}"#).unwrap();
        assert_eq!(lead.status, LeadStatus::Unknown);
        assert!(lead.email.is_none());
        assert!(lead.usable_email().is_none());
    }

    #[test]
    fn placeholder_email_is_not_usable() {
        let lead: Lead =
            serde_json::from_str(r#"{"id":"l1","email":"No email","status":1}"#).unwrap();
        assert!(lead.usable_email().is_none());
        assert_eq!(lead.status, LeadStatus::Active);
    }

    #[test]
    fn view_fills_placeholders() {
        let lead: Lead = serde_json::from_str(
            r#"{"id":"l1","email":"dr@clinic.test","phone":"555-0100","status":3}"#,
        )
        .unwrap();
        let view = LeadView::from(&lead);
        assert_eq!(view.email, "dr@clinic.test");
        assert_eq!(view.company, "No company");
        assert_eq!(view.status, "Completed");
        assert_eq!(view.custom_fields.phone, "555-0100");
        assert_eq!(view.custom_fields.website, "");
    }
}
