//! Lead segmentation: classify, filter and count leads for display.
//!
//! Classification is a pure function of a lead's fields and is recomputed on
//! every request. Every lead lands in exactly one of `clinics` and `other`;
//! `all` is their union in upstream order.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::lead::{Lead, LeadStatus};

/// Named lead segment.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Clinics,
    Other,
    All,
}

impl Segment {
    /// Parse a segment name from a query string. Unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "clinics" | "clinic" => Some(Self::Clinics),
            "other" => Some(Self::Other),
            "all" => Some(Self::All),
            _ => None,
        }
    }

}

/// Keyword matcher deciding whether a lead is a clinic lead.
#[derive(Debug, Clone)]
pub struct LeadClassifier {
    pattern: Option<Regex>,
}

impl LeadClassifier {
    /// Build a case-insensitive matcher over the given keywords.
    ///
    /// Keywords are matched literally as substrings of the company name. An
    /// empty keyword list classifies every lead as `other`.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, AppError> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Internal(format!("Invalid clinic keyword pattern: {e}")))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// True when the lead has a usable email and a clinic-like company name.
    pub fn is_clinic(&self, lead: &Lead) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };
        lead.usable_email().is_some()
            && lead
                .company_name
                .as_deref()
                .is_some_and(|name| pattern.is_match(name))
    }

    /// The exclusive display segment of a lead (never `All`).
    pub fn classify(&self, lead: &Lead) -> Segment {
        if self.is_clinic(lead) {
            Segment::Clinics
        } else {
            Segment::Other
        }
    }

    /// Leads matching a segment name, in input order.
    ///
    /// Unknown segment names select nothing rather than failing.
    pub fn filter<'a>(&self, leads: &'a [Lead], segment_name: &str) -> SegmentSelection<'a> {
        let segment = Segment::parse(segment_name);
        let selected: Vec<&Lead> = match segment {
            Some(Segment::All) => leads.iter().collect(),
            Some(wanted) => leads
                .iter()
                .filter(|lead| self.classify(lead) == wanted)
                .collect(),
            None => {
                tracing::debug!(segment = segment_name, "Unknown lead segment requested");
                Vec::new()
            }
        };

        SegmentSelection {
            segment,
            count: selected.len(),
            leads: selected,
        }
    }

    /// Split leads into the two exclusive display segments.
    pub fn partition<'a>(&self, leads: &'a [Lead]) -> Partition<'a> {
        let (clinics, other) = leads.iter().partition(|lead| self.is_clinic(lead));
        Partition { clinics, other }
    }

    /// Segment and status counts for the stats panel.
    pub fn counts(&self, leads: &[Lead]) -> SegmentCounts {
        let partition = self.partition(leads);
        let with_status = |status: LeadStatus| {
            partition
                .clinics
                .iter()
                .filter(|lead| lead.status == status)
                .count()
        };

        SegmentCounts {
            total_leads: leads.len(),
            clinic_leads: partition.clinics.len(),
            other_leads: partition.other.len(),
            active_leads: with_status(LeadStatus::Active),
            pending_leads: with_status(LeadStatus::Pending),
        }
    }
}

/// Result of filtering leads by segment name.
#[derive(Debug)]
pub struct SegmentSelection<'a> {
    /// `None` when the requested name was not a known segment.
    pub segment: Option<Segment>,
    pub leads: Vec<&'a Lead>,
    pub count: usize,
}

/// Leads split into the two exclusive display segments.
#[derive(Debug)]
pub struct Partition<'a> {
    pub clinics: Vec<&'a Lead>,
    pub other: Vec<&'a Lead>,
}

/// Counts shown on the dashboard. Active/pending count clinic leads only, and
/// pending means upstream code `0` (paused or unknown leads are in neither).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SegmentCounts {
    pub total_leads: usize,
    pub clinic_leads: usize,
    pub other_leads: usize,
    pub active_leads: usize,
    pub pending_leads: usize,
}
