use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Submitter recorded on every new complaint until an identity system exists.
pub const SUBMITTER_PLACEHOLDER: &str = "anonymous_user";

/// Classification label a complaint is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

/// Workflow state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [Self::Pending, Self::InProgress, Self::Resolved];

    /// Returns the wire representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }

    /// Case-insensitive comparison used by list filters.
    pub fn matches_filter(self, filter: &str) -> bool {
        eq_ignore_case(self.as_str(), filter)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is exact: `"resolved"` is not a valid status for an update.
impl FromStr for ComplaintStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidStatus(value.to_string()))
    }
}

/// Compares two strings character by character, ignoring case across Unicode.
///
/// Characters match when equal, when their uppercase forms are equal, or when
/// the lowercase forms of those uppercase forms are equal, so `ſ` matches `s`.
pub(crate) fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars().count() == right.chars().count()
        && left.chars().zip(right.chars()).all(|(a, b)| {
            a == b
                || a.to_uppercase().eq(b.to_uppercase())
                || a.to_uppercase()
                    .flat_map(char::to_lowercase)
                    .eq(b.to_uppercase().flat_map(char::to_lowercase))
        })
}

/// A complaint as stored and returned over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub submitter: String,
    pub status: ComplaintStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new complaint. Missing fields deserialize to
/// `None` so that the store, not the JSON layer, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewComplaint {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewComplaint {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            category: Some(category.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_with_display_names() {
        let value = serde_json::to_value(ComplaintStatus::InProgress).unwrap();
        assert_eq!(value, json!("In Progress"));
        let parsed: ComplaintStatus = serde_json::from_value(json!("Resolved")).unwrap();
        assert_eq!(parsed, ComplaintStatus::Resolved);
    }

    #[test]
    fn status_parsing_is_case_sensitive() {
        assert_eq!(
            "In Progress".parse::<ComplaintStatus>().unwrap(),
            ComplaintStatus::InProgress
        );
        let err = "pending".parse::<ComplaintStatus>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidStatus(value) if value == "pending"));
    }

    #[test]
    fn status_filter_ignores_case() {
        assert!(ComplaintStatus::InProgress.matches_filter("in progress"));
        assert!(ComplaintStatus::Pending.matches_filter("PENDING"));
        assert!(!ComplaintStatus::Pending.matches_filter("pend"));
    }

    #[test]
    fn case_folding_covers_non_ascii_letters() {
        assert!(eq_ignore_case("reſolved", "RESOLVED"));
        assert!(ComplaintStatus::Resolved.matches_filter("reſolved"));
        assert!(eq_ignore_case("ÉTAT", "état"));
        assert!(!eq_ignore_case("Pending", "Pendin"));
        assert!(!eq_ignore_case("Pending", "Pendinh"));
    }

    #[test]
    fn complaint_uses_camel_case_fields() {
        let complaint = Complaint {
            id: "c001".into(),
            title: "Title".into(),
            description: "Body".into(),
            category: "billing inquiry".into(),
            submitter: SUBMITTER_PLACEHOLDER.into(),
            status: ComplaintStatus::Pending,
            submitted_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let value = serde_json::to_value(&complaint).unwrap();
        assert_eq!(value["submittedAt"], json!("2024-01-01T00:00:00Z"));
        assert_eq!(value["status"], json!("Pending"));
        assert_eq!(value["category"], json!("billing inquiry"));
        assert!(value.get("submitted_at").is_none());
    }

    #[test]
    fn new_complaint_tolerates_missing_fields() {
        let request: NewComplaint =
            serde_json::from_value(json!({ "title": "Only title" })).unwrap();
        assert_eq!(request.title.as_deref(), Some("Only title"));
        assert!(request.description.is_none());
        assert!(request.category.is_none());
    }
}
