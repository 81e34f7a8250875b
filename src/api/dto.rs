//! Data Transfer Objects
//!
//! Request and response types for the issue-report endpoint and the
//! upstream contact relay.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sanitize::strip_html_tags;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Issue report submitted from the contact form.
///
/// Every field is optional at the wire level so that missing fields are
/// reported by [`IssueReport::missing_fields`] rather than by the JSON
/// extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// May contain rich-text markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Recipient override forwarded to the relay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl IssueReport {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            subject: Some(subject.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    /// Required fields that are absent or blank, in declaration order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect()
    }

    /// Whether `email` has a `local@domain.tld` shape
    pub fn has_valid_email(&self) -> bool {
        self.email
            .as_deref()
            .map_or(false, |email| EMAIL.is_match(email.trim()))
    }
}

/// Payload forwarded to the contact relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Always `issue_report`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub priority: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

pub const ISSUE_REPORT_TYPE: &str = "issue_report";

impl RelayPayload {
    /// Build the relay payload from a validated report.
    ///
    /// `default_to` is used when the report does not name a recipient.
    pub fn from_report(report: &IssueReport, default_to: Option<&str>) -> Self {
        let name = trimmed(&report.name).unwrap_or_default();
        let email = trimmed(&report.email).unwrap_or_default();
        let organization = trimmed(&report.organization);
        let priority = trimmed(&report.priority).unwrap_or_else(|| "medium".to_string());
        let category = trimmed(&report.category).unwrap_or_else(|| "general".to_string());
        let kind = trimmed(&report.kind).unwrap_or_else(|| "bug".to_string());
        let description = strip_html_tags(report.description.as_deref().unwrap_or_default());

        let message = format!(
            "Issue report from {name} <{email}>\n\
             Organization: {organization}\n\
             Category: {category}\n\
             Priority: {priority}\n\
             Type: {kind}\n\
             \n\
             Description:\n\
             {description}",
            organization = organization.as_deref().unwrap_or("Not provided"),
        );

        Self {
            subject: trimmed(&report.subject).unwrap_or_default(),
            message,
            kind: ISSUE_REPORT_TYPE.to_string(),
            organization,
            priority,
            category,
            to: trimmed(&report.to).or_else(|| default_to.map(str::to_string)),
            name,
            email,
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Relay status: "ok" or "unreachable"
    pub relay: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let report: IssueReport =
            serde_json::from_str(r#"{"name": "Ana", "email": "ana@example.org", "subject": "  "}"#)
                .unwrap();

        assert_eq!(report.missing_fields(), vec!["subject", "description"]);
        assert!(IssueReport::new("a", "b@c.de", "s", "d").missing_fields().is_empty());
    }

    #[test]
    fn test_email_shape() {
        let mut report = IssueReport::new("a", "not-an-email", "s", "d");
        assert!(!report.has_valid_email());

        for bad in ["a@b", "@b.c", "a b@c.d", "a@b.", ""] {
            report.email = Some(bad.to_string());
            assert!(!report.has_valid_email(), "{:?} accepted", bad);
        }

        for good in ["a@b.co", " ops@food-bank.org ", "first.last+tag@mail.example.com"] {
            report.email = Some(good.to_string());
            assert!(report.has_valid_email(), "{:?} rejected", good);
        }
    }

    #[test]
    fn test_type_field_renamed() {
        let report: IssueReport = serde_json::from_str(r#"{"type": "feature"}"#).unwrap();
        assert_eq!(report.kind.as_deref(), Some("feature"));
    }

    #[test]
    fn test_relay_payload_composition() {
        let mut report = IssueReport::new(
            "  Ana Ruiz ",
            " ana@example.org ",
            "Scanner offline",
            "<p>The scanner at <b>dock 3</b> is offline.</p><p>Since Monday.</p>",
        );
        report.priority = Some("high".to_string());

        let payload = RelayPayload::from_report(&report, Some("support@example.org"));

        assert_eq!(payload.name, "Ana Ruiz");
        assert_eq!(payload.email, "ana@example.org");
        assert_eq!(payload.kind, "issue_report");
        assert_eq!(payload.to.as_deref(), Some("support@example.org"));
        assert_eq!(
            payload.message,
            "Issue report from Ana Ruiz <ana@example.org>\n\
             Organization: Not provided\n\
             Category: general\n\
             Priority: high\n\
             Type: bug\n\
             \n\
             Description:\n\
             The scanner at dock 3 is offline.\n\nSince Monday."
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "issue_report");
        assert!(json.get("organization").is_none());
    }

    #[test]
    fn test_report_recipient_wins() {
        let mut report = IssueReport::new("a", "a@b.co", "s", "d");
        report.to = Some("it@example.org".to_string());

        let payload = RelayPayload::from_report(&report, Some("support@example.org"));
        assert_eq!(payload.to.as_deref(), Some("it@example.org"));
    }
}
