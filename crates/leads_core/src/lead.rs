use serde::{Deserialize, Serialize};

/// Status carried by a lead that has not been distributed yet.
pub const NEW_STATUS: &str = "new";
/// Source label used when a lead arrives without one.
pub const DEFAULT_SOURCE: &str = "email_import";
/// Format used for distribution timestamps and status write-back.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which backing sheet a lead row lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginSheet {
    /// Form submissions and email imports.
    #[default]
    Primary,
    /// Ad-platform lead exports.
    Ads,
}

impl OriginSheet {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Ads => "ads",
        }
    }
}

/// A prospective customer gathered from a sheet row or an email.
///
/// Identity fields are passed through as-is; nothing here validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question2: Option<String>,
    pub source: String,
    #[serde(default)]
    pub notes: String,
    pub status: String,
    /// 1-based sheet row; `None` until the lead has been persisted.
    #[serde(default)]
    pub row_number: Option<usize>,
    /// Fixed once the lead is located; see [`Lead::located_at`].
    #[serde(default)]
    origin: OriginSheet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributed_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_time: Option<String>,
}

impl Lead {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            unit: unit.into(),
            question1: None,
            question2: None,
            source: DEFAULT_SOURCE.to_string(),
            notes: String::new(),
            status: NEW_STATUS.to_string(),
            row_number: None,
            origin: OriginSheet::Primary,
            distributed_to: None,
            distribution_time: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_questions(mut self, question1: Option<String>, question2: Option<String>) -> Self {
        self.question1 = question1;
        self.question2 = question2;
        self
    }

    /// Attach the sheet row this lead was read from.
    pub fn located_at(mut self, origin: OriginSheet, row_number: usize) -> Self {
        self.origin = origin;
        self.row_number = Some(row_number);
        self
    }

    /// Sheet the lead was read from. Email imports report `Primary`.
    pub fn origin(&self) -> OriginSheet {
        self.origin
    }

    /// Short, log-friendly description.
    pub fn summary(&self) -> String {
        format!(
            "Lead(Name: {}, Phone: {}, Source: {})",
            self.name, self.phone, self.source
        )
    }

    pub fn is_new(&self) -> bool {
        self.status == NEW_STATUS
    }

    /// Record a successful delivery to `team` at `timestamp`.
    pub fn mark_sent(&mut self, team: &str, timestamp: String) {
        self.status = sent_status(team);
        self.distributed_to = Some(team.to_string());
        self.distribution_time = Some(timestamp);
    }
}

/// Terminal status written back after a successful CRM delivery.
pub fn sent_status(team: &str) -> String {
    format!("Sent to {team} via API")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lead_starts_eligible_without_locator() {
        let lead = Lead::new("Ana", "ana@example.com", "11999998888", "Unit 12");
        assert!(lead.is_new());
        assert_eq!(lead.source, DEFAULT_SOURCE);
        assert_eq!(lead.row_number, None);
        assert_eq!(lead.origin(), OriginSheet::Primary);
    }

    #[test]
    fn summary_names_phone_and_source() {
        let lead = Lead::new("Ana", "", "11999998888", "").with_source("ads_import");
        assert_eq!(
            lead.summary(),
            "Lead(Name: Ana, Phone: 11999998888, Source: ads_import)"
        );
    }

    #[test]
    fn mark_sent_records_team_and_time() {
        let mut lead = Lead::new("Ana", "", "", "").located_at(OriginSheet::Ads, 7);
        lead.mark_sent("North", "2026-02-14 09:30:00".to_string());

        assert_eq!(lead.status, "Sent to North via API");
        assert_eq!(lead.distributed_to.as_deref(), Some("North"));
        assert_eq!(lead.distribution_time.as_deref(), Some("2026-02-14 09:30:00"));
        assert_eq!(lead.origin(), OriginSheet::Ads);
        assert!(!lead.is_new());
    }

    #[test]
    fn garbage_fields_pass_through_untouched() {
        let lead = Lead::new("", "not-an-email", "<script>", "   ");
        assert_eq!(lead.email, "not-an-email");
        assert_eq!(lead.phone, "<script>");
        assert_eq!(lead.unit, "   ");
    }

    #[test]
    fn json_shape_keeps_origin_and_drops_unset_options() {
        let lead = Lead::new("Ana", "ana@example.com", "1199", "12").located_at(OriginSheet::Ads, 4);

        let value = serde_json::to_value(&lead).expect("lead serializes");

        assert_eq!(value["origin"], "ads");
        assert_eq!(value["row_number"], 4);
        assert_eq!(value["status"], "new");
        assert!(value.get("question1").is_none());
        assert!(value.get("distributed_to").is_none());

        let back: Lead = serde_json::from_value(value).expect("lead deserializes");
        assert_eq!(back.origin(), OriginSheet::Ads);
        assert_eq!(back, lead);
    }

    #[test]
    fn missing_origin_defaults_to_primary() {
        let lead: Lead = serde_json::from_str(
            r#"{"name":"Ana","email":"","phone":"","unit":"","source":"site","status":"new"}"#,
        )
        .expect("lead deserializes");
        assert_eq!(lead.origin(), OriginSheet::Primary);
        assert_eq!(lead.row_number, None);
    }
}
