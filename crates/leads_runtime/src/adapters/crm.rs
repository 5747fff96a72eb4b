use std::time::Duration;

use leads_core::adapters::LeadDelivery;
use leads_core::Lead;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CrmConfig {
    pub api_url: String,
    pub api_token: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadAttributes {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub source: String,
    pub description: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadData {
    pub attributes: LeadAttributes,
}

/// JSON envelope posted to the CRM: `{"data": {"attributes": {...}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadPayload {
    pub data: LeadData,
}

impl LeadPayload {
    pub fn build(lead: &Lead, team: &str) -> Self {
        Self {
            data: LeadData {
                attributes: LeadAttributes {
                    name: lead.name.clone(),
                    email: lead.email.clone(),
                    phone: lead.phone.clone(),
                    source: format!("Lead Manager - {}", lead.source),
                    description: format!("[{team}] - New lead registered"),
                    body: compose_body(lead),
                },
            },
        }
    }
}

/// Free-text body: unit of interest, custom questions, then original notes.
pub fn compose_body(lead: &Lead) -> String {
    let mut parts = Vec::new();
    if !lead.unit.is_empty() {
        parts.push(format!("Unit of Interest: {}", lead.unit));
    }
    if let Some(question) = lead.question1.as_deref().filter(|q| !q.is_empty()) {
        parts.push(format!("Question 1: {question}"));
    }
    if let Some(question) = lead.question2.as_deref().filter(|q| !q.is_empty()) {
        parts.push(format!("Question 2: {question}"));
    }
    if !lead.notes.is_empty() {
        parts.push(format!("\nOriginal Notes: {}", lead.notes));
    }
    parts.join("\n")
}

/// Blocking HTTP client that posts leads to the CRM.
#[derive(Debug, Clone)]
pub struct CrmApiClient {
    client: Client,
    config: CrmConfig,
}

impl CrmApiClient {
    pub fn new(config: CrmConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

impl LeadDelivery for CrmApiClient {
    fn deliver(&self, lead: &Lead, team: &str) -> bool {
        let payload = LeadPayload::build(lead, team);
        let result = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send();

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(lead = %lead.name, team, %error, "error sending lead to CRM");
                return false;
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::info!(lead = %lead.name, team, "sent lead to CRM");
            return true;
        }

        let body = response.text().unwrap_or_default();
        tracing::error!(
            lead = %lead.name,
            team,
            status = status.as_u16(),
            body = %body,
            "CRM rejected lead"
        );
        false
    }
}
