//! Email intake: parse unseen inbox messages into leads and append them to
//! the primary sheet with status `new`.
//!
//! A message is marked seen only once its row has been appended, so an
//! append failure leaves it in place for the next run. Messages that carry
//! no contact details are marked seen and skipped.

use leads_core::lead::{DEFAULT_SOURCE, NEW_STATUS, TIMESTAMP_FORMAT};
use leads_core::phone::clean_contact_phone;
use leads_core::Lead;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::adapters::mailbox::{InboxMessage, Mailbox, MailboxError};
use crate::adapters::row_store::{RowStore, StoreError, STATUS_COLUMN};

const UNKNOWN_NAME: &str = "Unknown";
const NO_SUBJECT: &str = "No Subject";

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(?:Name|Nome):\s*(.*?)(?:\n|$)").expect("name regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)Email:\s*([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})")
        .expect("email regex")
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:Phone|Telefone|Whatsapp):\s*([+\d\s().-]+?)(?:\n|$)").expect("phone regex")
});
static UNIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(?:Unit|Unidade):\s*(.*?)(?:\n|$)").expect("unit regex"));

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("inbox unavailable: {0}")]
    Mailbox(#[from] MailboxError),
    #[error("primary sheet unavailable: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntakeReport {
    pub messages: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Contact fields found in a message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub unit: Option<String>,
}

fn capture(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().trim().to_string())
}

pub fn parse_body(body: &str) -> ContactFields {
    let body = body.replace("\r\n", "\n");
    ContactFields {
        name: capture(&NAME_RE, &body),
        email: capture(&EMAIL_RE, &body),
        phone: capture(&PHONE_RE, &body).map(|raw| clean_contact_phone(&raw)),
        unit: capture(&UNIT_RE, &body),
    }
}

/// Build a lead from a message, or `None` when it has neither email nor phone.
pub fn lead_from_message(message: &InboxMessage) -> Option<Lead> {
    if message.body.trim().is_empty() {
        return None;
    }
    let fields = parse_body(&message.body);
    let has_contact = [&fields.email, &fields.phone]
        .iter()
        .any(|value| value.as_deref().is_some_and(|v| !v.is_empty()));
    if !has_contact {
        return None;
    }

    let subject = match message.subject.trim() {
        "" => NO_SUBJECT,
        subject => subject,
    };
    let name = fields
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    Some(
        Lead::new(
            name,
            fields.email.unwrap_or_default(),
            fields.phone.unwrap_or_default(),
            fields.unit.unwrap_or_default(),
        )
        .with_source(DEFAULT_SOURCE)
        .with_notes(format!("Imported from email. Subject: {subject}")),
    )
}

/// Lay out `lead` under the primary sheet's header. Unknown columns stay blank.
///
/// Header names match after trimming and are case-sensitive, the same way
/// the sheet sources look them up.
pub fn primary_row(header: &[String], lead: &Lead, imported_at: &str) -> Vec<String> {
    header
        .iter()
        .map(|column| {
            let value: &str = match column.trim() {
                "Date" | "Timestamp" | "Received" => imported_at,
                "Name" => &lead.name,
                "Email" => &lead.email,
                "Phone" => &lead.phone,
                "Unit" => &lead.unit,
                "Source" => &lead.source,
                "Notes" => &lead.notes,
                STATUS_COLUMN => NEW_STATUS,
                _ => "",
            };
            value.to_string()
        })
        .collect()
}

pub fn run_email_intake(
    mailbox: &dyn Mailbox,
    primary: &dyn RowStore,
) -> Result<IntakeReport, IntakeError> {
    let messages = mailbox.unseen()?;
    let mut report = IntakeReport {
        messages: messages.len(),
        ..IntakeReport::default()
    };
    if messages.is_empty() {
        tracing::info!("no unread emails");
        return Ok(report);
    }
    tracing::info!(count = messages.len(), "found unread emails");

    let sheet = primary.read_rows()?;
    // Imported rows need a Status cell to become eligible for distribution.
    if sheet.column_index(STATUS_COLUMN).is_none() {
        return Err(StoreError::MissingColumn {
            sheet: primary.title().to_string(),
            column: STATUS_COLUMN.to_string(),
        }
        .into());
    }
    let header = sheet.header().to_vec();

    for message in &messages {
        let Some(lead) = lead_from_message(message) else {
            tracing::info!(id = %message.id, subject = %message.subject, "no contact details in email; skipping");
            report.skipped += 1;
            mark_seen(mailbox, message);
            continue;
        };

        let imported_at = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let row = primary_row(&header, &lead, &imported_at);
        if let Err(error) = primary.append_row(&row) {
            tracing::error!(
                id = %message.id,
                sheet = primary.title(),
                %error,
                "failed to add lead to sheet; email left unread"
            );
            report.failed += 1;
            continue;
        }

        tracing::info!(sheet = primary.title(), lead = %lead.summary(), "added lead from email");
        report.imported += 1;
        mark_seen(mailbox, message);
    }

    Ok(report)
}

fn mark_seen(mailbox: &dyn Mailbox, message: &InboxMessage) {
    if let Err(error) = mailbox.mark_seen(&message.id) {
        tracing::warn!(id = %message.id, %error, "could not mark email as read; it will be read again");
    }
}
