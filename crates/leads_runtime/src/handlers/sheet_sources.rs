//! Lead sources backed by the primary and ads sheets.

use leads_core::adapters::LeadSource;
use leads_core::lead::{DEFAULT_SOURCE, NEW_STATUS};
use leads_core::phone::{normalize_ads_phone, DEFAULT_COUNTRY_PREFIX};
use leads_core::{Lead, OriginSheet};

use crate::adapters::row_store::{RowStore, SheetRows, StoreError, STATUS_COLUMN};

pub const ADS_SOURCE: &str = "ads_import";
const UNKNOWN_NAME: &str = "Unknown";

fn load_with_status(store: &dyn RowStore) -> Result<SheetRows, StoreError> {
    let sheet = store.read_rows()?;
    if sheet.column_index(STATUS_COLUMN).is_none() {
        return Err(StoreError::MissingColumn {
            sheet: store.title().to_string(),
            column: STATUS_COLUMN.to_string(),
        });
    }
    Ok(sheet)
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Form submissions and email imports; eligible when `Status` reads `new`.
pub struct PrimarySheetSource<'a> {
    store: &'a dyn RowStore,
}

impl<'a> PrimarySheetSource<'a> {
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self { store }
    }
}

impl LeadSource for PrimarySheetSource<'_> {
    fn name(&self) -> &str {
        self.store.title()
    }

    fn list_eligible_leads(&self) -> Result<Vec<Lead>, String> {
        let sheet = load_with_status(self.store).map_err(|error| error.to_string())?;

        let mut leads = Vec::new();
        for record in sheet.records() {
            if record.is_blank() {
                tracing::debug!(sheet = self.name(), row = record.row_number, "skipping blank row");
                continue;
            }
            if !record
                .get(STATUS_COLUMN)
                .trim()
                .eq_ignore_ascii_case(NEW_STATUS)
            {
                continue;
            }

            let source = record.non_blank("Source").unwrap_or(DEFAULT_SOURCE);
            let lead = Lead::new(
                record.get("Name"),
                record.get("Email"),
                record.get("Phone"),
                record.get("Unit"),
            )
            .with_source(source)
            .with_notes(record.get("Notes"))
            .located_at(OriginSheet::Primary, record.row_number);
            leads.push(lead);
        }

        if !leads.is_empty() {
            tracing::info!(sheet = self.name(), count = leads.len(), "found new leads");
        }
        Ok(leads)
    }
}

/// Ad-platform exports; eligible while `Status` is still blank.
pub struct AdsSheetSource<'a> {
    store: &'a dyn RowStore,
    country_prefix: String,
}

impl<'a> AdsSheetSource<'a> {
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self::with_country_prefix(store, DEFAULT_COUNTRY_PREFIX)
    }

    pub fn with_country_prefix(store: &'a dyn RowStore, country_prefix: impl Into<String>) -> Self {
        Self {
            store,
            country_prefix: country_prefix.into(),
        }
    }
}

impl LeadSource for AdsSheetSource<'_> {
    fn name(&self) -> &str {
        self.store.title()
    }

    fn list_eligible_leads(&self) -> Result<Vec<Lead>, String> {
        let sheet = load_with_status(self.store).map_err(|error| error.to_string())?;

        let mut leads = Vec::new();
        for record in sheet.records() {
            if record.is_blank() {
                tracing::debug!(sheet = self.name(), row = record.row_number, "skipping blank row");
                continue;
            }
            if record.non_blank(STATUS_COLUMN).is_some() {
                continue;
            }

            let question1 = record.get("Question 1").trim();
            let lead = Lead::new(
                record.non_blank("Full Name").unwrap_or(UNKNOWN_NAME),
                record.get("Email"),
                normalize_ads_phone(record.get("Phone"), &self.country_prefix),
                question1,
            )
            .with_source(ADS_SOURCE)
            .with_questions(optional(question1), optional(record.get("Question 2")))
            .located_at(OriginSheet::Ads, record.row_number);
            leads.push(lead);
        }

        if !leads.is_empty() {
            tracing::info!(sheet = self.name(), count = leads.len(), "found new leads from ads sheet");
        }
        Ok(leads)
    }
}
