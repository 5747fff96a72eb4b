use std::cell::RefCell;
use std::collections::HashMap;

use leads_core::adapters::StatusSink;
use leads_core::lead::TIMESTAMP_FORMAT;
use leads_core::{Lead, OriginSheet};

use crate::adapters::row_store::{RowStore, StoreError, STATUS_COLUMN};

/// Writes `"{status} ({timestamp})"` into the Status cell of the lead's row.
pub struct SheetStatusWriter<'a> {
    primary: &'a dyn RowStore,
    ads: &'a dyn RowStore,
    status_columns: RefCell<HashMap<OriginSheet, usize>>,
}

impl<'a> SheetStatusWriter<'a> {
    pub fn new(primary: &'a dyn RowStore, ads: &'a dyn RowStore) -> Self {
        Self {
            primary,
            ads,
            status_columns: RefCell::new(HashMap::new()),
        }
    }

    fn store_for(&self, origin: OriginSheet) -> &'a dyn RowStore {
        match origin {
            OriginSheet::Primary => self.primary,
            OriginSheet::Ads => self.ads,
        }
    }

    fn status_column(&self, origin: OriginSheet) -> Result<usize, StoreError> {
        if let Some(column) = self.status_columns.borrow().get(&origin) {
            return Ok(*column);
        }
        let store = self.store_for(origin);
        let column = store
            .read_rows()?
            .column_index(STATUS_COLUMN)
            .ok_or_else(|| StoreError::MissingColumn {
                sheet: store.title().to_string(),
                column: STATUS_COLUMN.to_string(),
            })?;
        self.status_columns.borrow_mut().insert(origin, column);
        Ok(column)
    }
}

pub fn status_cell_value(lead: &Lead) -> String {
    let timestamp = lead
        .distribution_time
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format(TIMESTAMP_FORMAT).to_string());
    format!("{} ({timestamp})", lead.status)
}

impl StatusSink for SheetStatusWriter<'_> {
    fn record_status(&self, lead: &Lead) -> bool {
        let Some(row) = lead.row_number else {
            tracing::error!(lead = %lead.summary(), "cannot record status without a row number");
            return false;
        };
        let store = self.store_for(lead.origin());

        let result = self
            .status_column(lead.origin())
            .and_then(|column| store.update_cell(row, column, &status_cell_value(lead)));
        match result {
            Ok(()) => {
                tracing::info!(
                    row,
                    sheet = store.title(),
                    status = %lead.status,
                    "updated lead status"
                );
                true
            }
            Err(error) => {
                tracing::error!(row, sheet = store.title(), %error, "failed to update lead status");
                false
            }
        }
    }
}
