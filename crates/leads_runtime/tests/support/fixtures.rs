#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use leads_runtime::adapters::csv_store::CsvSheetStore;
use leads_runtime::adapters::mailbox::MaildirInbox;
use leads_runtime::adapters::row_store::RowStore;
use tempfile::TempDir;

pub const PRIMARY_HEADER: &str = "Date,Name,Email,Phone,Unit,Source,Notes,Status";
pub const ADS_HEADER: &str = "Full Name,Email,Phone,Question 1,Question 2,Status";

/// A temp directory holding `leads.csv`, `meta_leads.csv` and a Maildir.
pub struct LeadWorkspace {
    dir: TempDir,
    pub primary: CsvSheetStore,
    pub ads: CsvSheetStore,
    pub inbox: MaildirInbox,
}

impl LeadWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let primary = CsvSheetStore::in_dir(dir.path(), "leads");
        let ads = CsvSheetStore::in_dir(dir.path(), "meta_leads");
        let maildir = dir.path().join("inbox");
        for sub in ["new", "cur", "tmp"] {
            fs::create_dir_all(maildir.join(sub)).expect("maildir folder");
        }
        Self {
            inbox: MaildirInbox::new(maildir),
            dir,
            primary,
            ads,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_primary(&self, rows: &[&str]) {
        write_sheet(self.primary.path(), PRIMARY_HEADER, rows);
    }

    pub fn write_ads(&self, rows: &[&str]) {
        write_sheet(self.ads.path(), ADS_HEADER, rows);
    }

    pub fn deliver_email(&self, name: &str, subject: &str, body: &str) -> PathBuf {
        let path = self.inbox.root().join("new").join(name);
        let raw = format!("From: forms@example.com\nSubject: {subject}\n\n{body}");
        fs::write(&path, raw).expect("message written");
        path
    }

    pub fn unread_count(&self) -> usize {
        fs::read_dir(self.inbox.root().join("new"))
            .expect("new folder")
            .count()
    }
}

fn write_sheet(path: &Path, header: &str, rows: &[&str]) {
    let mut body = format!("{header}\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(path, body).expect("sheet written");
}

/// `(Name column value, Status column value)` for every data row.
pub fn statuses(store: &dyn RowStore, name_column: &str) -> Vec<(String, String)> {
    let sheet = store.read_rows().expect("sheet readable");
    sheet
        .records()
        .map(|record| {
            (
                record.get(name_column).to_string(),
                record.get("Status").to_string(),
            )
        })
        .collect()
}

/// `Sent to {team} via API (YYYY-MM-DD HH:MM:SS)`.
pub fn is_sent_status(value: &str, team: &str) -> bool {
    let prefix = format!("Sent to {team} via API (");
    value.starts_with(&prefix)
        && value.ends_with(')')
        && value.len() == prefix.len() + "2026-02-14 09:30:00".len() + 1
}
