//! Command line and environment configuration for `lead_router`.
//!
//! Every setting can come from a flag or its environment variable. Required
//! values are checked per command, so `intake` runs without CRM or team
//! settings.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use leads_core::config::DEFAULT_SPLIT_RATIO;
use leads_core::phone::DEFAULT_COUNTRY_PREFIX;
use leads_core::{ConfigError, DistributorConfig};
use thiserror::Error;

use crate::adapters::crm::CrmConfig;
use crate::adapters::csv_store::CsvSheetStore;
use crate::adapters::row_store::{RowStore, StoreError};
use crate::adapters::sheets_api::{SheetsApiConfig, SheetsApiStore, DEFAULT_SHEETS_API_BASE};

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
    #[error(transparent)]
    Distributor(#[from] ConfigError),
    #[error("failed to open sheet store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "lead_router",
    about = "Import leads from email and distribute new leads between two sales teams"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[command(flatten)]
    pub runtime: RuntimeArgs,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Import unread emails (when an inbox is configured), then distribute
    Run,
    /// Import unread emails into the primary sheet
    Intake,
    /// Distribute new leads to the CRM
    Distribute,
}

impl Command {
    pub fn runs_intake(self) -> bool {
        matches!(self, Self::Run | Self::Intake)
    }

    pub fn runs_distribution(self) -> bool {
        matches!(self, Self::Run | Self::Distribute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Google Sheets values API
    Sheets,
    /// One CSV file per sheet in a local directory
    Csv,
}

#[derive(Args, Debug, Clone)]
pub struct RuntimeArgs {
    #[arg(long, env = "TEAM_A_NAME", global = true)]
    pub team_a: Option<String>,
    #[arg(long, env = "TEAM_B_NAME", global = true)]
    pub team_b: Option<String>,
    /// Share of each batch sent to team A, in [0, 1]
    #[arg(long, env = "DISTRIBUTION_PERCENTAGE_A", default_value_t = DEFAULT_SPLIT_RATIO, global = true)]
    pub split_ratio: f64,
    /// Fixed shuffle seed for reproducible splits
    #[arg(long, env = "LEAD_ROUTER_SEED", global = true)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, env = "LEADS_STORE_BACKEND", default_value_t = StoreBackend::Sheets, global = true)]
    pub backend: StoreBackend,
    #[arg(long, env = "SPREADSHEET_ID", global = true)]
    pub spreadsheet_id: Option<String>,
    #[arg(long, env = "SHEETS_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub sheets_access_token: Option<String>,
    #[arg(long, env = "SHEETS_API_BASE", default_value = DEFAULT_SHEETS_API_BASE, global = true)]
    pub sheets_api_base: String,
    #[arg(long, env = "LEADS_CSV_DIR", global = true)]
    pub csv_dir: Option<PathBuf>,
    #[arg(long, env = "PRIMARY_SHEET_NAME", default_value = "leads", global = true)]
    pub primary_sheet: String,
    #[arg(long, env = "ADS_SHEET_NAME", default_value = "meta_leads", global = true)]
    pub ads_sheet: String,
    #[arg(long, env = "ADS_PHONE_COUNTRY_PREFIX", default_value = DEFAULT_COUNTRY_PREFIX, global = true)]
    pub ads_phone_country_prefix: String,

    #[arg(long, env = "CRM_API_URL", global = true)]
    pub crm_api_url: Option<String>,
    #[arg(long, env = "CRM_API_TOKEN_SECRET", hide_env_values = true, global = true)]
    pub crm_api_token: Option<String>,
    #[arg(long, env = "CRM_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub crm_timeout_secs: u64,

    /// Maildir root holding unread lead emails
    #[arg(long, env = "INBOX_MAILDIR", global = true)]
    pub inbox_maildir: Option<PathBuf>,

    /// Print reports as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

fn required(value: &Option<String>, key: &'static str) -> Result<String, RuntimeConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(RuntimeConfigError::Missing(key))
}

/// The primary and ads sheets opened on the configured backend.
pub struct SheetStores {
    pub primary: Box<dyn RowStore>,
    pub ads: Box<dyn RowStore>,
}

impl RuntimeArgs {
    pub fn distributor_config(&self) -> Result<DistributorConfig, RuntimeConfigError> {
        let mut config = DistributorConfig::new(
            required(&self.team_a, "TEAM_A_NAME")?,
            required(&self.team_b, "TEAM_B_NAME")?,
            self.split_ratio,
        );
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config.validate()?)
    }

    pub fn crm_config(&self) -> Result<CrmConfig, RuntimeConfigError> {
        if self.crm_timeout_secs == 0 {
            return Err(RuntimeConfigError::Invalid {
                key: "CRM_TIMEOUT_SECS",
                message: "must be at least 1 second".to_string(),
            });
        }
        Ok(CrmConfig {
            api_url: required(&self.crm_api_url, "CRM_API_URL")?,
            api_token: required(&self.crm_api_token, "CRM_API_TOKEN_SECRET")?,
            timeout: Duration::from_secs(self.crm_timeout_secs),
        })
    }

    pub fn sheets_api_config(&self) -> Result<SheetsApiConfig, RuntimeConfigError> {
        Ok(SheetsApiConfig {
            api_base: self.sheets_api_base.clone(),
            spreadsheet_id: required(&self.spreadsheet_id, "SPREADSHEET_ID")?,
            access_token: required(&self.sheets_access_token, "SHEETS_ACCESS_TOKEN")?,
        })
    }

    pub fn open_stores(&self) -> Result<SheetStores, RuntimeConfigError> {
        match self.backend {
            StoreBackend::Sheets => {
                let api = self.sheets_api_config()?;
                Ok(SheetStores {
                    primary: Box::new(SheetsApiStore::new(api.clone(), &self.primary_sheet)?),
                    ads: Box::new(SheetsApiStore::new(api, &self.ads_sheet)?),
                })
            }
            StoreBackend::Csv => {
                let dir = self
                    .csv_dir
                    .as_deref()
                    .ok_or(RuntimeConfigError::Missing("LEADS_CSV_DIR"))?;
                if !dir.is_dir() {
                    return Err(RuntimeConfigError::Invalid {
                        key: "LEADS_CSV_DIR",
                        message: format!("{} is not a directory", dir.display()),
                    });
                }
                Ok(SheetStores {
                    primary: Box::new(CsvSheetStore::in_dir(dir, &self.primary_sheet)),
                    ads: Box::new(CsvSheetStore::in_dir(dir, &self.ads_sheet)),
                })
            }
        }
    }
}
