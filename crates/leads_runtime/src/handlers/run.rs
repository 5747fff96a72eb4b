use leads_core::adapters::{LeadDelivery, LeadSource};
use leads_core::{ConfigError, DistributionReport, DistributorConfig, LeadDistributor};
use serde::Serialize;

use crate::adapters::mailbox::Mailbox;
use crate::adapters::row_store::RowStore;
use crate::handlers::email_intake::{run_email_intake, IntakeReport};
use crate::handlers::sheet_sources::{AdsSheetSource, PrimarySheetSource};
use crate::handlers::status_writer::SheetStatusWriter;

pub struct DistributionSetup<'a> {
    pub config: DistributorConfig,
    pub delivery: &'a dyn LeadDelivery,
}

/// Everything one invocation needs. Steps without their collaborators are skipped.
pub struct RunContext<'a> {
    pub primary: &'a dyn RowStore,
    pub ads: &'a dyn RowStore,
    pub ads_phone_country_prefix: &'a str,
    pub mailbox: Option<&'a dyn Mailbox>,
    pub distribution: Option<DistributionSetup<'a>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake: Option<IntakeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionReport>,
}

pub fn distribute_once(
    config: DistributorConfig,
    primary: &dyn RowStore,
    ads: &dyn RowStore,
    delivery: &dyn LeadDelivery,
    ads_phone_country_prefix: &str,
) -> Result<DistributionReport, ConfigError> {
    let primary_source = PrimarySheetSource::new(primary);
    let ads_source = AdsSheetSource::with_country_prefix(ads, ads_phone_country_prefix);
    let status_writer = SheetStatusWriter::new(primary, ads);

    let sources: Vec<&dyn LeadSource> = vec![&primary_source as &dyn LeadSource, &ads_source];
    let mut distributor = LeadDistributor::new(
        config,
        sources,
        delivery,
        &status_writer,
    )?;
    Ok(distributor.distribute())
}

/// Email intake first, so freshly imported leads join this run's batch.
///
/// The distributor config is validated before anything is touched, so an
/// invalid config leaves the inbox and sheets as they were. Intake failures
/// are logged and do not block distribution.
pub fn run_once(context: RunContext<'_>) -> Result<RunSummary, ConfigError> {
    let distribution = match context.distribution {
        Some(setup) => Some((setup.config.validate()?, setup.delivery)),
        None => None,
    };
    let mut summary = RunSummary::default();

    if let Some(mailbox) = context.mailbox {
        match run_email_intake(mailbox, context.primary) {
            Ok(report) => {
                tracing::info!(
                    imported = report.imported,
                    skipped = report.skipped,
                    failed = report.failed,
                    "email intake complete"
                );
                summary.intake = Some(report);
            }
            Err(error) => tracing::error!(%error, "email intake failed"),
        }
    }

    if let Some((config, delivery)) = distribution {
        summary.distribution = Some(distribute_once(
            config,
            context.primary,
            context.ads,
            delivery,
            context.ads_phone_country_prefix,
        )?);
    }

    Ok(summary)
}
