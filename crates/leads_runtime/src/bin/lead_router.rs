use std::process::ExitCode;

use clap::Parser;
use leads_runtime::adapters::crm::CrmApiClient;
use leads_runtime::adapters::mailbox::{Mailbox, MaildirInbox};
use leads_runtime::config::{Cli, Command, RuntimeConfigError};
use leads_runtime::handlers::run::{run_once, DistributionSetup, RunContext, RunSummary};
use leads_runtime::telemetry;

fn execute(cli: &Cli) -> Result<RunSummary, RuntimeConfigError> {
    let runtime = &cli.runtime;

    let distribution = if cli.command.runs_distribution() {
        let config = runtime.distributor_config()?;
        let crm = CrmApiClient::new(runtime.crm_config()?)?;
        Some((config, crm))
    } else {
        None
    };

    let mailbox = match (&runtime.inbox_maildir, cli.command) {
        (Some(dir), command) if command.runs_intake() => Some(MaildirInbox::new(dir)),
        (None, Command::Intake) => return Err(RuntimeConfigError::Missing("INBOX_MAILDIR")),
        (None, Command::Run) => {
            tracing::info!("no inbox configured; skipping email intake");
            None
        }
        _ => None,
    };

    let stores = runtime.open_stores()?;
    let context = RunContext {
        primary: stores.primary.as_ref(),
        ads: stores.ads.as_ref(),
        ads_phone_country_prefix: &runtime.ads_phone_country_prefix,
        mailbox: mailbox.as_ref().map(|inbox| inbox as &dyn Mailbox),
        distribution: distribution.as_ref().map(|(config, crm)| DistributionSetup {
            config: config.clone(),
            delivery: crm,
        }),
    };
    Ok(run_once(context)?)
}

fn main() -> ExitCode {
    telemetry::init();
    let cli = Cli::parse();

    let summary = match execute(&cli) {
        Ok(summary) => summary,
        Err(error) => {
            tracing::error!(%error, "lead_router failed to start");
            return ExitCode::FAILURE;
        }
    };

    if cli.runtime.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(error) => tracing::error!(%error, "failed to serialize run summary"),
        }
    }
    ExitCode::SUCCESS
}
