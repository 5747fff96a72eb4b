//! The distribution control loop.
//!
//! One call to [`LeadDistributor::distribute`] pulls every eligible lead from
//! the configured sources, shuffles them, splits them between the two teams,
//! and delivers each one sequentially. Leads whose delivery fails are left
//! untouched so the next run picks them up again.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::adapters::{LeadDelivery, LeadSource, StatusSink};
use crate::config::{ConfigError, DistributorConfig};
use crate::lead::{Lead, TIMESTAMP_FORMAT};
use crate::split::SplitPlan;

/// Per-team tally for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamOutcome {
    pub team: String,
    pub assigned: usize,
    pub sent: usize,
    pub failed: usize,
    /// Delivered leads whose status could not be written back. These will be
    /// delivered again on the next run.
    pub status_write_failures: usize,
}

impl TeamOutcome {
    fn new(team: &str, assigned: usize) -> Self {
        Self {
            team: team.to_string(),
            assigned,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionReport {
    /// Leads that entered the split.
    pub candidates: usize,
    /// Leads dropped because they had no row to write status back to.
    pub skipped_without_locator: usize,
    /// Sources that could not be read this run.
    pub failed_sources: Vec<String>,
    pub team_a: TeamOutcome,
    pub team_b: TeamOutcome,
}

impl DistributionReport {
    /// Whether any delivery was attempted. This does not mean every send succeeded.
    pub fn work_attempted(&self) -> bool {
        self.candidates > 0
    }

    pub fn total_sent(&self) -> usize {
        self.team_a.sent + self.team_b.sent
    }
}

pub struct LeadDistributor<'a> {
    config: DistributorConfig,
    sources: Vec<&'a dyn LeadSource>,
    delivery: &'a dyn LeadDelivery,
    status_sink: &'a dyn StatusSink,
    rng: StdRng,
}

impl<'a> LeadDistributor<'a> {
    pub fn new(
        config: DistributorConfig,
        sources: Vec<&'a dyn LeadSource>,
        delivery: &'a dyn LeadDelivery,
        status_sink: &'a dyn StatusSink,
    ) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            sources,
            delivery,
            status_sink,
            rng,
        })
    }

    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    pub fn distribute(&mut self) -> DistributionReport {
        tracing::info!("checking for new leads to distribute");

        let mut report = DistributionReport {
            team_a: TeamOutcome::new(&self.config.team_a, 0),
            team_b: TeamOutcome::new(&self.config.team_b, 0),
            ..DistributionReport::default()
        };

        let mut leads = self.gather_candidates(&mut report);
        if leads.is_empty() {
            tracing::info!("no new leads to distribute; nothing to do");
            return report;
        }

        report.candidates = leads.len();
        tracing::info!(count = leads.len(), "found new leads, starting distribution");

        leads.shuffle(&mut self.rng);
        let plan = SplitPlan::compute(leads.len(), self.config.split_ratio);
        let team_b_leads = leads.split_off(plan.team_b.start);
        let team_a_leads = leads;

        report.team_a = self.send_to_team(team_a_leads, &self.config.team_a);
        report.team_b = self.send_to_team(team_b_leads, &self.config.team_b);

        tracing::info!(
            team_a = %report.team_a.team,
            sent_a = report.team_a.sent,
            team_b = %report.team_b.team,
            sent_b = report.team_b.sent,
            "distribution complete"
        );
        report
    }

    fn gather_candidates(&self, report: &mut DistributionReport) -> Vec<Lead> {
        let mut candidates = Vec::new();

        for source in &self.sources {
            let leads = match source.list_eligible_leads() {
                Ok(leads) => leads,
                Err(error) => {
                    tracing::error!(source = source.name(), %error, "failed to fetch leads");
                    report.failed_sources.push(source.name().to_string());
                    continue;
                }
            };

            for lead in leads {
                if lead.row_number.is_none() {
                    tracing::warn!(
                        source = source.name(),
                        lead = %lead.summary(),
                        "lead has no row locator; skipping"
                    );
                    report.skipped_without_locator += 1;
                    continue;
                }
                candidates.push(lead);
            }
        }

        candidates
    }

    fn send_to_team(&self, leads: Vec<Lead>, team: &str) -> TeamOutcome {
        let mut outcome = TeamOutcome::new(team, leads.len());
        if leads.is_empty() {
            return outcome;
        }

        tracing::info!(team, count = leads.len(), "processing leads for team");

        for mut lead in leads {
            if !self.delivery.deliver(&lead, team) {
                tracing::warn!(
                    team,
                    lead = %lead.summary(),
                    "failed to send lead; it will be retried on the next run"
                );
                outcome.failed += 1;
                continue;
            }

            let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
            lead.mark_sent(team, timestamp);
            outcome.sent += 1;

            if !self.status_sink.record_status(&lead) {
                tracing::warn!(
                    team,
                    lead = %lead.summary(),
                    row = lead.row_number,
                    sheet = lead.origin().as_str(),
                    "lead delivered but status was not recorded; it will be delivered again next run"
                );
                outcome.status_write_failures += 1;
            }
        }

        outcome
    }
}
