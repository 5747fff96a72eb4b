#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;

use leads_core::adapters::{LeadDelivery, LeadSource, StatusSink};
use leads_core::{Lead, OriginSheet};

/// Build `count` leads located in `origin`, named `{prefix}-{i}`.
pub fn located_leads(prefix: &str, origin: OriginSheet, count: usize) -> Vec<Lead> {
    (0..count)
        .map(|i| {
            Lead::new(
                format!("{prefix}-{i}"),
                format!("{prefix}{i}@example.com"),
                format!("1199999{i:04}"),
                "Unit 1",
            )
            .located_at(origin, i + 2)
        })
        .collect()
}

/// Source returning a fixed batch, or an error when `unreachable` is set.
pub struct StaticSource {
    pub name: String,
    pub leads: Vec<Lead>,
    pub unreachable: bool,
    pub calls: RefCell<usize>,
}

impl StaticSource {
    pub fn new(name: &str, leads: Vec<Lead>) -> Self {
        Self {
            name: name.to_string(),
            leads,
            unreachable: false,
            calls: RefCell::new(0),
        }
    }

    pub fn unreachable(name: &str) -> Self {
        Self {
            unreachable: true,
            ..Self::new(name, Vec::new())
        }
    }
}

impl LeadSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_eligible_leads(&self) -> Result<Vec<Lead>, String> {
        *self.calls.borrow_mut() += 1;
        if self.unreachable {
            return Err(format!("{} is unreachable", self.name));
        }
        Ok(self.leads.clone())
    }
}

/// Delivery fake that records every attempt and rejects listed lead names.
#[derive(Default)]
pub struct ScriptedDelivery {
    pub rejected_names: HashSet<String>,
    pub attempts: RefCell<Vec<(String, String)>>,
}

impl ScriptedDelivery {
    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            rejected_names: names.iter().map(|name| name.to_string()).collect(),
            attempts: RefCell::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<(String, String)> {
        self.attempts.borrow().clone()
    }

    pub fn attempts_for_team(&self, team: &str) -> Vec<String> {
        self.attempts
            .borrow()
            .iter()
            .filter(|(_, attempted_team)| attempted_team == team)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl LeadDelivery for ScriptedDelivery {
    fn deliver(&self, lead: &Lead, team: &str) -> bool {
        self.attempts
            .borrow_mut()
            .push((lead.name.clone(), team.to_string()));
        !self.rejected_names.contains(&lead.name)
    }
}

/// Status sink fake that captures written leads and can fail listed names.
#[derive(Default)]
pub struct RecordingSink {
    pub failing_names: HashSet<String>,
    pub recorded: RefCell<Vec<Lead>>,
}

impl RecordingSink {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing_names: names.iter().map(|name| name.to_string()).collect(),
            recorded: RefCell::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<Lead> {
        self.recorded.borrow().clone()
    }

    pub fn count_for(&self, name: &str) -> usize {
        self.recorded
            .borrow()
            .iter()
            .filter(|lead| lead.name == name)
            .count()
    }
}

impl StatusSink for RecordingSink {
    fn record_status(&self, lead: &Lead) -> bool {
        self.recorded.borrow_mut().push(lead.clone());
        !self.failing_names.contains(&lead.name)
    }
}
