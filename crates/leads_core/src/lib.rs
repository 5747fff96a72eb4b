//! Lead normalization and distribution primitives.
//!
//! This crate owns the lead record, the split plan, and the distributor
//! control loop. It has no network or filesystem access: sources, CRM
//! delivery, and status write-back are reached only through the traits in
//! [`adapters`]. See `crates/leads_runtime` for the concrete adapters.

pub mod adapters;
pub mod config;
pub mod distributor;
pub mod lead;
pub mod phone;
pub mod split;

pub use config::{ConfigError, DistributorConfig};
pub use distributor::{DistributionReport, LeadDistributor, TeamOutcome};
pub use lead::{Lead, OriginSheet};
pub use split::{split_index, SplitPlan};
