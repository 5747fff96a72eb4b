//! Runtime adapters and handlers for the lead router.
//!
//! This crate owns every piece of I/O: sheet row stores (CSV files and the
//! Google Sheets values API), CRM delivery over HTTP, and the Maildir inbox.
//! The handlers wire those adapters into the `leads_core` traits and the
//! `lead_router` binary drives a run from environment configuration.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod telemetry;
