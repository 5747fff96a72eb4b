//! Collaborator seams used by the distributor.

pub mod delivery;
pub mod source;
pub mod status;

pub use delivery::LeadDelivery;
pub use source::LeadSource;
pub use status::StatusSink;
