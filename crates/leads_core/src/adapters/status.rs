use crate::lead::Lead;

/// Persists `lead.status` against the row the lead was read from.
///
/// Writing the same status twice must leave the row in the same state.
pub trait StatusSink {
    fn record_status(&self, lead: &Lead) -> bool;
}
