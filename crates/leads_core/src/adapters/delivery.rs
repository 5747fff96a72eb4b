use crate::lead::Lead;

/// Pushes a lead to the CRM on behalf of a team.
///
/// Ordinary failures (transport errors, remote rejection) are reported as
/// `false` and logged by the implementation.
pub trait LeadDelivery {
    fn deliver(&self, lead: &Lead, team: &str) -> bool;
}
