use crate::lead::Lead;

/// Produces leads that are currently eligible for distribution.
///
/// Implementations skip and log individual malformed records. An `Err` means
/// the whole source was unreachable; the distributor logs it and carries on
/// with the other sources.
pub trait LeadSource {
    fn name(&self) -> &str;

    fn list_eligible_leads(&self) -> Result<Vec<Lead>, String>;
}
