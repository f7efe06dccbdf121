// crates/orgdir-core/src/model/mod.rs
pub mod records;
pub mod rows;

pub use records::{ActivityNode, NewEntry, OrganizationRecord, OrganizationSummary, RadiusQuery};
pub use rows::{Activity, ActivityId, Building, BuildingId, Organization, OrganizationId};
