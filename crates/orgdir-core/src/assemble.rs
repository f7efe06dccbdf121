// crates/orgdir-core/src/assemble.rs

//! # Organization Assembler
//!
//! Joins an organization row with the building that supplies its coordinates
//! and with its activity forest. A building that cannot be resolved yields
//! `None` coordinates on every query path.

use crate::config::{CoordinateLookup, DirectoryConfig};
use crate::error::Result;
use crate::model::{Building, Organization, OrganizationRecord, OrganizationSummary};
use crate::store::UnitOfWork;
use crate::tree::build_activity_tree;

/// Resolves the building an organization's coordinates come from.
pub(crate) async fn resolve_building(
    uow: &mut dyn UnitOfWork,
    org: &Organization,
    lookup: CoordinateLookup,
) -> Result<Option<Building>> {
    match lookup {
        CoordinateLookup::BuildingId => uow.get_building(org.building_id).await,
        CoordinateLookup::Address => uow.find_building_by_address(&org.address).await,
    }
}

/// Builds the full record for one organization.
pub(crate) async fn assemble(
    uow: &mut dyn UnitOfWork,
    org: Organization,
    config: &DirectoryConfig,
) -> Result<OrganizationRecord> {
    let building = resolve_building(uow, &org, config.coordinate_lookup).await?;
    let rows = uow.activities_for_organization(org.id).await?;
    let activity_names = build_activity_tree(&rows, config.tree_mode, config.max_activity_depth);

    Ok(OrganizationRecord {
        organization_name: org.name,
        address: org.address,
        phone_numbers: org.phone_numbers,
        activity_names,
        latitude: building.as_ref().map(|b| b.latitude),
        longitude: building.as_ref().map(|b| b.longitude),
    })
}

/// Assembles every organization, preserving input order.
pub(crate) async fn assemble_all(
    uow: &mut dyn UnitOfWork,
    orgs: Vec<Organization>,
    config: &DirectoryConfig,
) -> Result<Vec<OrganizationRecord>> {
    let mut out = Vec::with_capacity(orgs.len());
    for org in orgs {
        out.push(assemble(uow, org, config).await?);
    }
    Ok(out)
}

impl OrganizationSummary {
    /// Flat radius-search record. Address and coordinates come from the
    /// building that matched, not from the organization row.
    pub fn from_parts(org: Organization, building: &Building) -> Self {
        OrganizationSummary {
            organization_name: org.name,
            address: building.address.clone(),
            phone_numbers: org.phone_numbers,
            latitude: building.latitude,
            longitude: building.longitude,
        }
    }
}
