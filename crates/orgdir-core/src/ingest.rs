// crates/orgdir-core/src/ingest.rs

//! # Ingestion Pipeline
//!
//! `add_data` writes one building, one organization and the organization's
//! activity forest as a single unit of work.

use crate::directory::Directory;
use crate::error::{DirectoryError, Result};
use crate::geo::GeoPoint;
use crate::model::{ActivityId, ActivityNode, NewEntry, OrganizationId};
use crate::store::UnitOfWork;
use tracing::instrument;

impl Directory {
    /// Ingests `entry` atomically and returns the new organization's id.
    ///
    /// 1. Duplicate organization name -> `Conflict` (the store's unique
    ///    constraint remains the final arbiter under concurrency).
    /// 2. Activity nesting deeper than `max_activity_depth` -> `NestingTooDeep`.
    /// 3. Building, organization, then activities in depth-first pre-order.
    ///
    /// Any failure discards every row written so far.
    #[instrument(skip(self, entry), fields(organization = %entry.organization_name))]
    pub async fn add_data(&self, entry: &NewEntry) -> Result<OrganizationId> {
        let mut uow = self.store.begin().await?;
        let result = self.write_entry(uow.as_mut(), entry).await;
        let org_id = self.finish("add_data", uow, result).await?;
        tracing::info!(organization_id = org_id, "organization ingested");
        Ok(org_id)
    }

    async fn write_entry(
        &self,
        uow: &mut dyn UnitOfWork,
        entry: &NewEntry,
    ) -> Result<OrganizationId> {
        if uow
            .find_organization_by_name(&entry.organization_name)
            .await?
            .is_some()
        {
            return Err(DirectoryError::Conflict(entry.organization_name.clone()));
        }

        // Fail before touching the store when the whole forest is too deep.
        let max = self.config.max_activity_depth;
        if entry.activity_names.iter().any(|root| root.depth() > max) {
            return Err(DirectoryError::NestingTooDeep { max });
        }

        let building_id = uow
            .insert_building(
                &entry.address,
                GeoPoint::new(entry.latitude, entry.longitude),
            )
            .await?;
        let org_id = uow
            .insert_organization(
                &entry.organization_name,
                &entry.phone_numbers,
                &entry.address,
                building_id,
            )
            .await?;
        let activities = insert_activities(uow, &entry.activity_names, org_id).await?;

        tracing::debug!(building_id, organization_id = org_id, activities, "entry staged");
        Ok(org_id)
    }
}

/// Inserts a forest level by level, assigning `parent_id` from the row just
/// written. Depth was validated by the caller. Returns the number of activity
/// rows inserted.
async fn insert_activities(
    uow: &mut dyn UnitOfWork,
    roots: &[ActivityNode],
    organization_id: OrganizationId,
) -> Result<usize> {
    // Explicit stack instead of async recursion; reversed pushes keep
    // pre-order (parent, then each child subtree in input order).
    let mut stack: Vec<(&ActivityNode, Option<ActivityId>)> =
        roots.iter().rev().map(|node| (node, None)).collect();
    let mut inserted = 0;

    while let Some((node, parent_id)) = stack.pop() {
        let id = uow
            .insert_activity(&node.name, parent_id, organization_id)
            .await?;
        inserted += 1;
        for child in node.sub_activities.iter().rev() {
            stack.push((child, Some(id)));
        }
    }
    Ok(inserted)
}
