// crates/orgdir-core/src/query.rs

//! # Query Engine
//!
//! Read operations over the directory. Lookups that find nothing return
//! `NotFound`, except the radius search, which returns an empty list.

use crate::assemble::{assemble, assemble_all};
use crate::directory::Directory;
use crate::error::{DirectoryError, Result};
use crate::geo::GeoPoint;
use crate::model::{OrganizationId, OrganizationRecord, OrganizationSummary, RadiusQuery};
use crate::store::UnitOfWork;
use std::collections::BTreeSet;
use tracing::instrument;

impl Directory {
    /// Organizations whose address equals `address` exactly.
    #[instrument(skip(self))]
    pub async fn organizations_by_address(&self, address: &str) -> Result<Vec<OrganizationRecord>> {
        let mut uow = self.store.begin().await?;
        let result = self.fetch_by_address(uow.as_mut(), address).await;
        self.finish("get_by_address", uow, result).await
    }

    #[instrument(skip(self))]
    pub async fn organization_by_name(&self, name: &str) -> Result<OrganizationRecord> {
        let mut uow = self.store.begin().await?;
        let result = self.fetch_by_name(uow.as_mut(), name).await;
        self.finish("get_by_name", uow, result).await
    }

    #[instrument(skip(self))]
    pub async fn organization_by_id(&self, id: OrganizationId) -> Result<OrganizationRecord> {
        let mut uow = self.store.begin().await?;
        let result = self.fetch_by_id(uow.as_mut(), id).await;
        self.finish("get_by_id", uow, result).await
    }

    /// Every organization, ordered by name.
    #[instrument(skip(self))]
    pub async fn all_organizations(&self) -> Result<Vec<OrganizationRecord>> {
        let mut uow = self.store.begin().await?;
        let result = self.fetch_all(uow.as_mut()).await;
        self.finish("get_all", uow, result).await
    }

    /// Organizations owning at least one activity named exactly `activity`,
    /// each reported once.
    #[instrument(skip(self))]
    pub async fn organizations_by_activity(
        &self,
        activity: &str,
    ) -> Result<Vec<OrganizationRecord>> {
        let mut uow = self.store.begin().await?;
        let result = self.fetch_by_activity(uow.as_mut(), activity).await;
        self.finish("get_by_activity", uow, result).await
    }

    /// Every organization in every building within `query.radius` km of the
    /// center. Linear scan over all buildings.
    #[instrument(skip(self))]
    pub async fn organizations_by_radius(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<OrganizationSummary>> {
        let mut uow = self.store.begin().await?;
        let result = self.fetch_by_radius(uow.as_mut(), query).await;
        self.finish("get_by_radius", uow, result).await
    }

    // -----------------------------------------------------------------------
    // INTERNAL (one unit of work already open)
    // -----------------------------------------------------------------------

    async fn fetch_by_address(
        &self,
        uow: &mut dyn UnitOfWork,
        address: &str,
    ) -> Result<Vec<OrganizationRecord>> {
        let orgs = uow.organizations_by_address(address).await?;
        if orgs.is_empty() {
            return Err(DirectoryError::NotFound(
                "There are no organizations placed at this address".into(),
            ));
        }
        assemble_all(uow, orgs, &self.config).await
    }

    async fn fetch_by_name(
        &self,
        uow: &mut dyn UnitOfWork,
        name: &str,
    ) -> Result<OrganizationRecord> {
        let org = uow.find_organization_by_name(name).await?.ok_or_else(|| {
            DirectoryError::NotFound(format!("Organization {name} does not exist"))
        })?;
        assemble(uow, org, &self.config).await
    }

    async fn fetch_by_id(
        &self,
        uow: &mut dyn UnitOfWork,
        id: OrganizationId,
    ) -> Result<OrganizationRecord> {
        let org = uow.get_organization(id).await?.ok_or_else(|| {
            DirectoryError::NotFound(format!("Organization with id {id} does not exist"))
        })?;
        assemble(uow, org, &self.config).await
    }

    async fn fetch_all(&self, uow: &mut dyn UnitOfWork) -> Result<Vec<OrganizationRecord>> {
        let orgs = uow.organizations_ordered_by_name().await?;
        if orgs.is_empty() {
            return Err(DirectoryError::NotFound(
                "There are no organizations available".into(),
            ));
        }
        assemble_all(uow, orgs, &self.config).await
    }

    async fn fetch_by_activity(
        &self,
        uow: &mut dyn UnitOfWork,
        activity: &str,
    ) -> Result<Vec<OrganizationRecord>> {
        let activities = uow.activities_by_name(activity).await?;
        if activities.is_empty() {
            return Err(DirectoryError::NotFound(format!(
                "Activity {activity} not found"
            )));
        }
        // Same name may occur several times in one organization's forest.
        let ids: Vec<OrganizationId> = activities
            .iter()
            .map(|a| a.organization_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let orgs = uow.organizations_by_ids(&ids).await?;
        assemble_all(uow, orgs, &self.config).await
    }

    async fn fetch_by_radius(
        &self,
        uow: &mut dyn UnitOfWork,
        query: &RadiusQuery,
    ) -> Result<Vec<OrganizationSummary>> {
        let center = GeoPoint::new(query.latitude, query.longitude);
        let buildings = uow.list_buildings().await?;

        let mut out = Vec::new();
        for building in &buildings {
            let distance = center.distance_to(&building.point(), self.config.earth_radius_km);
            if distance <= query.radius {
                let orgs = uow.organizations_in_building(building.id).await?;
                out.extend(
                    orgs.into_iter()
                        .map(|org| OrganizationSummary::from_parts(org, building)),
                );
            }
        }
        tracing::debug!(
            scanned = buildings.len(),
            matched = out.len(),
            "radius scan finished"
        );
        Ok(out)
    }
}
