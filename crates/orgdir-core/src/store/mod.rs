// crates/orgdir-core/src/store/mod.rs

//! # Store Abstraction
//!
//! The directory never talks to a database directly. It opens a
//! [`UnitOfWork`] per operation through [`DirectoryStore::begin`] and only
//! uses the insert/select primitives below, enabling pluggable backends
//! ([`memory::MemoryStore`] by default, `postgres::PgStore` for production).
//!
//! A unit of work that is dropped without [`UnitOfWork::commit`] discards all
//! of its writes. That is the rollback path for cancelled requests.

use crate::error::Result;
use crate::geo::GeoPoint;
use crate::model::{
    Activity, ActivityId, Building, BuildingId, Organization, OrganizationId,
};
use async_trait::async_trait;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// Session factory.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Acquires a session scope. Reads see committed data plus the unit's
    /// own pending writes.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;
}

/// One transactional session.
#[async_trait]
pub trait UnitOfWork: Send {
    // ── Inserts ──

    async fn insert_building(&mut self, address: &str, point: GeoPoint) -> Result<BuildingId>;
    async fn insert_organization(
        &mut self,
        name: &str,
        phone_numbers: &[String],
        address: &str,
        building_id: BuildingId,
    ) -> Result<OrganizationId>;
    async fn insert_activity(
        &mut self,
        name: &str,
        parent_id: Option<ActivityId>,
        organization_id: OrganizationId,
    ) -> Result<ActivityId>;

    // ── Organizations ──

    async fn find_organization_by_name(&mut self, name: &str) -> Result<Option<Organization>>;
    async fn get_organization(&mut self, id: OrganizationId) -> Result<Option<Organization>>;
    /// Exact match on `organizations.address`, in id order.
    async fn organizations_by_address(&mut self, address: &str) -> Result<Vec<Organization>>;
    async fn organizations_ordered_by_name(&mut self) -> Result<Vec<Organization>>;
    /// Id order; unknown ids are skipped.
    async fn organizations_by_ids(&mut self, ids: &[OrganizationId]) -> Result<Vec<Organization>>;
    async fn organizations_in_building(
        &mut self,
        building_id: BuildingId,
    ) -> Result<Vec<Organization>>;

    // ── Buildings ──

    async fn get_building(&mut self, id: BuildingId) -> Result<Option<Building>>;
    /// First building (lowest id) whose address equals `address` exactly.
    async fn find_building_by_address(&mut self, address: &str) -> Result<Option<Building>>;
    async fn list_buildings(&mut self) -> Result<Vec<Building>>;

    // ── Activities ──

    /// Exact name match across all organizations, in id order.
    async fn activities_by_name(&mut self, name: &str) -> Result<Vec<Activity>>;
    async fn activities_for_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Activity>>;

    // ── Scope ──

    async fn commit(self: Box<Self>) -> Result<()>;
    async fn rollback(self: Box<Self>) -> Result<()>;
}
