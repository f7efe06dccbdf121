// crates/orgdir-core/src/store/memory.rs
use super::{DirectoryStore, UnitOfWork};
use crate::error::{DirectoryError, Result};
use crate::geo::GeoPoint;
use crate::model::{
    Activity, ActivityId, Building, BuildingId, Organization, OrganizationId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The three relational tables, held as arenas keyed by generated id.
///
/// `BTreeMap` keeps every scan in id order, which stands in for the insertion
/// order a relational store returns without an `ORDER BY`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tables {
    pub buildings: BTreeMap<BuildingId, Building>,
    pub organizations: BTreeMap<OrganizationId, Organization>,
    pub activities: BTreeMap<ActivityId, Activity>,
}

impl Tables {
    fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.organizations.is_empty() && self.activities.is_empty()
    }
}

/// Simple aggregate statistics for the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub buildings: usize,
    pub organizations: usize,
    pub activities: usize,
}

/// Last id handed out per table. Ids of rolled-back rows are never reused.
#[derive(Debug, Default)]
struct Sequences {
    building: AtomicI64,
    organization: AtomicI64,
    activity: AtomicI64,
}

impl Sequences {
    fn seeded_from(tables: &Tables) -> Self {
        let last = |max: Option<&i64>| AtomicI64::new(max.copied().unwrap_or(0));
        Self {
            building: last(tables.buildings.keys().next_back()),
            organization: last(tables.organizations.keys().next_back()),
            activity: last(tables.activities.keys().next_back()),
        }
    }

    #[inline]
    fn next(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// In-process store. Cheap to clone; clones share the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    seq: Arc<Sequences>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing tables (e.g. a restored snapshot).
    pub fn from_tables(tables: Tables) -> Self {
        let seq = Sequences::seeded_from(&tables);
        Self {
            tables: Arc::new(RwLock::new(tables)),
            seq: Arc::new(seq),
        }
    }

    /// A copy of the committed tables.
    pub async fn tables(&self) -> Tables {
        self.tables.read().await.clone()
    }

    pub async fn stats(&self) -> DirectoryStats {
        let t = self.tables.read().await;
        DirectoryStats {
            buildings: t.buildings.len(),
            organizations: t.organizations.len(),
            activities: t.activities.len(),
        }
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            tables: Arc::clone(&self.tables),
            seq: Arc::clone(&self.seq),
            pending: Tables::default(),
        }))
    }
}

/// Writes are staged in `pending` and only become visible to other units of
/// work on commit. No lock is held between calls.
pub struct MemoryUnitOfWork {
    tables: Arc<RwLock<Tables>>,
    seq: Arc<Sequences>,
    pending: Tables,
}

/// Rows of `committed` and `pending` matching `keep`, in id order.
fn scan<T: Clone>(
    committed: &BTreeMap<i64, T>,
    pending: &BTreeMap<i64, T>,
    keep: impl Fn(&T) -> bool,
) -> Vec<T> {
    let mut hits: Vec<(i64, &T)> = committed
        .iter()
        .chain(pending.iter())
        .filter(|(_, row)| keep(row))
        .map(|(id, row)| (*id, row))
        .collect();
    hits.sort_by_key(|(id, _)| *id);
    hits.into_iter().map(|(_, row)| row.clone()).collect()
}

fn lookup<T: Clone>(
    committed: &BTreeMap<i64, T>,
    pending: &BTreeMap<i64, T>,
    id: i64,
) -> Option<T> {
    committed.get(&id).or_else(|| pending.get(&id)).cloned()
}

fn name_taken(committed: &Tables, pending: &Tables, name: &str) -> bool {
    committed
        .organizations
        .values()
        .chain(pending.organizations.values())
        .any(|o| o.name == name)
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_building(&mut self, address: &str, point: GeoPoint) -> Result<BuildingId> {
        let id = Sequences::next(&self.seq.building);
        self.pending.buildings.insert(
            id,
            Building {
                id,
                address: address.to_string(),
                latitude: point.latitude,
                longitude: point.longitude,
            },
        );
        Ok(id)
    }

    async fn insert_organization(
        &mut self,
        name: &str,
        phone_numbers: &[String],
        address: &str,
        building_id: BuildingId,
    ) -> Result<OrganizationId> {
        {
            let committed = self.tables.read().await;
            if name_taken(&committed, &self.pending, name) {
                return Err(DirectoryError::Conflict(name.to_string()));
            }
            if lookup(&committed.buildings, &self.pending.buildings, building_id).is_none() {
                return Err(DirectoryError::StorageConstraint(format!(
                    "organizations.building_id {building_id} references no building"
                )));
            }
        }

        let id = Sequences::next(&self.seq.organization);
        self.pending.organizations.insert(
            id,
            Organization {
                id,
                name: name.to_string(),
                phone_numbers: phone_numbers.to_vec(),
                address: address.to_string(),
                building_id,
            },
        );
        Ok(id)
    }

    async fn insert_activity(
        &mut self,
        name: &str,
        parent_id: Option<ActivityId>,
        organization_id: OrganizationId,
    ) -> Result<ActivityId> {
        {
            let committed = self.tables.read().await;
            if lookup(&committed.organizations, &self.pending.organizations, organization_id)
                .is_none()
            {
                return Err(DirectoryError::StorageConstraint(format!(
                    "activities.organization_id {organization_id} references no organization"
                )));
            }
            if let Some(parent_id) = parent_id {
                match lookup(&committed.activities, &self.pending.activities, parent_id) {
                    None => {
                        return Err(DirectoryError::StorageConstraint(format!(
                            "activities.parent_id {parent_id} references no activity"
                        )))
                    }
                    Some(parent) if parent.organization_id != organization_id => {
                        return Err(DirectoryError::StorageConstraint(format!(
                            "activities.parent_id {parent_id} belongs to organization {}",
                            parent.organization_id
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        let id = Sequences::next(&self.seq.activity);
        self.pending.activities.insert(
            id,
            Activity {
                id,
                name: name.to_string(),
                parent_id,
                organization_id,
            },
        );
        Ok(id)
    }

    async fn find_organization_by_name(&mut self, name: &str) -> Result<Option<Organization>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.organizations, &self.pending.organizations, |o| {
            o.name == name
        })
        .into_iter()
        .next())
    }

    async fn get_organization(&mut self, id: OrganizationId) -> Result<Option<Organization>> {
        let committed = self.tables.read().await;
        Ok(lookup(&committed.organizations, &self.pending.organizations, id))
    }

    async fn organizations_by_address(&mut self, address: &str) -> Result<Vec<Organization>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.organizations, &self.pending.organizations, |o| {
            o.address == address
        }))
    }

    async fn organizations_ordered_by_name(&mut self) -> Result<Vec<Organization>> {
        let committed = self.tables.read().await;
        let mut all = scan(&committed.organizations, &self.pending.organizations, |_| true);
        // Byte-wise, like `COLLATE "C"`. Stable: equal names keep id order.
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn organizations_by_ids(&mut self, ids: &[OrganizationId]) -> Result<Vec<Organization>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.organizations, &self.pending.organizations, |o| {
            ids.contains(&o.id)
        }))
    }

    async fn organizations_in_building(
        &mut self,
        building_id: BuildingId,
    ) -> Result<Vec<Organization>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.organizations, &self.pending.organizations, |o| {
            o.building_id == building_id
        }))
    }

    async fn get_building(&mut self, id: BuildingId) -> Result<Option<Building>> {
        let committed = self.tables.read().await;
        Ok(lookup(&committed.buildings, &self.pending.buildings, id))
    }

    async fn find_building_by_address(&mut self, address: &str) -> Result<Option<Building>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.buildings, &self.pending.buildings, |b| {
            b.address == address
        })
        .into_iter()
        .next())
    }

    async fn list_buildings(&mut self) -> Result<Vec<Building>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.buildings, &self.pending.buildings, |_| true))
    }

    async fn activities_by_name(&mut self, name: &str) -> Result<Vec<Activity>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.activities, &self.pending.activities, |a| {
            a.name == name
        }))
    }

    async fn activities_for_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Activity>> {
        let committed = self.tables.read().await;
        Ok(scan(&committed.activities, &self.pending.activities, |a| {
            a.organization_id == organization_id
        }))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryUnitOfWork {
            tables, pending, ..
        } = *self;
        if pending.is_empty() {
            return Ok(());
        }

        let mut committed = tables.write().await;

        // Unique name is re-checked under the write lock: another unit of
        // work may have committed the same name since our insert.
        for org in pending.organizations.values() {
            if committed.organizations.values().any(|o| o.name == org.name) {
                return Err(DirectoryError::Conflict(org.name.clone()));
            }
        }

        tracing::debug!(
            buildings = pending.buildings.len(),
            organizations = pending.organizations.len(),
            activities = pending.activities.len(),
            "memory store commit"
        );
        committed.buildings.extend(pending.buildings);
        committed.organizations.extend(pending.organizations);
        committed.activities.extend(pending.activities);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        if !self.pending.is_empty() {
            tracing::debug!("memory store rollback discards pending rows");
        }
        Ok(())
    }
}
