// crates/orgdir-core/src/store/postgres.rs

//! PostgreSQL implementation of the store traits.
//!
//! All SQL is runtime-checked (`sqlx::query`, not `sqlx::query!`) so building
//! the crate never needs a live database. The schema ships as an embedded
//! migration (`migrations/`).

use super::{DirectoryStore, UnitOfWork};
use crate::error::{DirectoryError, Result};
use crate::geo::GeoPoint;
use crate::model::{
    Activity, ActivityId, Building, BuildingId, Organization, OrganizationId,
};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, Postgres, Transaction};

/// Name of the UNIQUE constraint on `organizations.name`.
const ORG_NAME_CONSTRAINT: &str = "organizations_name_key";

const ORGANIZATION_COLUMNS: &str = "id, name, phone_numbers, address, building_id";

/// Postgres-backed store. Each unit of work is one database transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| classify(e, None))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DirectoryError::Unexpected(format!("migration failed: {e}")))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DirectoryStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(|e| classify(e, None))?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

// ── Row types ──

#[derive(FromRow)]
struct PgBuildingRow {
    id: i64,
    address: String,
    latitude: f64,
    longitude: f64,
}

impl From<PgBuildingRow> for Building {
    fn from(r: PgBuildingRow) -> Self {
        Building {
            id: r.id,
            address: r.address,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

#[derive(FromRow)]
struct PgOrganizationRow {
    id: i64,
    name: String,
    phone_numbers: Option<String>,
    address: String,
    building_id: i64,
}

impl TryFrom<PgOrganizationRow> for Organization {
    type Error = DirectoryError;

    fn try_from(r: PgOrganizationRow) -> Result<Self> {
        let phone_numbers = match r.phone_numbers.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str(raw)?,
        };
        Ok(Organization {
            id: r.id,
            name: r.name,
            phone_numbers,
            address: r.address,
            building_id: r.building_id,
        })
    }
}

#[derive(FromRow)]
struct PgActivityRow {
    id: i64,
    name: String,
    parent_id: Option<i64>,
    organization_id: i64,
}

impl From<PgActivityRow> for Activity {
    fn from(r: PgActivityRow) -> Self {
        Activity {
            id: r.id,
            name: r.name,
            parent_id: r.parent_id,
            organization_id: r.organization_id,
        }
    }
}

/// Maps a driver error onto the directory taxonomy.
///
/// A unique violation on the organization name becomes `Conflict` when the
/// offending name is known; every other integrity violation becomes
/// `StorageConstraint`.
fn classify(err: sqlx::Error, org_name: Option<&str>) -> DirectoryError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() && db.constraint() == Some(ORG_NAME_CONSTRAINT) {
            if let Some(name) = org_name {
                return DirectoryError::Conflict(name.to_string());
            }
        }
        if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() {
            return DirectoryError::StorageConstraint(db.message().to_string());
        }
    }
    DirectoryError::Unexpected(err.to_string())
}

fn organizations(rows: Vec<PgOrganizationRow>) -> Result<Vec<Organization>> {
    rows.into_iter().map(Organization::try_from).collect()
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_building(&mut self, address: &str, point: GeoPoint) -> Result<BuildingId> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO buildings (address, latitude, longitude) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(address)
        .bind(point.latitude)
        .bind(point.longitude)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| classify(e, None))
    }

    async fn insert_organization(
        &mut self,
        name: &str,
        phone_numbers: &[String],
        address: &str,
        building_id: BuildingId,
    ) -> Result<OrganizationId> {
        let phones = serde_json::to_string(phone_numbers)?;
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO organizations (name, phone_numbers, address, building_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(phones)
        .bind(address)
        .bind(building_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| classify(e, Some(name)))
    }

    async fn insert_activity(
        &mut self,
        name: &str,
        parent_id: Option<ActivityId>,
        organization_id: OrganizationId,
    ) -> Result<ActivityId> {
        // The FK only proves the parent exists; ownership is checked here.
        if let Some(parent_id) = parent_id {
            let owner = sqlx::query_scalar::<_, i64>(
                "SELECT organization_id FROM activities WHERE id = $1",
            )
            .bind(parent_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| classify(e, None))?;
            if let Some(owner) = owner {
                if owner != organization_id {
                    return Err(DirectoryError::StorageConstraint(format!(
                        "activities.parent_id {parent_id} belongs to organization {owner}"
                    )));
                }
            }
        }

        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO activities (name, parent_id, organization_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(parent_id)
        .bind(organization_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| classify(e, None))
    }

    async fn find_organization_by_name(&mut self, name: &str) -> Result<Option<Organization>> {
        let query = format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE name = $1");
        sqlx::query_as::<_, PgOrganizationRow>(&query)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| classify(e, None))?
            .map(Organization::try_from)
            .transpose()
    }

    async fn get_organization(&mut self, id: OrganizationId) -> Result<Option<Organization>> {
        let query = format!("SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, PgOrganizationRow>(&query)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| classify(e, None))?
            .map(Organization::try_from)
            .transpose()
    }

    async fn organizations_by_address(&mut self, address: &str) -> Result<Vec<Organization>> {
        let query = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE address = $1 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, PgOrganizationRow>(&query)
            .bind(address)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| classify(e, None))?;
        organizations(rows)
    }

    async fn organizations_ordered_by_name(&mut self) -> Result<Vec<Organization>> {
        // "C" collation matches MemoryStore's byte-wise ordering.
        let query = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations ORDER BY name COLLATE \"C\", id"
        );
        let rows = sqlx::query_as::<_, PgOrganizationRow>(&query)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| classify(e, None))?;
        organizations(rows)
    }

    async fn organizations_by_ids(&mut self, ids: &[OrganizationId]) -> Result<Vec<Organization>> {
        let query = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = ANY($1) ORDER BY id"
        );
        let rows = sqlx::query_as::<_, PgOrganizationRow>(&query)
            .bind(ids)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| classify(e, None))?;
        organizations(rows)
    }

    async fn organizations_in_building(
        &mut self,
        building_id: BuildingId,
    ) -> Result<Vec<Organization>> {
        let query = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE building_id = $1 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, PgOrganizationRow>(&query)
            .bind(building_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| classify(e, None))?;
        organizations(rows)
    }

    async fn get_building(&mut self, id: BuildingId) -> Result<Option<Building>> {
        let row = sqlx::query_as::<_, PgBuildingRow>(
            "SELECT id, address, latitude, longitude FROM buildings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| classify(e, None))?;
        Ok(row.map(Building::from))
    }

    async fn find_building_by_address(&mut self, address: &str) -> Result<Option<Building>> {
        let row = sqlx::query_as::<_, PgBuildingRow>(
            r#"
            SELECT id, address, latitude, longitude
            FROM buildings
            WHERE address = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(address)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| classify(e, None))?;
        Ok(row.map(Building::from))
    }

    async fn list_buildings(&mut self) -> Result<Vec<Building>> {
        let rows = sqlx::query_as::<_, PgBuildingRow>(
            "SELECT id, address, latitude, longitude FROM buildings ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| classify(e, None))?;
        Ok(rows.into_iter().map(Building::from).collect())
    }

    async fn activities_by_name(&mut self, name: &str) -> Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, PgActivityRow>(
            r#"
            SELECT id, name, parent_id, organization_id
            FROM activities
            WHERE name = $1
            ORDER BY id
            "#,
        )
        .bind(name)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| classify(e, None))?;
        Ok(rows.into_iter().map(Activity::from).collect())
    }

    async fn activities_for_organization(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Activity>> {
        let rows = sqlx::query_as::<_, PgActivityRow>(
            r#"
            SELECT id, name, parent_id, organization_id
            FROM activities
            WHERE organization_id = $1
            ORDER BY id
            "#,
        )
        .bind(organization_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| classify(e, None))?;
        Ok(rows.into_iter().map(Activity::from).collect())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(|e| classify(e, None))
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(|e| classify(e, None))
    }
}
