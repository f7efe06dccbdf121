// crates/orgdir-core/src/model/rows.rs
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// # The Row Model
///
/// One struct per relational table. Rows reference each other by id only;
/// there are no owning links between them, so the activity forest is an
/// arena (rows keyed by id) rather than an object graph.
///
/// **Tables:** `buildings` <- `organizations` <- `activities` (self-referencing)
pub type BuildingId = i64;
pub type OrganizationId = i64;
pub type ActivityId = i64;

/// A physical location that hosts zero or more organizations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Building {
    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// An organization entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    /// Globally unique.
    pub name: String,
    pub phone_numbers: Vec<String>,
    /// Copy of the building address taken at insert time; may diverge.
    pub address: String,
    pub building_id: BuildingId,
}

/// One node of an organization's activity forest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// `None` marks a root activity.
    pub parent_id: Option<ActivityId>,
    pub organization_id: OrganizationId,
}

impl Activity {
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
