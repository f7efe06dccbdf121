// crates/orgdir-core/src/lib.rs

pub mod assemble; // Organization row -> client-facing record
pub mod config;
pub mod directory; // The service facade (one unit of work per operation)
pub mod error;
pub mod geo;
pub mod ingest;
pub mod loader;
pub mod model;
pub mod query;
pub mod store;
pub mod tree; // Activity forest reconstruction

// Re-exports
pub use crate::config::{CoordinateLookup, DirectoryConfig, TreeMode};
pub use crate::directory::Directory;
pub use crate::error::{DirectoryError, ErrorKind, Result};
pub use crate::geo::{distance_km, GeoPoint, EARTH_RADIUS_KM};
// Export the Model Types
pub use crate::model::{
    Activity, ActivityId, ActivityNode, Building, BuildingId, NewEntry, Organization,
    OrganizationId, OrganizationRecord, OrganizationSummary, RadiusQuery,
};
pub use crate::store::memory::{DirectoryStats, MemoryStore};
// Export the Store Traits (Crucial for custom backends!)
pub use crate::store::{DirectoryStore, UnitOfWork};
#[cfg(feature = "postgres")]
pub use crate::store::postgres::PgStore;

pub mod prelude {
    //! orgdir prelude: bring common types and traits into scope for demos.
    pub use crate::config::{CoordinateLookup, DirectoryConfig, TreeMode};
    pub use crate::directory::Directory;
    pub use crate::error::{DirectoryError, ErrorKind, Result};
    pub use crate::geo::{distance_km, GeoPoint};
    pub use crate::model::{
        ActivityNode, NewEntry, OrganizationRecord, OrganizationSummary, RadiusQuery,
    };
    pub use crate::store::memory::MemoryStore;
    pub use crate::store::{DirectoryStore, UnitOfWork};
}
