// crates/orgdir-core/src/config.rs
use crate::geo::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};

/// How the read side rebuilds an organization's activity forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeMode {
    /// Roots and their immediate children only; children always carry an
    /// empty `sub_activities` list, deeper levels are not emitted.
    #[default]
    TwoLevel,
    /// Full recursive reconstruction, bounded by `max_activity_depth`.
    Full,
}

/// How an organization is joined to the building that supplies its
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateLookup {
    /// `organizations.building_id = buildings.id`
    #[default]
    BuildingId,
    /// First building whose address equals `organizations.address` exactly.
    Address,
}

/// Behavioral knobs of the directory service.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Deepest child level accepted at ingestion (root = level 0).
    pub max_activity_depth: usize,
    pub tree_mode: TreeMode,
    pub coordinate_lookup: CoordinateLookup,
    pub earth_radius_km: f64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            max_activity_depth: 3,
            tree_mode: TreeMode::default(),
            coordinate_lookup: CoordinateLookup::default(),
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

#[cfg(feature = "json")]
impl DirectoryConfig {
    /// Reads a JSON config file. Missing fields fall back to defaults.
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::DirectoryError::NotFound(format!(
                "Config not found at {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg: DirectoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, DirectoryConfig::default());
        assert_eq!(cfg.max_activity_depth, 3);
        assert_eq!(cfg.tree_mode, TreeMode::TwoLevel);
        assert_eq!(cfg.coordinate_lookup, CoordinateLookup::BuildingId);
    }

    #[test]
    fn snake_case_variants() {
        let cfg: DirectoryConfig =
            serde_json::from_str(r#"{"tree_mode":"full","coordinate_lookup":"address"}"#).unwrap();
        assert_eq!(cfg.tree_mode, TreeMode::Full);
        assert_eq!(cfg.coordinate_lookup, CoordinateLookup::Address);
        assert_eq!(cfg.earth_radius_km, EARTH_RADIUS_KM);
    }
}
