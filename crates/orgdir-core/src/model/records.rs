// crates/orgdir-core/src/model/records.rs
use serde::{Deserialize, Serialize};

/// A named activity with its nested sub-activities.
///
/// Used both as ingestion input (arbitrary depth, validated against the
/// configured cap) and as output of the tree builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityNode {
    pub name: String,
    #[serde(default)]
    pub sub_activities: Vec<ActivityNode>,
}

impl ActivityNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_activities: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, sub_activities: Vec<ActivityNode>) -> Self {
        Self {
            name: name.into(),
            sub_activities,
        }
    }

    /// Deepest level below this node (a leaf has depth 0).
    pub fn depth(&self) -> usize {
        // Explicit stack: input trees come from request bodies.
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            for child in &node.sub_activities {
                stack.push((child, level + 1));
            }
        }
        deepest
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.sub_activities.iter().map(ActivityNode::count).sum::<usize>()
    }
}

/// Payload of the `add_data` operation: one building, one organization and
/// its activity forest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    // building
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    // activity
    #[serde(default)]
    pub activity_names: Vec<ActivityNode>,
    // organization
    pub organization_name: String,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
}

/// The assembled, client-facing shape of an organization.
///
/// Coordinates are `None` when the organization's building cannot be
/// resolved; this never fails the request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub organization_name: String,
    pub address: String,
    pub phone_numbers: Vec<String>,
    pub activity_names: Vec<ActivityNode>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Flat record returned by the radius search (no activity data).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub organization_name: String,
    /// Address of the building that matched the radius.
    pub address: String,
    pub phone_numbers: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Center point and radius (kilometers) of a radius search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusQuery {
    pub radius: f64,
    pub latitude: f64,
    pub longitude: f64,
}
