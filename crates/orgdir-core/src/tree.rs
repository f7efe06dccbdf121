// crates/orgdir-core/src/tree.rs

//! # Activity Tree Builder
//!
//! Turns the flat `activities` rows of one organization back into a forest of
//! [`ActivityNode`]s. Rows only know their parent id, so both builders work on
//! an arena: rows are indexed by id (or position) and nodes are materialized
//! top-down, never by linking row structs to each other.

use crate::config::TreeMode;
use crate::model::{Activity, ActivityId, ActivityNode};
use std::collections::{HashMap, HashSet};

/// Builds the activity forest for one organization according to `mode`.
///
/// `rows` must all belong to the same organization; their order drives the
/// order of roots and children in the output.
pub fn build_activity_tree(
    rows: &[Activity],
    mode: TreeMode,
    max_depth: usize,
) -> Vec<ActivityNode> {
    match mode {
        TreeMode::TwoLevel => build_two_level(rows),
        TreeMode::Full => build_full(rows, max_depth),
    }
}

/// **Two-level builder:** roots plus their immediate children.
///
/// Single pass in row order:
/// 1. A root row registers a node (if a child already registered it, the
///    existing node and its children are kept).
/// 2. A child row whose parent is a root registers that parent if needed and
///    appends a leaf entry to it.
/// 3. A child row whose parent is itself a child is not emitted, so
///    grandchildren are truncated.
/// 4. A child row whose parent id is not among `rows` is ignored.
pub fn build_two_level(rows: &[Activity]) -> Vec<ActivityNode> {
    let by_id: HashMap<ActivityId, &Activity> = rows.iter().map(|a| (a.id, a)).collect();

    // Registration order decides output order.
    let mut order: Vec<ActivityId> = Vec::new();
    let mut nodes: HashMap<ActivityId, ActivityNode> = HashMap::new();

    for row in rows {
        match row.parent_id {
            None => register(row, &mut order, &mut nodes),
            Some(parent_id) => {
                let Some(parent) = by_id.get(&parent_id) else {
                    continue; // orphan
                };
                if !parent.is_root() {
                    continue;
                }
                register(parent, &mut order, &mut nodes);
                if let Some(node) = nodes.get_mut(&parent_id) {
                    node.sub_activities.push(ActivityNode::leaf(row.name.clone()));
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| nodes.remove(&id))
        .collect()
}

fn register(
    activity: &Activity,
    order: &mut Vec<ActivityId>,
    nodes: &mut HashMap<ActivityId, ActivityNode>,
) {
    nodes.entry(activity.id).or_insert_with(|| {
        order.push(activity.id);
        ActivityNode::leaf(activity.name.clone())
    });
}

/// **Full builder:** recursive reconstruction down to `max_depth`.
///
/// Roots keep row order, children keep row order under their parent. Nodes
/// deeper than `max_depth` are dropped, as are orphans and anything only
/// reachable through a parent cycle.
pub fn build_full(rows: &[Activity], max_depth: usize) -> Vec<ActivityNode> {
    let known: HashSet<ActivityId> = rows.iter().map(|a| a.id).collect();

    let mut roots: Vec<usize> = Vec::new();
    let mut children: HashMap<ActivityId, Vec<usize>> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        match row.parent_id {
            None => roots.push(idx),
            Some(parent_id) if known.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(idx)
            }
            Some(_) => {}
        }
    }

    roots
        .into_iter()
        .map(|idx| materialize(rows, &children, idx, 0, max_depth))
        .collect()
}

fn materialize(
    rows: &[Activity],
    children: &HashMap<ActivityId, Vec<usize>>,
    idx: usize,
    level: usize,
    max_depth: usize,
) -> ActivityNode {
    let row = &rows[idx];
    let sub_activities = if level < max_depth {
        children
            .get(&row.id)
            .map(|kids| {
                kids.iter()
                    .map(|&kid| materialize(rows, children, kid, level + 1, max_depth))
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    ActivityNode::with_children(row.name.clone(), sub_activities)
}
