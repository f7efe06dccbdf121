//! Error handling example for orgdir-rs
//!
//! This example demonstrates how failures are classified by `ErrorKind`

use orgdir_core::prelude::*;
use std::sync::Arc;

fn entry(name: &str, activities: Vec<ActivityNode>) -> NewEntry {
    NewEntry {
        address: "Lenina 1".into(),
        latitude: 55.0,
        longitude: 37.0,
        activity_names: activities,
        organization_name: name.into(),
        phone_numbers: Vec::new(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== orgdir-rs Error Handling Example ===\n");

    let directory = Directory::new(Arc::new(MemoryStore::new()));
    directory.add_data(&entry("Acme", Vec::new())).await?;

    // Example 1: Duplicate name
    println!("--- Example 1: Duplicate organization ---");
    match directory.add_data(&entry("Acme", Vec::new())).await {
        Ok(_) => println!("  unexpectedly accepted"),
        Err(e) => println!("  {:?}: {e}", e.kind()),
    }
    println!();

    // Example 2: Nesting deeper than allowed
    println!("--- Example 2: Activity tree too deep ---");
    let mut deep = ActivityNode::leaf("level-4");
    for level in (0..4).rev() {
        deep = ActivityNode::with_children(format!("level-{level}"), vec![deep]);
    }
    match directory.add_data(&entry("Deep", vec![deep])).await {
        Ok(_) => println!("  unexpectedly accepted"),
        Err(e) => println!("  {:?}: {e}", e.kind()),
    }
    println!();

    // Example 3: Lookups that find nothing
    println!("--- Example 3: Missing rows ---");
    for result in [
        directory.organization_by_name("Nobody").await.map(|_| ()),
        directory.organization_by_id(999).await.map(|_| ()),
        directory.organizations_by_activity("Space").await.map(|_| ()),
    ] {
        match result {
            Ok(()) => println!("  found"),
            Err(e) if e.kind() == ErrorKind::NotFound => println!("  not found: {e}"),
            Err(e) => return Err(e),
        }
    }
    println!();

    // Example 4: An empty radius result is not an error
    println!("--- Example 4: Radius search far away ---");
    let hits = directory
        .organizations_by_radius(&RadiusQuery {
            radius: 1.0,
            latitude: -33.86,
            longitude: 151.21,
        })
        .await?;
    println!("  {} hits", hits.len());

    Ok(())
}
