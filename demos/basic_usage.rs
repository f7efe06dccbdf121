//! Basic usage example for orgdir-rs
//!
//! This example demonstrates how to:
//! - Create an in-memory directory
//! - Ingest organizations with nested activities
//! - Run every lookup, including the radius search

use orgdir_core::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== orgdir-rs Basic Usage Example ===\n");

    let store = MemoryStore::new();
    let directory = Directory::new(Arc::new(store.clone()));

    // Example 1: Ingest
    println!("--- Example 1: Ingest organizations ---");
    let entries = [
        NewEntry {
            address: "Blyukhera 32/1".into(),
            latitude: 55.7539,
            longitude: 37.6208,
            activity_names: vec![ActivityNode::with_children(
                "Food",
                vec![
                    ActivityNode::with_children("Meat", vec![ActivityNode::leaf("Beef")]),
                    ActivityNode::leaf("Dairy"),
                ],
            )],
            organization_name: "Horns and Hooves".into(),
            phone_numbers: vec!["2-222-222".into(), "3-333-333".into()],
        },
        NewEntry {
            address: "Nevsky 28".into(),
            latitude: 59.9343,
            longitude: 30.3351,
            activity_names: vec![ActivityNode::with_children(
                "Cars",
                vec![ActivityNode::leaf("Parts")],
            )],
            organization_name: "Nevsky Motors".into(),
            phone_numbers: vec!["8-812-000".into()],
        },
    ];
    for entry in &entries {
        let id = directory.add_data(entry).await?;
        println!("✓ {} -> id {id}", entry.organization_name);
    }
    let stats = store.stats().await;
    println!(
        "Buildings: {}, organizations: {}, activities: {}\n",
        stats.buildings, stats.organizations, stats.activities
    );

    // Example 2: Lookup by name (two levels of activities are reported)
    println!("--- Example 2: Lookup by name ---");
    let record = directory.organization_by_name("Horns and Hooves").await?;
    println!(
        "{} at {} ({:?}, {:?})",
        record.organization_name, record.address, record.latitude, record.longitude
    );
    for root in &record.activity_names {
        println!("  {}", root.name);
        for child in &root.sub_activities {
            println!("    {}", child.name);
        }
    }
    println!();

    // Example 3: Lookup by activity
    println!("--- Example 3: Organizations doing 'Parts' ---");
    for record in directory.organizations_by_activity("Parts").await? {
        println!("  {}", record.organization_name);
    }
    println!();

    // Example 4: Radius search around Red Square
    println!("--- Example 4: Within 10 km of Red Square ---");
    let query = RadiusQuery {
        radius: 10.0,
        latitude: 55.7539,
        longitude: 37.6208,
    };
    for hit in directory.organizations_by_radius(&query).await? {
        println!("  {} @ {}", hit.organization_name, hit.address);
    }
    println!();

    // Example 5: All organizations, ordered by name
    println!("--- Example 5: All organizations ---");
    for (i, record) in directory.all_organizations().await?.iter().enumerate() {
        println!("{}. {}", i + 1, record.organization_name);
    }

    Ok(())
}
