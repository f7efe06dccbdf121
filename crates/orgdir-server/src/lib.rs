//! orgdir-server — HTTP surface for the organization directory.
//!
//! The binary (`src/main.rs`) wires a store into [`router::build_router`];
//! the library exists so integration tests can drive the router in-process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
