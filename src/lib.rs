//! Stowage - attachment storage maintenance
//!
//! This library crate exposes the upgrade machinery for integration testing.

pub mod config;
pub mod storage;
pub mod upgrade;
