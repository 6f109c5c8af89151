//! Dockpane Core Library
//!
//! This crate provides shared types, errors, geometry, and the persisted
//! settings schema for Dockpane.

pub mod error;
pub mod geometry;
pub mod settings;

pub use error::{DockpaneError, DockpaneResult};
pub use settings::Settings;
