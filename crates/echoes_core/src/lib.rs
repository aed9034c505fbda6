//! Core types shared by every Echoes crate.
//!
//! This crate provides the data model the rest of the client builds on:
//! - Forms, teams and the hunt/flee relation
//! - The team-bucketed sphere set rebuilt from each store snapshot
//! - Tuning parameters and store-domain conversions
//! - Frame timing and lifetimes for transient entities

pub mod form;
pub mod params;
pub mod sphere_set;
pub mod time;

pub use form::*;
pub use params::*;
pub use sphere_set::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
