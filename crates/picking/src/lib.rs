//! Pointer picking for Echoes: camera rays and nearest ray/sphere hits.

pub mod camera;
pub mod raycast;

pub use camera::*;
pub use raycast::*;
