//! Obstacle data sources

pub mod colliders;

pub use colliders::{load_colliders, parse_colliders, write_colliders, ColliderMap, HomePosition};
