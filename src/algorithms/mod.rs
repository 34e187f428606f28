//! Geodetic distance algorithms

pub mod geodesy;

pub use geodesy::{haversine_distance, distance_between, local_offset, net_displacement};
