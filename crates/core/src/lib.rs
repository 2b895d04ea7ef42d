//! Reprice
//!
//! Reprice computes price adjustments for sets of merchandise roles that
//! share a base price. Business rules — per-role bounds, strict ordering by
//! popularity, at least one non-zero change, bounded revenue drift — are
//! translated into a mixed-integer linear program and handed to a swappable
//! solver backend, either once for the minimal-surplus plan or repeatedly
//! to enumerate structurally distinct alternatives.

pub mod bounds;
pub mod fixtures;
pub mod model;
pub mod params;
pub mod plan;
pub mod prelude;
pub mod report;
pub mod roles;
pub mod search;
pub mod solvers;
pub mod tiers;
pub mod utils;
