//! Business logic services.

pub mod dashboard;
pub mod instantly;
pub mod segments;
