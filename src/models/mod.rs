//! Typed records for campaign API payloads and dashboard views.

pub mod campaign;
pub mod lead;
pub mod pagination;
