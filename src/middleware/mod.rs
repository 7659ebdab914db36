//! Request guards applied ahead of route handlers.

pub mod auth;
