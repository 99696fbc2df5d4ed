//! Meal planner: onboarding wizard and grocery list pipeline.

pub mod catalog;
pub mod config;
pub mod error;
pub mod grocery;
pub mod onboarding;
pub mod server;
pub mod store;
