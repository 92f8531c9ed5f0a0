//! Row schemas and endpoints for each back-office page.

pub mod dashboard;
pub mod drivers;
pub mod new_drivers;
pub mod trips;
