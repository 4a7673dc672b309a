//! Finance estimates, credit pre-screening, and rate-limited lead intake for a used-car showroom.

pub mod config;
pub mod credit;
pub mod error;
pub mod finance;
pub mod inventory;
pub mod leads;
pub mod telemetry;
