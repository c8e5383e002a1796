//! Risk analytics module - descriptive statistics over a holdings snapshot.

mod risk_engine;
mod risk_model;
pub mod statistics;

pub use risk_engine::*;
pub use risk_model::*;
