//! Projection module - time-value-of-money simulations for savings plans.

mod projection_engine;
mod projection_model;

pub use projection_engine::*;
pub use projection_model::*;

#[cfg(test)]
mod projection_engine_tests;
