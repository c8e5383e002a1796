//! Portfolio snapshot module - the read-only holdings view handed to the engine.

mod portfolio_model;
mod portfolio_traits;

pub use portfolio_model::*;
pub use portfolio_traits::*;
