//! Recommendations module - independent rules that turn risk metrics into advice.

mod recommendation_engine;
mod recommendation_model;
mod recommendation_traits;
mod rules;

pub use recommendation_engine::RecommendationEngine;
pub use recommendation_model::*;
pub use recommendation_traits::{RecommendationRule, RuleContext};
pub use rules::{
    CategoryConcentrationRule, HighRiskExposureRule, HighVolatilityRule, LowDiversificationRule,
};

#[cfg(test)]
mod recommendation_engine_tests;
