use std::fmt;

use log::debug;

use super::{
    CategoryConcentrationRule, HighRiskExposureRule, HighVolatilityRule, LowDiversificationRule,
    Recommendation, RecommendationRule, RuleContext,
};

/// Ordered list of independent rules.
///
/// Every rule is evaluated; output order is registration order, so identical
/// input always produces identical output.
pub struct RecommendationEngine {
    rules: Vec<Box<dyn RecommendationRule>>,
}

impl RecommendationEngine {
    /// An engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rules: category concentration, high-risk exposure, low
    /// diversification, then high volatility.
    pub fn with_default_rules() -> Self {
        Self::new()
            .with_rule(CategoryConcentrationRule)
            .with_rule(HighRiskExposureRule)
            .with_rule(LowDiversificationRule)
            .with_rule(HighVolatilityRule)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_rule(mut self, rule: impl RecommendationRule + 'static) -> Self {
        self.register(Box::new(rule));
        self
    }

    /// Appends a rule after those already registered.
    pub fn register(&mut self, rule: Box<dyn RecommendationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let recommendation = rule.evaluate(ctx);
                if recommendation.is_some() {
                    debug!("Recommendation rule '{}' fired", rule.id());
                }
                recommendation
            })
            .collect()
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("rules", &self.rule_ids())
            .finish()
    }
}
