use super::*;
use crate::config::RiskConfig;
use crate::portfolio::{PortfolioSnapshot, RiskLevel};
use crate::risk::RiskAnalyticsEngine;
use crate::test_support::{holding, snapshot};
use rust_decimal_macros::dec;

fn metrics_for(snapshot: &PortfolioSnapshot) -> DerivedMetrics {
    let engine = RiskAnalyticsEngine::default();
    DerivedMetrics {
        total_value: snapshot.total_value(),
        diversification_score: engine.diversification_index(snapshot),
        risk_distribution: engine.risk_distribution(snapshot),
        volatility: engine.volatility(snapshot),
    }
}

fn evaluate(engine: &RecommendationEngine, snapshot: &PortfolioSnapshot) -> Vec<Recommendation> {
    let metrics = metrics_for(snapshot);
    let config = RiskConfig::default();
    engine.evaluate(&RuleContext::new(snapshot, &metrics, &config))
}

struct AlwaysRule;

impl RecommendationRule for AlwaysRule {
    fn id(&self) -> &'static str {
        "always"
    }

    fn evaluate(&self, _ctx: &RuleContext<'_>) -> Option<Recommendation> {
        Some(Recommendation::info(self.id(), "Always", "Always fires."))
    }
}

#[test]
fn test_default_rule_order() {
    let engine = RecommendationEngine::default();
    assert_eq!(
        engine.rule_ids(),
        vec![
            "category_concentration",
            "high_risk_exposure",
            "low_diversification",
            "high_volatility"
        ]
    );
}

#[test]
fn test_independent_families_all_fire_in_order() {
    let snap = snapshot(vec![
        holding("a", "Crypto", RiskLevel::High, dec!(800)),
        holding("b", "Bonds", RiskLevel::Low, dec!(200)),
    ]);

    let recommendations = evaluate(&RecommendationEngine::default(), &snap);
    let rules: Vec<&str> = recommendations.iter().map(|r| r.rule.as_str()).collect();
    assert_eq!(
        rules,
        vec!["category_concentration", "high_risk_exposure", "low_diversification"]
    );
    assert!(recommendations[0].is_warning());
    assert!(recommendations[1].is_warning());
    assert!(!recommendations[2].is_warning());
}

#[test]
fn test_balanced_portfolio_has_no_recommendations() {
    let snap = snapshot(vec![
        holding("a", "Tech", RiskLevel::Medium, dec!(200)),
        holding("b", "Bonds", RiskLevel::Low, dec!(200)),
        holding("c", "Cash", RiskLevel::Low, dec!(200)),
        holding("d", "Property", RiskLevel::Medium, dec!(200)),
        holding("e", "Crypto", RiskLevel::High, dec!(200)),
    ]);
    assert!(evaluate(&RecommendationEngine::default(), &snap).is_empty());
}

#[test]
fn test_empty_snapshot_has_no_recommendations() {
    assert!(evaluate(&RecommendationEngine::default(), &snapshot(vec![])).is_empty());
}

#[test]
fn test_evaluation_is_deterministic() {
    let snap = snapshot(vec![
        holding("a", "Crypto", RiskLevel::High, dec!(700)),
        holding("b", "Tech", RiskLevel::High, dec!(300)),
    ]);
    let engine = RecommendationEngine::default();
    assert_eq!(evaluate(&engine, &snap), evaluate(&engine, &snap));
}

#[test]
fn test_rules_run_in_registration_order() {
    let mut engine = RecommendationEngine::new();
    assert!(evaluate(&engine, &snapshot(vec![])).is_empty());

    engine.register(Box::new(AlwaysRule));
    let engine = engine.with_rule(HighRiskExposureRule);
    assert_eq!(engine.rule_ids(), vec!["always", "high_risk_exposure"]);

    let snap = snapshot(vec![holding("a", "Crypto", RiskLevel::High, dec!(10))]);
    let rules: Vec<String> = evaluate(&engine, &snap).into_iter().map(|r| r.rule).collect();
    assert_eq!(rules, vec!["always", "high_risk_exposure"]);
}

#[test]
fn test_recommendation_json_shape() {
    let rec = Recommendation::warning("high_risk_exposure", "Title", "Message");
    let json = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["kind"], "warning");
    assert_eq!(json["rule"], "high_risk_exposure");
    assert_eq!(json["title"], "Title");
    assert_eq!(json["message"], "Message");
}

#[test]
fn test_debug_lists_rule_ids() {
    let debug = format!("{:?}", RecommendationEngine::default());
    assert!(debug.contains("high_volatility"));
}
