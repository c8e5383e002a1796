use super::*;
use crate::config::ProjectionConfig;
use crate::test_support::assert_close;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

fn engine() -> ProjectionEngine {
    ProjectionEngine::default()
}

fn request(
    initial: Decimal,
    contribution: Decimal,
    rate: Decimal,
    years: u32,
    frequency: CompoundingFrequency,
) -> ProjectionRequest {
    ProjectionRequest {
        initial_amount: initial,
        periodic_contribution: contribution,
        annual_return_percent: rate,
        years,
        compounding_frequency: frequency,
        inflation_rate_percent: None,
    }
}

// ============================================================================
// simulate_growth
// ============================================================================

#[test]
fn test_pure_compound_growth_matches_closed_form() {
    for frequency in [
        CompoundingFrequency::Daily,
        CompoundingFrequency::Monthly,
        CompoundingFrequency::Annual,
    ] {
        let result = engine()
            .simulate_growth(&request(dec!(1000), dec!(0), dec!(8), 5, frequency))
            .unwrap();

        let periods = u64::from(frequency.periods_per_year()) * 5;
        let rate = periodic_rate(dec!(8), frequency.periods_per_year()).unwrap();
        let expected = dec!(1000) * (Decimal::ONE + rate).powu(periods);

        assert_close(result.final_amount, expected, dec!(0.000000000001));
        assert_eq!(result.total_contributions, dec!(1000));
    }
}

#[test]
fn test_annual_compounding_is_exact() {
    let result = engine()
        .simulate_growth(&request(dec!(1000), dec!(0), dec!(10), 2, CompoundingFrequency::Annual))
        .unwrap();
    assert_eq!(result.final_amount, dec!(1210));
    assert_eq!(result.total_earnings, dec!(210));
    assert_eq!(result.roi_percent, dec!(21));
}

#[test]
fn test_effective_annual_rate_is_preserved_across_frequencies() {
    // Without contributions every frequency compounds to the same annual growth.
    let annual = engine()
        .simulate_growth(&request(dec!(5000), dec!(0), dec!(7), 3, CompoundingFrequency::Annual))
        .unwrap();
    let monthly = engine()
        .simulate_growth(&request(dec!(5000), dec!(0), dec!(7), 3, CompoundingFrequency::Monthly))
        .unwrap();
    let daily = engine()
        .simulate_growth(&request(dec!(5000), dec!(0), dec!(7), 3, CompoundingFrequency::Daily))
        .unwrap();

    assert_close(monthly.final_amount, annual.final_amount, dec!(0.000001));
    assert_close(daily.final_amount, annual.final_amount, dec!(0.000001));
}

#[test]
fn test_savings_plan_scenario() {
    let result = engine()
        .simulate_growth(&request(
            dec!(1000000),
            dec!(100000),
            dec!(10),
            10,
            CompoundingFrequency::Monthly,
        ))
        .unwrap();

    assert_eq!(result.total_contributions, dec!(13000000));
    assert!(result.final_amount > result.total_contributions);
    assert!(result.roi_percent > Decimal::ZERO);
    assert_eq!(
        result.final_amount,
        result.total_contributions + result.total_earnings
    );
}

#[test]
fn test_yearly_projection_checkpoints() {
    let result = engine()
        .simulate_growth(&request(dec!(100), dec!(10), dec!(5), 4, CompoundingFrequency::Monthly))
        .unwrap();

    assert_eq!(result.yearly_projection.len(), 4);
    for (i, checkpoint) in result.yearly_projection.iter().enumerate() {
        let year = i as u32 + 1;
        assert_eq!(checkpoint.year, year);
        assert_eq!(checkpoint.contributions, dec!(100) + dec!(120) * Decimal::from(year));
        assert_eq!(checkpoint.earnings, checkpoint.balance - checkpoint.contributions);
        assert!(checkpoint.real_balance.is_none());
    }
    assert!(result
        .yearly_projection
        .windows(2)
        .all(|w| w[1].balance > w[0].balance));
    assert_eq!(
        result.yearly_projection.last().unwrap().balance,
        result.final_amount
    );
}

#[test]
fn test_checkpoints_are_restartable() {
    let plan = engine()
        .plan(&request(dec!(250), dec!(25), dec!(6), 3, CompoundingFrequency::Daily))
        .unwrap();

    let mut checkpoints = plan.checkpoints();
    assert_eq!(checkpoints.len(), 3);
    checkpoints.next();
    assert_eq!(checkpoints.len(), 2);

    let first: Vec<_> = plan.checkpoints().collect();
    let second: Vec<_> = plan.checkpoints().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_contribution_rescaled_to_keep_annual_total() {
    let daily = engine()
        .simulate_growth(&request(dec!(0), dec!(100), dec!(0), 2, CompoundingFrequency::Daily))
        .unwrap();
    let annual = engine()
        .simulate_growth(&request(dec!(0), dec!(100), dec!(0), 2, CompoundingFrequency::Annual))
        .unwrap();

    assert_eq!(daily.total_contributions, dec!(2400));
    assert_eq!(annual.total_contributions, dec!(2400));
    assert_eq!(annual.final_amount, dec!(2400));
    assert_close(daily.final_amount, dec!(2400), dec!(0.000000000001));
}

#[test]
fn test_negative_return_models_a_loss() {
    let result = engine()
        .simulate_growth(&request(dec!(10000), dec!(100), dec!(-12), 3, CompoundingFrequency::Monthly))
        .unwrap();

    assert!(result.final_amount < result.total_contributions);
    assert!(result.total_earnings < Decimal::ZERO);
    assert!(result.roi_percent < Decimal::ZERO);
}

#[test]
fn test_total_loss_keeps_only_last_contribution() {
    let result = engine()
        .simulate_growth(&request(dec!(10000), dec!(50), dec!(-100), 2, CompoundingFrequency::Monthly))
        .unwrap();
    assert_eq!(result.final_amount, dec!(50));
}

#[test]
fn test_zero_contributions_give_zero_roi() {
    let result = engine()
        .simulate_growth(&request(dec!(0), dec!(0), dec!(10), 5, CompoundingFrequency::Monthly))
        .unwrap();
    assert_eq!(result.final_amount, Decimal::ZERO);
    assert_eq!(result.roi_percent, Decimal::ZERO);
}

#[test]
fn test_inflation_adjusted_balances() {
    let mut req = request(dec!(10000), dec!(0), dec!(0), 2, CompoundingFrequency::Annual);
    req.inflation_rate_percent = Some(dec!(25));

    let result = engine().simulate_growth(&req).unwrap();
    assert_eq!(result.yearly_projection[0].real_balance, Some(dec!(8000)));
    assert_eq!(result.yearly_projection[1].real_balance, Some(dec!(6400)));
    assert_eq!(result.inflation_adjusted_final_amount, Some(dec!(6400)));
    assert_eq!(result.final_amount, dec!(10000));
}

#[test]
fn test_simulate_rejects_invalid_input() {
    let cases = [
        (request(dec!(1), dec!(1), dec!(5), 0, CompoundingFrequency::Monthly), "years"),
        (request(dec!(-1), dec!(1), dec!(5), 1, CompoundingFrequency::Monthly), "initialAmount"),
        (
            request(dec!(1), dec!(-5), dec!(5), 1, CompoundingFrequency::Monthly),
            "periodicContribution",
        ),
        (
            request(dec!(1), dec!(1), dec!(-100.01), 1, CompoundingFrequency::Monthly),
            "annualReturnPercent",
        ),
        (request(dec!(1), dec!(1), dec!(5), 101, CompoundingFrequency::Monthly), "years"),
    ];

    for (req, field) in cases {
        let err = engine().simulate_growth(&req).unwrap_err();
        assert_eq!(err.invalid_field(), Some(field), "request {:?}", req);
    }

    let mut req = request(dec!(1), dec!(1), dec!(5), 1, CompoundingFrequency::Monthly);
    req.inflation_rate_percent = Some(dec!(-100));
    let err = engine().simulate_growth(&req).unwrap_err();
    assert_eq!(err.invalid_field(), Some("inflationRatePercent"));
}

#[test]
fn test_simulate_refuses_overflowing_horizon() {
    let err = engine()
        .simulate_growth(&request(
            dec!(1000000000),
            dec!(0),
            dec!(900),
            100,
            CompoundingFrequency::Annual,
        ))
        .unwrap_err();
    assert!(matches!(err, crate::errors::Error::Calculation(_)));
}

#[test]
fn test_request_json_shape() {
    let req: ProjectionRequest = serde_json::from_str(
        r#"{
            "initialAmount": 1000,
            "periodicContribution": 50,
            "annualReturnPercent": -2.5,
            "years": 3,
            "compoundingFrequency": "daily"
        }"#,
    )
    .unwrap();
    assert_eq!(req.compounding_frequency, CompoundingFrequency::Daily);
    assert_eq!(req.annual_return_percent, dec!(-2.5));
    assert!(req.inflation_rate_percent.is_none());

    let defaulted: ProjectionRequest = serde_json::from_str(
        r#"{ "initialAmount": 1, "periodicContribution": 0, "annualReturnPercent": 1, "years": 1 }"#,
    )
    .unwrap();
    assert_eq!(defaulted.compounding_frequency, CompoundingFrequency::Monthly);
}

#[test]
fn test_float_requests_convert_or_name_the_field() {
    let req = ProjectionRequest::monthly_from_f64(1000.0, 50.5, -2.5, 3).unwrap();
    assert_eq!(req.periodic_contribution, dec!(50.5));
    assert_eq!(req.annual_return_percent, dec!(-2.5));
    assert_eq!(req.compounding_frequency, CompoundingFrequency::Monthly);

    let err = ProjectionRequest::monthly_from_f64(1000.0, f64::NAN, 5.0, 3).unwrap_err();
    assert_eq!(err.invalid_field(), Some("periodicContribution"));

    let err = ScenarioRequest::from_f64(f64::INFINITY, 10.0, 5).unwrap_err();
    assert_eq!(err.invalid_field(), Some("initialAmount"));

    let err = GoalSolveRequest::from_f64(1e6, 0.0, f64::NEG_INFINITY, 10).unwrap_err();
    assert_eq!(err.invalid_field(), Some("annualReturnPercent"));

    let goal = GoalSolveRequest::from_f64(1e6, 0.0, 7.0, 10).unwrap();
    assert_eq!(goal.target_amount, dec!(1000000));
}

// ============================================================================
// compare_scenarios
// ============================================================================

#[test]
fn test_scenarios_are_ordered_by_rate() {
    let comparison = engine()
        .compare_scenarios(&ScenarioRequest {
            initial_amount: dec!(10000),
            monthly_contribution: dec!(500),
            years: 20,
        })
        .unwrap();

    assert_eq!(comparison.conservative.annual_return_percent, dec!(6));
    assert_eq!(comparison.moderate.annual_return_percent, dec!(10));
    assert_eq!(comparison.aggressive.annual_return_percent, dec!(15));
    assert!(comparison.aggressive.final_amount > comparison.moderate.final_amount);
    assert!(comparison.moderate.final_amount > comparison.conservative.final_amount);
    assert!(comparison.conservative.roi_percent > Decimal::ZERO);
}

#[test]
fn test_scenarios_use_configured_rates() {
    let engine = ProjectionEngine::new(ProjectionConfig {
        conservative_rate_percent: dec!(0),
        moderate_rate_percent: dec!(0),
        aggressive_rate_percent: dec!(0),
        ..ProjectionConfig::default()
    });
    let comparison = engine
        .compare_scenarios(&ScenarioRequest {
            initial_amount: dec!(100),
            monthly_contribution: dec!(10),
            years: 1,
        })
        .unwrap();

    assert_eq!(comparison.conservative.final_amount, dec!(220));
    assert_eq!(comparison.aggressive.final_amount, dec!(220));
    assert_eq!(comparison.moderate.total_earnings, Decimal::ZERO);
}

#[test]
fn test_scenarios_reject_zero_years() {
    let err = engine()
        .compare_scenarios(&ScenarioRequest {
            initial_amount: dec!(100),
            monthly_contribution: dec!(10),
            years: 0,
        })
        .unwrap_err();
    assert_eq!(err.invalid_field(), Some("years"));
}

#[test]
fn test_unvalidated_config_surfaces_as_errors() {
    let request = ScenarioRequest {
        initial_amount: dec!(100),
        monthly_contribution: dec!(10),
        years: 5,
    };

    let no_horizon = ProjectionEngine::new(ProjectionConfig {
        max_years: 0,
        ..ProjectionConfig::default()
    });
    let err = no_horizon.compare_scenarios(&request).unwrap_err();
    assert_eq!(err.invalid_field(), Some("years"));

    let impossible_rate = ProjectionEngine::new(ProjectionConfig {
        conservative_rate_percent: dec!(-150),
        ..ProjectionConfig::default()
    });
    let err = impossible_rate.compare_scenarios(&request).unwrap_err();
    assert_eq!(err.invalid_field(), Some("annualReturnPercent"));
}

// ============================================================================
// solve_required_contribution
// ============================================================================

fn goal(target: Decimal, initial: Decimal, rate: Decimal, years: u32) -> GoalSolveRequest {
    GoalSolveRequest {
        target_amount: target,
        initial_amount: initial,
        annual_return_percent: rate,
        years,
    }
}

#[test]
fn test_solve_ten_million_goal() {
    let result = engine()
        .solve_required_contribution(&goal(dec!(10000000), dec!(0), dec!(10), 10))
        .unwrap();

    assert!(result.required_periodic_contribution > Decimal::ZERO);
    assert!(result.total_to_contribute < dec!(10000000));
    assert_eq!(result.yearly_projection.len(), 10);
    assert_close(
        result.yearly_projection.last().unwrap().balance,
        dec!(10000000),
        dec!(0.000001),
    );
}

#[test]
fn test_solved_contribution_round_trips_through_simulation() {
    let cases = [
        (dec!(250000), dec!(10000), dec!(7), 15),
        (dec!(5000), dec!(0), dec!(-3), 2),
        (dec!(1000000), dec!(50000), dec!(12.5), 30),
    ];

    for (target, initial, rate, years) in cases {
        let solved = engine()
            .solve_required_contribution(&goal(target, initial, rate, years))
            .unwrap();
        let simulated = engine()
            .simulate_growth(&ProjectionRequest::monthly(
                initial,
                solved.required_periodic_contribution,
                rate,
                years,
            ))
            .unwrap();
        assert_close(simulated.final_amount, target, dec!(0.000001));
    }
}

#[test]
fn test_solve_zero_rate_is_linear() {
    let result = engine()
        .solve_required_contribution(&goal(dec!(12000), dec!(0), dec!(0), 1))
        .unwrap();
    assert_eq!(result.required_periodic_contribution, dec!(1000));
    assert_eq!(result.total_to_contribute, dec!(12000));
}

#[test]
fn test_solve_goal_reached_by_lump_sum() {
    let result = engine()
        .solve_required_contribution(&goal(dec!(1000), dec!(1000), dec!(5), 3))
        .unwrap();
    assert_eq!(result.required_periodic_contribution, Decimal::ZERO);
    assert_eq!(result.total_to_contribute, dec!(1000));
    assert!(result.yearly_projection.last().unwrap().balance > dec!(1000));
}

#[test]
fn test_solve_rejects_invalid_input() {
    let err = engine()
        .solve_required_contribution(&goal(dec!(0), dec!(0), dec!(5), 3))
        .unwrap_err();
    assert_eq!(err.invalid_field(), Some("targetAmount"));

    let err = engine()
        .solve_required_contribution(&goal(dec!(100), dec!(0), dec!(5), 0))
        .unwrap_err();
    assert_eq!(err.invalid_field(), Some("years"));

    let err = engine()
        .solve_required_contribution(&goal(dec!(100), dec!(-1), dec!(5), 1))
        .unwrap_err();
    assert_eq!(err.invalid_field(), Some("initialAmount"));
}
