//! Recommendation engine integration tests
//!
//! Exercises the ordered threshold rules and the follow-up downgrade law
//! through the shared crate's public API.

use proptest::prelude::*;

use shared::models::recommendation::{classify, RecommendationLevel};
use shared::models::settings::Thresholds;

fn thresholds() -> Thresholds {
    Thresholds {
        minimum: 40.0,
        optimal: 70.0,
        perfect: 90.0,
    }
}

/// Rank of a level for monotonicity checks, ascending.
fn rank(level: RecommendationLevel) -> u8 {
    match level {
        RecommendationLevel::NoViable => 0,
        RecommendationLevel::Arriesgada => 1,
        RecommendationLevel::Favorable => 2,
        RecommendationLevel::Optima => 3,
        RecommendationLevel::Perfecta => 4,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_perfecta_is_never_downgraded() {
        for epsilon in [0.0, 0.1, 25.0] {
            let rec = classify(90.0 + epsilon, 0.0, &thresholds(), 5.0, 7);
            assert_eq!(rec.level, RecommendationLevel::Perfecta);
        }
    }

    #[test]
    fn test_threshold_boundaries_take_the_higher_branch() {
        let t = thresholds();
        assert_eq!(
            classify(70.0, 10.0, &t, 5.0, 7).level,
            RecommendationLevel::Optima
        );
        assert_eq!(
            classify(40.0, 10.0, &t, 5.0, 7).level,
            RecommendationLevel::Favorable
        );
        assert_eq!(
            classify(90.0, 10.0, &t, 5.0, 7).level,
            RecommendationLevel::Perfecta
        );
    }

    #[test]
    fn test_downgrade_both_branches() {
        let t = thresholds();
        assert_eq!(
            classify(50.0, 6.0, &t, 5.0, 7).level,
            RecommendationLevel::Favorable
        );
        assert_eq!(
            classify(50.0, 4.9, &t, 5.0, 7).level,
            RecommendationLevel::Arriesgada
        );
    }

    #[test]
    fn test_below_minimum_is_no_viable() {
        let rec = classify(12.3, 50.0, &thresholds(), 5.0, 7);
        assert_eq!(rec.level, RecommendationLevel::NoViable);
        assert!(rec.details.contains("12.3mm"));
    }

    #[test]
    fn test_identical_inputs_give_identical_output() {
        let a = classify(67.4, 3.2, &thresholds(), 5.0, 10);
        let b = classify(67.4, 3.2, &thresholds(), 5.0, 10);
        assert_eq!(a, b);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for accumulated rain totals
    fn rain_strategy() -> impl Strategy<Value = f64> {
        0.0f64..200.0
    }

    /// Strategy for follow-up forecast totals
    fn follow_up_strategy() -> impl Strategy<Value = f64> {
        0.0f64..60.0
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// More accumulated rain can never lower the recommendation.
        #[test]
        fn prop_level_monotonic_in_rain(
            a in rain_strategy(),
            b in rain_strategy(),
            follow_up in follow_up_strategy()
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_level = classify(lo, follow_up, &thresholds(), 5.0, 7).level;
            let hi_level = classify(hi, follow_up, &thresholds(), 5.0, 7).level;
            prop_assert!(rank(hi_level) >= rank(lo_level));
        }

        /// At or above the perfect threshold, follow-up rain never matters.
        #[test]
        fn prop_perfecta_ignores_follow_up(
            excess in 0.0f64..100.0,
            follow_up in follow_up_strategy()
        ) {
            let rec = classify(90.0 + excess, follow_up, &thresholds(), 5.0, 7);
            prop_assert_eq!(rec.level, RecommendationLevel::Perfecta);
        }

        /// Between minimum and optimal, the follow-up check decides between
        /// Favorable and Arriesgada and nothing else.
        #[test]
        fn prop_downgrade_law(
            total in 40.0f64..70.0,
            follow_up in follow_up_strategy()
        ) {
            // The upper bound is exclusive of optimal; nudge away from it.
            prop_assume!(total < 70.0);
            let rec = classify(total, follow_up, &thresholds(), 5.0, 7);
            if follow_up >= 5.0 {
                prop_assert_eq!(rec.level, RecommendationLevel::Favorable);
            } else {
                prop_assert_eq!(rec.level, RecommendationLevel::Arriesgada);
            }
        }

        /// Every classification carries the accumulated total in its details.
        #[test]
        fn prop_details_cite_the_total(
            total in rain_strategy(),
            follow_up in follow_up_strategy()
        ) {
            let rec = classify(total, follow_up, &thresholds(), 5.0, 7);
            let needle = format!("{:.1}mm", total);
            prop_assert!(rec.details.contains(&needle));
        }

        /// Classification is a pure function of its inputs.
        #[test]
        fn prop_idempotent(
            total in rain_strategy(),
            follow_up in follow_up_strategy()
        ) {
            let a = classify(total, follow_up, &thresholds(), 5.0, 7);
            let b = classify(total, follow_up, &thresholds(), 5.0, 7);
            prop_assert_eq!(a, b);
        }
    }
}
