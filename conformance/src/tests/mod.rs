//! Conformance cases organized by category.
//!
//! Each module registers its cases in battery order; [`all_tests`] chains
//! them into the fixed twelve-case sequence.


use crate::{ConformanceTest, Cortex};

/// All twelve cases in execution order.
pub fn all_tests<C: Cortex>() -> Vec<ConformanceTest<C>> {
    let mut tests = Vec::with_capacity(12);
    tests.extend(state::tests::<C>());
    tests.extend(adaptation::tests::<C>());
    tests.extend(hypotheses::tests::<C>());
    tests
}

#[cfg(test)]
mod battery_tests {
    use super::*;
    use crate::TestCategory;
    use agitb::testing::TransitionMemory;
    use agitb::Spikes;

    #[test]
    fn battery_has_twelve_cases_in_order() {
        crate::test_utils::init_test_logging();
        crate::test_phase!("battery_has_twelve_cases_in_order");
        let tests = all_tests::<TransitionMemory<Spikes<4>>>();
        let ids: Vec<u8> = tests.iter().map(|t| t.meta.id).collect();
        crate::assert_with_log!(
            ids == (1..=12).collect::<Vec<u8>>(),
            "ids in order",
            "1..=12",
            ids
        );

        let names: Vec<&str> = tests.iter().map(|t| t.meta.name).collect();
        assert_eq!(
            names,
            [
                "Genesis",
                "Bias",
                "Determinism",
                "Sensitivity",
                "Time",
                "RefractoryPeriod",
                "TemporalFlexibility",
                "Stagnation",
                "Unsupervised",
                "Knowledge",
                "Unobservability",
                "Generalisation",
            ]
        );
        crate::test_complete!("battery_has_twelve_cases_in_order");
    }

    #[test]
    fn categories_group_contiguously() {
        let tests = all_tests::<TransitionMemory<Spikes<4>>>();
        let categories: Vec<TestCategory> = tests.iter().map(|t| t.meta.category).collect();
        assert!(categories[..5].iter().all(|c| *c == TestCategory::State));
        assert!(categories[5..8].iter().all(|c| *c == TestCategory::Adaptation));
        assert!(categories[8..].iter().all(|c| *c == TestCategory::Hypothesis));
    }

    #[test]
    fn meta_display_matches_banner_format() {
        let tests = all_tests::<TransitionMemory<Spikes<4>>>();
        assert_eq!(
            tests[0].meta.to_string(),
            "#1 Genesis (All cortices begin in a completely blank, bias-free state.)"
        );
    }
}
