use serde::{Deserialize, Serialize};

use crate::catalog::pricing_factor;
use crate::data::{CostLine, FormData, PricingResult};
use crate::rates::ProjectType;

/// Share of each feature's factor that reaches the price. Keeps stacked
/// high-impact features from compounding.
const FEATURE_DAMPING: f64 = 0.5;

/// Fixed cost split, in breakdown order.
const COST_SPLIT: [(&str, u32); 5] = [
    ("Development", 60),
    ("Design", 25),
    ("Testing", 10),
    ("Deployment", 3),
    ("Support", 2),
];

/// Calculate the total cost and its five-way split for a form.
pub fn calculate_pricing(form: &FormData) -> PricingResult {
    let project_type = form.project_type.unwrap_or(ProjectType::DEFAULT);
    let base_price = project_type.base_rate().avg;

    let feature_multiplier = feature_multiplier(form);

    let design_multiplier = form
        .design_complexity
        .map(|d| d.multiplier())
        .unwrap_or(1.0);

    let stack = &form.technical_stack;
    let frontend = stack.frontend.map(|f| f.factor()).unwrap_or(1.0);
    let backend = stack.backend.map(|b| b.factor()).unwrap_or(1.0);
    let database = stack.database.map(|d| d.factor()).unwrap_or(1.0);
    let technical_multiplier = (frontend + backend + database) / 3.0;

    let urgency_multiplier = form
        .timeline
        .urgency
        .map(|u| u.multiplier())
        .unwrap_or(1.0);

    let total = base_price
        * feature_multiplier
        * design_multiplier
        * technical_multiplier
        * urgency_multiplier;

    tracing::debug!(
        project_type = ?project_type,
        feature_multiplier,
        design_multiplier,
        technical_multiplier,
        urgency_multiplier,
        total,
        "Calculated pricing"
    );

    let breakdown: Vec<CostLine> = COST_SPLIT
        .iter()
        .map(|(category, percentage)| CostLine {
            category: (*category).to_string(),
            amount: total * f64::from(*percentage) / 100.0,
            percentage: *percentage,
        })
        .collect();

    PricingResult {
        development: breakdown[0].amount,
        design: breakdown[1].amount,
        testing: breakdown[2].amount,
        deployment: breakdown[3].amount,
        support: breakdown[4].amount,
        total,
        breakdown,
    }
}

fn feature_multiplier(form: &FormData) -> f64 {
    let mut multiplier = 1.0;
    for id in form.distinct_features() {
        match pricing_factor(id) {
            Some(factor) => multiplier += (factor - 1.0) * FEATURE_DAMPING,
            None => tracing::debug!(feature = %id, "Skipping unknown feature"),
        }
    }
    multiplier
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Rounded band of `total ± total * variance`.
pub fn estimated_range(pricing: &PricingResult, variance: f64) -> CostRange {
    let spread = pricing.total * variance;
    CostRange {
        min: (pricing.total - spread).round(),
        max: (pricing.total + spread).round(),
        avg: pricing.total.round(),
    }
}

/// Split of a finalized total into an upfront deposit and the balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositQuote {
    pub total: f64,
    pub deposit: f64,
    pub remaining: f64,
}

pub fn deposit_quote(pricing: &PricingResult, deposit_rate: f64) -> DepositQuote {
    DepositQuote {
        total: pricing.total,
        deposit: (pricing.total * deposit_rate).round(),
        remaining: (pricing.total * (1.0 - deposit_rate)).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{Backend, Database, DesignComplexity, Frontend, Urgency};

    fn web_app_form() -> FormData {
        let mut form = FormData::default();
        form.project_type = Some(ProjectType::WebApplication);
        form.design_complexity = Some(DesignComplexity::Basic);
        form.technical_stack.frontend = Some(Frontend::React);
        form.technical_stack.backend = Some(Backend::Nodejs);
        form.technical_stack.database = Some(Database::Postgresql);
        form
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= expected.abs() * 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_baseline_web_application() {
        let pricing = calculate_pricing(&web_app_form());

        assert_close(pricing.total, 1_320_000.0);
        let amounts: Vec<f64> = pricing.breakdown.iter().map(|l| l.amount).collect();
        let expected = [792_000.0, 330_000.0, 132_000.0, 39_600.0, 26_400.0];
        for (actual, expected) in amounts.iter().zip(expected) {
            assert_close(*actual, expected);
        }
    }

    #[test]
    fn test_breakdown_order_and_percentages() {
        let pricing = calculate_pricing(&web_app_form().with_feature("ar-vr"));
        let categories: Vec<_> = pricing.breakdown.iter().map(|l| l.category.as_str()).collect();
        let percentages: Vec<_> = pricing.breakdown.iter().map(|l| l.percentage).collect();

        assert_eq!(
            categories,
            vec!["Development", "Design", "Testing", "Deployment", "Support"]
        );
        assert_eq!(percentages, vec![60, 25, 10, 3, 2]);
        assert_eq!(pricing.development, pricing.breakdown[0].amount);
        assert_eq!(pricing.support, pricing.breakdown[4].amount);
    }

    #[test]
    fn test_feature_damping() {
        // ai-integration has factor 2.0, so the multiplier becomes 1.5
        let pricing = calculate_pricing(&web_app_form().with_feature("ai-integration"));
        assert_close(pricing.total, 1_320_000.0 * 1.5);
    }

    #[test]
    fn test_unknown_features_are_ignored() {
        let base = calculate_pricing(&web_app_form());
        let with_unknown = calculate_pricing(&web_app_form().with_feature("time-travel"));
        assert_eq!(base, with_unknown);
    }

    #[test]
    fn test_duplicate_features_count_once() {
        let mut form = web_app_form().with_feature("dark-mode");
        let once = calculate_pricing(&form);
        form.features.push("dark-mode".into());
        assert_eq!(calculate_pricing(&form), once);
    }

    #[test]
    fn test_missing_project_type_uses_web_application_rate() {
        let mut form = web_app_form();
        form.project_type = None;
        assert_close(calculate_pricing(&form).total, 1_320_000.0);
    }

    #[test]
    fn test_technical_multiplier_is_mean_of_factors() {
        let mut form = web_app_form();
        form.technical_stack.frontend = Some(Frontend::Angular);
        form.technical_stack.backend = Some(Backend::Java);
        form.technical_stack.database = Some(Database::Redis);
        // (1.2 + 1.3 + 1.2) / 3
        assert_close(calculate_pricing(&form).total, 1_320_000.0 * 3.7 / 3.0);
    }

    #[test]
    fn test_all_multipliers_combine() {
        let mut form = web_app_form().with_feature("user-authentication");
        form.project_type = Some(ProjectType::SaasPlatform);
        form.design_complexity = Some(DesignComplexity::Premium);
        form.timeline.urgency = Some(Urgency::Urgent);

        // 5_000_000 * 1.15 * 2.0 * 1.0 * 1.3
        assert_close(calculate_pricing(&form).total, 14_950_000.0);
    }

    #[test]
    fn test_estimated_range() {
        let pricing = calculate_pricing(&web_app_form());
        let range = estimated_range(&pricing, 0.2);
        assert_eq!(range.min, 1_056_000.0);
        assert_eq!(range.max, 1_584_000.0);
        assert_eq!(range.avg, 1_320_000.0);
    }

    #[test]
    fn test_deposit_quote() {
        let pricing = calculate_pricing(&web_app_form());
        let quote = deposit_quote(&pricing, 0.3);
        assert_eq!(quote.deposit, 396_000.0);
        assert_eq!(quote.remaining, 924_000.0);
    }

    mod properties {
        use super::*;
        use crate::catalog::all_features;
        use crate::sampler::sample_form;
        use proptest::prelude::*;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        fn form_from(seed: u64) -> FormData {
            sample_form(&mut StdRng::seed_from_u64(seed))
        }

        proptest! {
            #[test]
            fn pricing_is_deterministic(seed in any::<u64>()) {
                let form = form_from(seed);
                prop_assert_eq!(calculate_pricing(&form), calculate_pricing(&form));
            }

            #[test]
            fn buckets_sum_to_total(seed in any::<u64>()) {
                let pricing = calculate_pricing(&form_from(seed));
                let sum = pricing.development
                    + pricing.design
                    + pricing.testing
                    + pricing.deployment
                    + pricing.support;
                prop_assert!((sum - pricing.total).abs() <= pricing.total * 1e-6);
            }

            #[test]
            fn breakdown_ratios_are_fixed(seed in any::<u64>()) {
                let pricing = calculate_pricing(&form_from(seed));
                let percentages: Vec<u32> =
                    pricing.breakdown.iter().map(|l| l.percentage).collect();
                prop_assert_eq!(percentages, vec![60, 25, 10, 3, 2]);
            }

            #[test]
            fn adding_a_feature_never_lowers_total(
                seed in any::<u64>(),
                index in 0..all_features().len(),
            ) {
                let form = form_from(seed);
                let feature = &all_features()[index];
                prop_assume!(feature.cost_impact > 0.0);

                let before = calculate_pricing(&form).total;
                let after = calculate_pricing(&form.clone().with_feature(feature.id)).total;
                prop_assert!(after >= before);
            }
        }
    }
}
