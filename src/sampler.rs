use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::all_features;
use crate::data::{Budget, FormData, TechnicalStack, TimelinePreferences};
use crate::rates::Choice;

fn pick<T: Choice, R: Rng>(rng: &mut R) -> Option<T> {
    T::ALL.choose(rng).copied()
}

/// Draw a complete, valid form at random.
pub fn sample_form<R: Rng>(rng: &mut R) -> FormData {
    let catalog = all_features();
    let feature_count = rng.gen_range(1..=6);
    let features = catalog
        .choose_multiple(rng, feature_count)
        .map(|f| f.id.to_string())
        .collect();

    let min = f64::from(rng.gen_range(1..=20u32)) * 500.0;
    let max = min + f64::from(rng.gen_range(2..=40u32)) * 1000.0;

    FormData {
        project_type: pick(rng),
        features,
        design_complexity: pick(rng),
        technical_stack: TechnicalStack {
            frontend: pick(rng),
            backend: pick(rng),
            database: pick(rng),
        },
        timeline: TimelinePreferences {
            duration: Some(rng.gen_range(1..=52)),
            urgency: pick(rng),
            support: pick(rng),
        },
        budget: Budget {
            min: Some(min),
            max: Some(max),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sampled_forms_validate() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let form = sample_form(&mut rng);
            assert!(validate_form(&form).is_empty(), "{:?}", form);
        }
    }

    #[test]
    fn test_same_seed_same_form() {
        let a = sample_form(&mut StdRng::seed_from_u64(42));
        let b = sample_form(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sampled_features_are_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let form = sample_form(&mut rng);
            assert_eq!(form.distinct_features().len(), form.features.len());
        }
    }
}
