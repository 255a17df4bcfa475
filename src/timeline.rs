use serde::{Deserialize, Serialize};

use crate::data::{FormData, PhaseEstimate, TimelineResult};
use crate::rates::ProjectType;

const WEEKS_PER_FEATURE: f64 = 0.5;

struct PhaseSpec {
    name: &'static str,
    share: f64,
    floor: u32,
    description: &'static str,
}

const PHASES: [PhaseSpec; 5] = [
    PhaseSpec {
        name: "Planning",
        share: 0.15,
        floor: 1,
        description: "Requirements gathering and project planning",
    },
    PhaseSpec {
        name: "Design",
        share: 0.25,
        floor: 1,
        description: "UI/UX design and prototyping",
    },
    PhaseSpec {
        name: "Development",
        share: 0.45,
        floor: 2,
        description: "Core development and implementation",
    },
    PhaseSpec {
        name: "Testing",
        share: 0.10,
        floor: 1,
        description: "Quality assurance and bug fixing",
    },
    PhaseSpec {
        name: "Deployment",
        share: 0.05,
        floor: 1,
        description: "Launch and deployment",
    },
];

/// Unrounded project length in weeks, after urgency compression.
pub fn raw_weeks(form: &FormData) -> f64 {
    let project_type = form.project_type.unwrap_or(ProjectType::DEFAULT);
    let mut weeks = project_type.base_weeks();

    weeks += form.distinct_features().len() as f64 * WEEKS_PER_FEATURE;
    weeks += form
        .design_complexity
        .map(|d| d.weeks_bonus())
        .unwrap_or(0.0);

    if let Some((scale, floor)) = form.timeline.urgency.and_then(|u| u.compression()) {
        weeks = (weeks * scale).max(floor);
    }

    weeks
}

/// Schedule a form into five phases.
///
/// Each phase is rounded on its own, so the phase durations may not add up
/// to `total`.
pub fn calculate_timeline(form: &FormData) -> TimelineResult {
    let weeks = raw_weeks(form);

    let phases: Vec<PhaseEstimate> = PHASES
        .iter()
        .map(|spec| PhaseEstimate {
            name: spec.name.to_string(),
            duration: round_weeks(weeks * spec.share).max(spec.floor),
            description: spec.description.to_string(),
        })
        .collect();

    let total = round_weeks(weeks);

    tracing::debug!(
        weeks,
        total,
        phase_sum = phases.iter().map(|p| p.duration).sum::<u32>(),
        "Calculated timeline"
    );

    TimelineResult {
        planning: phases[0].duration,
        design: phases[1].duration,
        development: phases[2].duration,
        testing: phases[3].duration,
        deployment: phases[4].duration,
        total,
        phases,
    }
}

/// Nearest whole week, halves rounded up.
fn round_weeks(weeks: f64) -> u32 {
    weeks.round().max(0.0) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub min: u32,
    pub max: u32,
    pub avg: u32,
}

/// Band of `total ± ceil(total * variance)` weeks, never below one week.
pub fn timeline_range(timeline: &TimelineResult, variance: f64) -> WeekRange {
    let spread = (f64::from(timeline.total) * variance).ceil() as u32;
    WeekRange {
        min: timeline.total.saturating_sub(spread).max(1),
        max: timeline.total + spread,
        avg: timeline.total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{DesignComplexity, Urgency};

    fn web_app_form() -> FormData {
        let mut form = FormData::default();
        form.project_type = Some(ProjectType::WebApplication);
        form.design_complexity = Some(DesignComplexity::Basic);
        form
    }

    fn durations(timeline: &TimelineResult) -> Vec<u32> {
        timeline.phases.iter().map(|p| p.duration).collect()
    }

    #[test]
    fn test_baseline_web_application() {
        let timeline = calculate_timeline(&web_app_form());
        // 8 weeks: 1.2, 2.0, 3.6, 0.8, 0.4
        assert_eq!(timeline.total, 8);
        assert_eq!(durations(&timeline), vec![1, 2, 4, 1, 1]);
        assert_eq!(timeline.planning, 1);
        assert_eq!(timeline.development, 4);
    }

    #[test]
    fn test_super_urgent_rounds_to_nearest() {
        let mut form = web_app_form();
        form.timeline.urgency = Some(Urgency::SuperUrgent);

        let timeline = calculate_timeline(&form);
        // 8 * 0.6 = 4.8 weeks
        assert_eq!(timeline.total, 5);
        assert_eq!(durations(&timeline), vec![1, 1, 2, 1, 1]);
        // Phase floors push the sum past the rounded total.
        assert_eq!(timeline.phase_sum(), 6);
    }

    #[test]
    fn test_urgent_compression() {
        let mut form = web_app_form();
        form.timeline.urgency = Some(Urgency::Urgent);
        // 8 * 0.8 = 6.4
        assert_eq!(calculate_timeline(&form).total, 6);
    }

    #[test]
    fn test_urgent_compression_on_smallest_project() {
        let mut form = FormData::default();
        form.project_type = Some(ProjectType::SimpleWebsite);
        form.timeline.urgency = Some(Urgency::Urgent);
        // 4 * 0.8 = 3.2
        assert!((raw_weeks(&form) - 3.2).abs() < 1e-9);
        assert_eq!(calculate_timeline(&form).total, 3);
    }

    #[test]
    fn test_features_and_design_extend_schedule() {
        let mut form = web_app_form()
            .with_feature("dark-mode")
            .with_feature("file-upload")
            .with_feature("unknown-feature");
        form.design_complexity = Some(DesignComplexity::Enterprise);
        // 8 + 3 * 0.5 + 6
        assert!((raw_weeks(&form) - 15.5).abs() < 1e-9);
        assert_eq!(calculate_timeline(&form).total, 16);
    }

    #[test]
    fn test_phase_floors_hold() {
        let mut form = FormData::default();
        form.project_type = Some(ProjectType::SimpleWebsite);
        form.timeline.urgency = Some(Urgency::SuperUrgent);

        let timeline = calculate_timeline(&form);
        assert!(timeline.planning >= 1);
        assert!(timeline.design >= 1);
        assert!(timeline.development >= 2);
        assert!(timeline.testing >= 1);
        assert!(timeline.deployment >= 1);
    }

    #[test]
    fn test_missing_selections_use_defaults() {
        let timeline = calculate_timeline(&FormData::default());
        assert_eq!(timeline.total, 8);
    }

    #[test]
    fn test_timeline_range() {
        let timeline = calculate_timeline(&web_app_form());
        let range = timeline_range(&timeline, 0.15);
        // ceil(8 * 0.15) = 2
        assert_eq!(range, WeekRange { min: 6, max: 10, avg: 8 });
    }

    mod properties {
        use super::*;
        use crate::sampler::sample_form;
        use proptest::prelude::*;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        proptest! {
            #[test]
            fn timeline_is_deterministic(seed in any::<u64>()) {
                let form = sample_form(&mut StdRng::seed_from_u64(seed));
                prop_assert_eq!(calculate_timeline(&form), calculate_timeline(&form));
            }

            #[test]
            fn urgency_never_lengthens_schedule(seed in any::<u64>()) {
                let mut form = sample_form(&mut StdRng::seed_from_u64(seed));
                let mut weeks = Vec::new();
                for urgency in [Urgency::Normal, Urgency::Urgent, Urgency::SuperUrgent] {
                    form.timeline.urgency = Some(urgency);
                    weeks.push(calculate_timeline(&form).total);
                }
                prop_assert!(weeks[2] <= weeks[1]);
                prop_assert!(weeks[1] <= weeks[0]);
            }
        }
    }
}
